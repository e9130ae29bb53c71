//! Reusable step wizard driving the sign-up, sign-in, landing and job posting pages.

pub mod completion;
pub mod driver;
pub mod flows;
pub mod form;
pub mod machine;
pub mod router;
pub mod service;
pub mod step;

pub use completion::{JobPostingCompletion, LandingCompletion, SignInCompletion, SignUpCompletion};
pub use driver::{CompletionError, CompletionHandler, CompletionReceipt, StepOutcome, WizardDriver};
pub use flows::{FlowKind, WizardFlow};
pub use form::{FieldValue, FormData};
pub use machine::{
    Advance, KeyAction, KeyPress, StepWizard, Transition, WizardError, WizardState,
    INCOMPLETE_STEP_MESSAGE, SUBMISSION_FALLBACK_MESSAGE,
};
pub use router::wizard_router;
pub use service::{ReplyKind, WizardReply, WizardService, WizardServiceError, WizardView};
pub use step::{Step, StepInput, StepView, Validator};
