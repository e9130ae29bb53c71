//! Core of the FounderConnect student founder network: step wizards, listing search,
//! skill matching, pagination and the signed-in session.

pub mod config;
pub mod error;
pub mod listings;
pub mod matching;
pub mod pagination;
pub mod session;
pub mod telemetry;
pub mod wizard;
