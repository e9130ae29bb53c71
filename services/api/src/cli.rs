use crate::demo::{
    run_demo, run_founders, run_jobs, run_skills, DemoArgs, FoundersArgs, JobsArgs, SkillsArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use founder_connect::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "FounderConnect",
    about = "Run and explore the FounderConnect student founder network from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Search the seeded job board
    Jobs(JobsArgs),
    /// Search the seeded co-founder matches
    Founders(FoundersArgs),
    /// Suggest skills from the skill vocabulary
    Skills(SkillsArgs),
    /// Walk through sign-up, job posting and search end to end
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Jobs(args) => run_jobs(args),
        Command::Founders(args) => run_founders(args),
        Command::Skills(args) => run_skills(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
