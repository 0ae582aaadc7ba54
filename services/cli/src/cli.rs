use crate::replay::{run_questions, run_replay, ReplayArgs};
use clap::{Parser, Subcommand};
use finplan::config::AppConfig;
use finplan::error::AppError;
use finplan::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "finplan",
    about = "Replay risk-assessment and goal-setting conversations from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Feed a transcript of utterances through the dialogue engine
    Replay(ReplayArgs),
    /// List the question bank with weights and enabled flags
    Questions,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Replay(args) => run_replay(args, &config),
        Command::Questions => {
            run_questions(&config);
            Ok(())
        }
    }
}
