use crate::demo::{run_catalog, run_demo, run_score, DemoArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use plan_scorer::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Plan Scorer",
    about = "Score and rank urban design proposals against weighted indicators",
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
    /// Score proposals from a CSV or JSON file and print the ranking
    Score(ScoreArgs),
    /// List the indicator catalog with default weights
    Catalog,
    /// Score a built-in set of sample proposals
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
        Command::Score(args) => run_score(args),
        Command::Catalog => run_catalog(),
        Command::Demo(args) => run_demo(args),
    }
}
