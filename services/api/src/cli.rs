use crate::commands::{
    run_articles, run_evaluate, run_history, ArticlesCommand, EvaluateArgs, HistoryCommand,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use healthycheck::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Healthy Check",
    about = "Score a child's symptoms, browse saved checkups, and serve the Healthy Check API",
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
    /// Score one observation and optionally save it to the store
    Evaluate(EvaluateArgs),
    /// Browse or delete saved assessments in the remote store
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },
    /// Read the health-education article feed
    Articles {
        #[command(subcommand)]
        command: ArticlesCommand,
    },
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
        Command::Evaluate(args) => run_evaluate(args).await,
        Command::History { command } => run_history(command).await,
        Command::Articles { command } => run_articles(command).await,
    }
}
