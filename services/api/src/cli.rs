use crate::demo::{run_demo, run_rank, DemoArgs, RankArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use proposal_ranking::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Proposal Ranking",
    about = "Compare competing print-shop proposals for a buyer order",
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
    /// Rank the proposals in a CSV export and print the comparison
    Rank(RankArgs),
    /// Rank a built-in sample order to show the comparison output
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
        Command::Rank(args) => run_rank(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::SortArg;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["proposal-ranking-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn rank_accepts_csv_path_and_sort() {
        let cli = Cli::try_parse_from([
            "proposal-ranking-api",
            "rank",
            "--csv",
            "propostas.csv",
            "--sort",
            "price",
            "--json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Rank(args)) => {
                assert_eq!(args.csv.to_str(), Some("propostas.csv"));
                assert_eq!(args.sort, SortArg::Price);
                assert!(args.json);
            }
            other => panic!("expected rank command, got {other:?}"),
        }
    }
}
