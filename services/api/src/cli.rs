use crate::score::{run_score, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use contract_performance::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Contract Performance Engine",
    about = "Score insurance contract lists and serve the scoring API",
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
    /// Score a contract CSV and print collector totals
    Score(ScoreArgs),
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
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contract_performance::workflows::performance::PolicyVersion;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["contract-performance-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn score_accepts_policy_aliases() {
        let cli = Cli::try_parse_from([
            "contract-performance-api",
            "score",
            "--contracts",
            "contracts.csv",
            "--policy",
            "v2-screened",
            "--list-contracts",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.policy, Some(PolicyVersion::InlineRuleScreened));
                assert!(args.list_contracts);
                assert!(args.export_dir.is_none());
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }

    #[test]
    fn score_rejects_unknown_policies() {
        let result = Cli::try_parse_from([
            "contract-performance-api",
            "score",
            "--contracts",
            "contracts.csv",
            "--policy",
            "v9",
        ]);
        assert!(result.is_err());
    }
}
