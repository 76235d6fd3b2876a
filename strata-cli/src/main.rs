use std::process::ExitCode;

use clap::{Parser, Subcommand};
use strata_runtime::{RuntimeConfig, build_engine};

mod commands;

use commands::{CliError, DispatchArgs, run_agents, run_dispatch, run_meta, run_tier};

#[derive(Parser, Debug)]
#[command(name = "strata", version)]
#[command(about = "Strata CLI - tier-aware agent dispatch")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List registered agents and their types
    Agents,
    /// Show how a raw tier value is normalised
    Tier {
        /// Raw tier value, as a caller would send it
        raw: Option<String>,
    },
    /// Show service name and version
    Meta,
    /// Dispatch an agent and print the result envelope
    Dispatch {
        /// Registered agent name
        agent: String,
        /// Input payload as a JSON object
        #[arg(long)]
        input: Option<String>,
        /// Goal, merged into the input
        #[arg(long)]
        goal: Option<String>,
        /// Constraint, merged into the input (repeatable)
        #[arg(long = "constraint")]
        constraints: Vec<String>,
        /// Deployment tier (personal, business, government)
        #[arg(long)]
        tier: Option<String>,
        /// Correlation id used to record the execution trace
        #[arg(long)]
        correlation_id: Option<String>,
        /// Also print the memory record for the correlation id
        #[arg(long)]
        show_memory: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "Command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let config = RuntimeConfig::from_env()?;
    if let Err(err) = strata_observability::init_tracing(&config.observability) {
        eprintln!("warning: {err}");
    }

    let engine = build_engine(&config);

    match cli.command {
        Commands::Agents => run_agents(&engine),
        Commands::Tier { raw } => run_tier(raw.as_deref()),
        Commands::Meta => run_meta(&config),
        Commands::Dispatch {
            agent,
            input,
            goal,
            constraints,
            tier,
            correlation_id,
            show_memory,
        } => run_dispatch(
            &engine,
            DispatchArgs {
                agent,
                input,
                goal,
                constraints,
                tier,
                correlation_id,
                show_memory,
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_dispatch_arguments_parse() {
        let cli = Cli::try_parse_from([
            "strata",
            "dispatch",
            "orchestrator",
            "--goal",
            "ship",
            "--constraint",
            "low budget",
            "--constraint",
            "two engineers",
            "--tier",
            "business",
            "--correlation-id",
            "abc",
            "--show-memory",
        ])
        .unwrap();

        match cli.command {
            Commands::Dispatch {
                agent,
                constraints,
                tier,
                correlation_id,
                show_memory,
                ..
            } => {
                assert_eq!(agent, "orchestrator");
                assert_eq!(constraints, vec!["low budget", "two engineers"]);
                assert_eq!(tier.as_deref(), Some("business"));
                assert_eq!(correlation_id.as_deref(), Some("abc"));
                assert!(show_memory);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_tier_argument_is_optional() {
        let cli = Cli::try_parse_from(["strata", "tier"]).unwrap();
        assert!(matches!(cli.command, Commands::Tier { raw: None }));
    }
}
