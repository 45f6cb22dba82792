use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tw_core::CompareConfig;

use tw_cli::commands::{analyze, sessions};
use tw_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match &cli.command {
        Some(Commands::Analyze {
            input,
            sessions_out,
            json,
            ceiling,
            iterations,
            seed,
        }) => {
            let config =
                Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
            tracing::debug!(?config, "loaded configuration");

            let options = analyze::AnalyzeOptions {
                ceiling_minutes: ceiling.unwrap_or(config.outlier_ceiling_minutes),
                compare: CompareConfig {
                    bootstrap_iterations: iterations.unwrap_or(config.bootstrap_iterations),
                    bootstrap_seed: seed.unwrap_or(config.bootstrap_seed),
                },
            };
            analyze::run(input, sessions_out.as_deref(), *json, &options)?;
        }
        Some(Commands::Sessions {
            input,
            out,
            ceiling,
        }) => {
            let config =
                Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
            tracing::debug!(?config, "loaded configuration");

            sessions::run(
                input,
                out.as_deref(),
                ceiling.unwrap_or(config.outlier_ceiling_minutes),
            )?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
