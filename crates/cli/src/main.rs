//! Cafe storefront CLI

use std::{io, process::ExitCode};

use tracing::error;

use crate::{commands::Shop, config::CliConfig, errors::CliError};

mod commands;
mod config;
mod errors;
mod fixtures;
mod observability;
mod render;
mod shutdown;

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration from .env and CLI arguments
    let config = match CliConfig::load() {
        Ok(config) => config,
        Err(err) => {
            _ = err.print();

            return if err.use_stderr() {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "command failed");

            #[expect(
                clippy::print_stderr,
                reason = "the failure is reported to the user even when logs are filtered out"
            )]
            {
                eprintln!("error: {err}");
            }

            ExitCode::FAILURE
        }
    }
}

async fn run(config: CliConfig) -> Result<(), CliError> {
    observability::init_subscriber(&config.logging)?;

    let shop = Shop::connect(&config).await?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    commands::run(config.command, &shop, &mut out).await
}
