//! Zegoop - AI explanations for selected text
//!
//! Main entry point for the Zegoop CLI and server.

mod cli;
mod commands;
mod register;
mod server;
mod view;

use clap::Parser;
use tracing::{debug, error, warn};

use zegoop_config::{ConfigError, ConfigLoader, ConfigValidator};

use cli::{Cli, Commands};
use server::{init_tracing, run_server, App};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = ConfigLoader::load_or_default(&cli.config)?;
    init_tracing(&config.logging)?;
    debug!("Configuration loaded from {}", cli.config.display());

    let validation = ConfigValidator::validate(&config);
    for warning in &validation.warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    for e in &validation.errors {
        error!("Config {}: {}", e.path, e.message);
    }
    if let Some(first) = validation.errors.into_iter().next() {
        return Err(ConfigError::InvalidValue {
            field: first.path,
            message: first.message,
        }
        .into());
    }

    let outcome = match cli.command {
        None => return run_server(config, None, None).await,
        Some(Commands::Run { host, port }) => return run_server(config, host, port).await,
        Some(Commands::Settings { action }) => {
            let app = App::start(&config).await?;
            commands::settings(&app, action).await
        }
        Some(Commands::Mode { action }) => {
            let app = App::start(&config).await?;
            commands::mode(&app, action).await
        }
        Some(Commands::Ask { request_type, text }) => {
            let app = App::start(&config).await?;
            commands::ask(&app, &config.surfaces, &request_type, &text.join(" ")).await
        }
        Some(Commands::TestProvider { provider, api_key }) => {
            let app = App::start(&config).await?;
            commands::test_provider(&app, &provider, &api_key).await
        }
    };

    // The surface has already printed the failure.
    if let Err(e) = outcome {
        debug!("Command failed: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
