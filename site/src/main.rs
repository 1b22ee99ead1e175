use clap::Parser;
use log::{info, LevelFilter};
use std::process::ExitCode;
use std::time::Duration;
use trailfinder_site::calculator::{estimate, render_calculator_error, render_estimate};
use trailfinder_site::config::SiteConfig;
use trailfinder_site::hikes::{render_hikes_grid, UPCOMING_HIKES};
use trailfinder_site::preferences::{DIFFICULTY_GROUP, VIBE_GROUP};
use trailfinder_site::{
    collect, render_state, FormSnapshot, HttpProxyTransport, SubmissionController,
    SubmissionState,
};

mod cli;
mod output;

use crate::cli::{Args, Command};
use crate::output::{print_control, print_fragment};

fn level_filter(level: Option<&str>, verbose: bool) -> LevelFilter {
    if verbose {
        return LevelFilter::Debug;
    }
    level
        .map(|level| match level.to_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            _ => LevelFilter::Warn,
        })
        .unwrap_or(LevelFilter::Warn)
}

/// Main function - runs one widget from the command line
#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Parse command-line arguments
    let args = Args::parse();

    // Load site configuration
    let config = match &args.config {
        Some(path) => SiteConfig::load_from_file(path),
        None => SiteConfig::load_from_default(),
    }
    .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    // Initialize logger with configured log level
    let log_level = level_filter(config.log_level.as_deref(), args.verbose);
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level.to_string()),
    )
    .init();

    match args.command {
        Command::Suggest {
            difficulties,
            vibes,
            proxy_url,
        } => {
            let form: FormSnapshot = difficulties
                .iter()
                .map(|value| (DIFFICULTY_GROUP, value.as_str()))
                .chain(vibes.iter().map(|value| (VIBE_GROUP, value.as_str())))
                .collect();
            let preferences = collect(&form);

            let url = proxy_url.unwrap_or_else(|| config.proxy_url());
            let transport =
                HttpProxyTransport::new(url, Duration::from_secs(config.request_timeout_secs()))
                    .map_err(|e| anyhow::anyhow!("Failed to create proxy transport: {}", e))?;
            info!("Using trail finder proxy at {}", transport.url());

            let mut controller = SubmissionController::new(transport);
            let mut states = controller.subscribe();
            let watcher = tokio::spawn(async move {
                while states.changed().await.is_ok() {
                    let control = states.borrow_and_update().control();
                    print_control(&control);
                }
            });

            let state = controller.submit(preferences).await;
            // Dropping the controller closes the state channel and ends the watcher
            drop(controller);
            watcher.await.ok();

            if let Some(fragment) = render_state(&state).fragment {
                print_fragment(&fragment, args.html);
            }
            Ok(match state {
                SubmissionState::Success(_) => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            })
        }
        Command::Calculate {
            distance,
            elevation,
            pace,
        } => match estimate(&distance, &elevation, &pace) {
            Ok(result) => {
                print_fragment(&render_estimate(&result), args.html);
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                print_fragment(&render_calculator_error(&e), args.html);
                Ok(ExitCode::FAILURE)
            }
        },
        Command::Hikes => {
            for card in render_hikes_grid(&UPCOMING_HIKES) {
                print_fragment(&card, args.html);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
