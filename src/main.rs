//! CLI for applying view definitions to a database
//!
//! Usage:
//!   view-creator setup ./postgresql/views
//!   view-creator clean ./views.json
//!   view-creator clean-setup ./postgresql/views

use std::env;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use view_creator::{ConnectionParams, DefinitionLoader, ViewCreator};

#[derive(Debug, Clone, Copy)]
enum Command {
    Setup,
    Clean,
    CleanSetup,
}

impl Command {
    fn parse(arg: &str) -> Option<Self> {
        match arg {
            "setup" => Some(Command::Setup),
            "clean" => Some(Command::Clean),
            "clean-setup" => Some(Command::CleanSetup),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let command = match args.get(1).and_then(|a| Command::parse(a)) {
        Some(command) if args.len() == 3 => command,
        _ => {
            eprintln!("Usage: {} <setup|clean|clean-setup> <views-dir-or-manifest.json>", args[0]);
            std::process::exit(1);
        }
    };

    let _guard = init_logging();

    // Load environment from .env file if present
    if let Err(e) = dotenvy::dotenv() {
        debug!("No .env file found or error loading it: {}", e);
    }

    let params = ConnectionParams::from_env()?;
    let mut creator = ViewCreator::connect(&params).await?;

    let path = Path::new(&args[2]);
    let count = DefinitionLoader::load_into(creator.registry_mut(), path)?;
    if count == 0 {
        warn!("No view definitions found in {}", path.display());
    }

    let start_time = Instant::now();
    let result = match command {
        Command::Setup => creator.setup().await,
        Command::Clean => creator.clean().await,
        Command::CleanSetup => creator.clean_setup().await,
    };

    match result {
        Ok(names) => {
            info!(
                "{:?} completed for {} views in {}ms",
                command,
                names.len(),
                start_time.elapsed().as_millis()
            );
            Ok(())
        }
        Err(e) => {
            error!("{:?} failed: {}", command, e);
            Err(e.into())
        }
    }
}

/// Console logging, plus JSON file logging when LOG_DIR is set
fn init_logging() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,view_creator=debug"));

    let console = fmt::layer().with_target(true);

    match env::var("LOG_DIR") {
        Ok(log_dir) => {
            // Create log directory if it doesn't exist
            std::fs::create_dir_all(&log_dir).unwrap_or_else(|e| {
                eprintln!("Warning: Could not create log directory {}: {}", log_dir, e);
            });

            let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "view-creator.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_ansi(false)
                        .json()
                        .with_writer(non_blocking),
                )
                .init();

            Some(guard)
        }
        Err(_) => {
            tracing_subscriber::registry().with(filter).with(console).init();
            None
        }
    }
}
