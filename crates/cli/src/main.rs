//! splunktool-conf - settings file tool entry point

use anyhow::{Context, Result};
use clap::Parser;
use config::ConfigLoader;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod args;
mod commands;
mod settings;

use args::Cli;
use settings::CliSettings;

fn main() -> Result<ExitCode> {
    // Load .env file if it exists
    let dotenv_result = dotenv::dotenv();

    let cli = Cli::parse();
    let settings = CliSettings::resolve(&cli)?;

    init_logging(&settings, cli.log_level.is_some())?;

    if let Some(message) = dotenv_warning(&dotenv_result) {
        warn!("Could not load .env file: {}", message);
    }

    let config_path = match settings.config {
        Some(path) => path,
        None => ConfigLoader::default_path().context("Failed to locate the settings file")?,
    };
    debug!(path = %config_path.display(), command = ?cli.command, "Running command");

    let mut stdout = std::io::stdout().lock();
    let ok = commands::run(&cli.command, &config_path, &mut stdout)?;

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// A missing `.env` is normal; anything else is worth a warning
fn dotenv_warning(result: &std::result::Result<PathBuf, dotenv::Error>) -> Option<String> {
    match result {
        Ok(_) => None,
        Err(dotenv::Error::Io(e)) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => Some(e.to_string()),
    }
}

/// `--log-level` beats `RUST_LOG`, which beats the resolved setting
fn env_filter(level: &str, flag_given: bool) -> Result<EnvFilter> {
    if !flag_given {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
    }
    EnvFilter::try_new(level).context("Invalid log level")
}

/// Initialize logging on stderr so command output stays on stdout
fn init_logging(settings: &CliSettings, flag_given: bool) -> Result<()> {
    let env_filter = env_filter(&settings.log_level, flag_given)?;

    let registry = tracing_subscriber::registry().with(env_filter);

    match settings.log_format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to initialize JSON logging")?;
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to initialize pretty logging")?;
        }
    }

    debug!(level = %settings.log_level, format = %settings.log_format, "Logging initialized");
    Ok(())
}
