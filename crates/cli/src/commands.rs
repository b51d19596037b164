//! Command implementations
//!
//! Every command writes its output to the given writer so it can be captured
//! in tests; diagnostics go through `tracing`.

use crate::args::{Command, ExportFormat};
use anyhow::{Context, Result};
use config::{Config, ConfigLoader, ConfigValidator, ValidationIssue};
use std::io::Write;
use std::path::Path;
use tracing::info;
use types::utils::mask_secret;
use types::Credentials;

/// Run `command` against the settings file at `path`.
///
/// Returns `false` when the command completed but found problems
/// (currently only `validate`).
pub fn run<W: Write>(command: &Command, path: &Path, out: &mut W) -> Result<bool> {
    match command {
        Command::Show { show_passwords } => {
            let config = load(path)?;
            show(&config, path, *show_passwords, out)?;
        }
        Command::Endpoints => {
            for endpoint in load(path)?.endpoints() {
                writeln!(out, "{}", endpoint)?;
            }
        }
        Command::Hosts => {
            for host in load(path)?.saved_hosts() {
                writeln!(out, "{}", host)?;
            }
        }
        Command::Credentials {
            address,
            show_passwords,
        } => {
            let config = load(path)?;
            if config.saved_host(address).is_none() {
                info!(address = %address, "Host is not saved in the settings file");
            }
            let creds = config.host_credentials(address);
            writeln!(out, "username: {}", creds.username.as_deref().unwrap_or(""))?;
            writeln!(out, "password: {}", password(&creds, *show_passwords))?;
        }
        Command::Validate => {
            let config = load(path)?;
            let report = ConfigValidator::validate(&config);
            print_issues(out, "error", &report.errors)?;
            print_issues(out, "warning", &report.warnings)?;
            writeln!(out, "{}", report.summary())?;
            return Ok(report.is_valid());
        }
        Command::Init { force } => {
            ConfigLoader::create_example(path, *force)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            writeln!(out, "Wrote {}", path.display())?;
        }
        Command::SaveCredentials {
            address,
            username,
            password,
        } => {
            ConfigLoader::save_host_credentials(path, address, username, password)
                .with_context(|| format!("Failed to save credentials to {}", path.display()))?;
            writeln!(out, "Saved credentials for {} in {}", address, path.display())?;
        }
        Command::Export {
            format,
            show_passwords,
        } => {
            let config = load(path)?;
            let view = if *show_passwords { config } else { config.redacted() };
            let rendered = match format {
                ExportFormat::Json => serde_json::to_string_pretty(&view)
                    .context("Failed to serialize settings as JSON")?,
                ExportFormat::Yaml => serde_yaml::to_string(&view)
                    .context("Failed to serialize settings as YAML")?,
            };
            writeln!(out, "{}", rendered.trim_end())?;
        }
    }

    Ok(true)
}

fn load(path: &Path) -> Result<Config> {
    ConfigLoader::load_or_default(path)
        .with_context(|| format!("Failed to load settings from {}", path.display()))
}

fn password(creds: &Credentials, show: bool) -> &str {
    let stored = creds.password.as_deref();
    let shown = if show { stored } else { mask_secret(stored) };
    shown.unwrap_or("")
}

fn show<W: Write>(config: &Config, path: &Path, show_passwords: bool, out: &mut W) -> Result<()> {
    let or_none = |v: Option<&str>| v.unwrap_or("(none)").to_string();

    writeln!(out, "Settings file: {}", path.display())?;
    writeln!(out)?;
    writeln!(out, "Default address:  {}", or_none(config.default_address()))?;
    writeln!(out, "Default username: {}", or_none(config.default_username()))?;
    let default_password = if show_passwords {
        config.default_password()
    } else {
        mask_secret(config.default_password())
    };
    writeln!(out, "Default password: {}", or_none(default_password))?;
    let poll = config
        .poll_interval()
        .map_or_else(|| "(none)".to_string(), |secs| format!("{}s", secs));
    writeln!(out, "Poll interval:    {}", poll)?;

    writeln!(out)?;
    writeln!(out, "Endpoints:")?;
    for endpoint in config.endpoints() {
        writeln!(out, "  {}", endpoint)?;
    }

    writeln!(out)?;
    writeln!(out, "Saved hosts:")?;
    for host in config.hosts() {
        let creds = &host.credentials;
        write!(out, "  {}", host.address)?;
        if let Some(username) = &creds.username {
            write!(out, "  username={}", username)?;
        }
        if creds.password.is_some() {
            write!(out, "  password={}", password(creds, show_passwords))?;
        }
        writeln!(out)?;
    }

    Ok(())
}

fn print_issues<W: Write>(out: &mut W, level: &str, issues: &[ValidationIssue]) -> Result<()> {
    for issue in issues {
        writeln!(out, "{}: [{}] {}", level, issue.field, issue.message)?;
    }
    Ok(())
}
