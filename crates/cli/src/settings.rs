//! Settings of the command line tool itself

use crate::args::Cli;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Runtime settings, resolved from defaults, `SPLUNKTOOL_*` environment
/// variables and finally command line flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliSettings {
    /// Settings file to operate on
    pub config: Option<PathBuf>,
    pub log_level: String,
    /// json or pretty
    pub log_format: String,
}

impl Default for CliSettings {
    fn default() -> Self {
        Self {
            config: None,
            log_level: "warn".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl CliSettings {
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(CliSettings::default()))
            .merge(Env::prefixed("SPLUNKTOOL_").only(&["config", "log_level", "log_format"]))
    }

    /// Resolve settings, letting explicit flags win over the environment
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut settings: CliSettings = Self::figment()
            .extract()
            .context("Failed to read SPLUNKTOOL_* settings")?;

        if let Some(path) = &cli.config {
            settings.config = Some(path.clone());
        }
        if let Some(level) = &cli.log_level {
            settings.log_level = level.clone();
        }
        if let Some(format) = &cli.log_format {
            settings.log_format = format.clone();
        }

        Ok(settings)
    }
}
