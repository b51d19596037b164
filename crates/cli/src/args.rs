//! Command line arguments

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Inspect and edit the splunkd REST tool settings file
#[derive(Parser, Debug)]
#[command(name = "splunktool-conf", version, about)]
pub struct Cli {
    /// Settings file (defaults to splunktool.conf next to the executable)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level filter, e.g. info or debug
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, global = true, value_parser = ["json", "pretty"])]
    pub log_format: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print connection defaults, endpoints and saved hosts
    Show {
        #[arg(long)]
        show_passwords: bool,
    },
    /// Print REST endpoint shortcuts in order
    Endpoints,
    /// Print saved splunkd hosts
    Hosts,
    /// Print credentials stored for a host
    Credentials {
        /// Host identifier, `host:port`
        address: String,
        #[arg(long)]
        show_passwords: bool,
    },
    /// Check the file for suspicious values
    Validate,
    /// Write a default settings file
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
    /// Store credentials for a host
    SaveCredentials {
        /// Host identifier, `host:port`
        address: String,
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Dump the parsed settings
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        #[arg(long)]
        show_passwords: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Yaml,
}
