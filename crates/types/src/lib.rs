//! Shared types for the splunktool settings workspace
//!
//! This crate contains the domain types used by the settings loader and the
//! command line front-end: saved host locations, stored credentials and the
//! error type returned by every loader operation.

pub mod credentials;
pub mod error;
pub mod host;
pub mod utils;

// Re-export commonly used types
pub use credentials::{Credentials, DefaultConnection};
pub use error::{ConfigError, Result};
pub use host::HostPort;
