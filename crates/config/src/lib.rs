//! Settings file management for the splunkd REST tool
//!
//! This crate handles parsing, querying, validation and writing of the
//! `splunktool.conf` settings file: connection defaults, REST endpoint
//! shortcuts and saved splunkd hosts with optional credentials.

pub mod document;
pub mod loader;
pub mod schema;
pub mod validation;
pub mod writer;

pub use document::{Document, Entry, Section};
pub use loader::{ConfigLoader, CONFIG_FILENAME};
pub use schema::*;
pub use validation::*;
