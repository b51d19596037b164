//! Writing settings files back to disk

use crate::document::Document;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;
use types::{ConfigError, Result};

/// Contents written by `init` when no settings file exists yet
pub const DEFAULT_TEMPLATE: &str = r#"# splunktool.conf
#
# Settings for the splunkd REST tool. Lines starting with '#' are comments.
# Passwords below are stored as plain text; protect this file accordingly.

# Values prefilled in the connection form at startup
[main]
defaultAddress=
defaultUsername=
defaultPassword=

# REST API paths offered as shortcuts, ordered by their number
[endpoints]
endpoint.0=/services/server/info
endpoint.1=/services/server/settings

# One section per remembered splunkd: [splunkd::<host>:<port>]
# username and password are optional
[splunkd::1.2.3.4:8089]
username=admin
password=changeme

[splunkd::splunk.myhost.com:8089]
"#;

/// Replace the file at `path` with the rendered document.
///
/// The content goes to a temporary file in the same directory which is then
/// renamed over `path`, so a failed write leaves the old file intact.
pub fn write_document<P: AsRef<Path>>(path: P, document: &Document) -> Result<()> {
    let path = path.as_ref();
    write_replacing(path, &document.to_string())?;
    info!(path = %path.display(), "Wrote settings file");
    Ok(())
}

/// Write the default template. Fails with [`ConfigError::AlreadyExists`]
/// unless `overwrite` is set.
pub fn write_template<P: AsRef<Path>>(path: P, overwrite: bool) -> Result<()> {
    let path = path.as_ref();

    if overwrite {
        write_replacing(path, DEFAULT_TEMPLATE)?;
    } else {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => ConfigError::AlreadyExists {
                    path: path.to_path_buf(),
                },
                _ => ConfigError::write_failed(path, e),
            })?;
        file.write_all(DEFAULT_TEMPLATE.as_bytes())
            .map_err(|e| ConfigError::write_failed(path, e))?;
    }

    info!(path = %path.display(), "Wrote default settings file");
    Ok(())
}

fn write_replacing(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| ConfigError::write_failed(path, e))?;
    tmp.write_all(content.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| ConfigError::write_failed(path, e))?;
    tmp.persist(path)
        .map_err(|e| ConfigError::write_failed(path, e.error))?;
    Ok(())
}
