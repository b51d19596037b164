//! Configuration loader implementation

use crate::document::Document;
use crate::schema::{Config, HOST_SECTION_PREFIX, KEY_PASSWORD, KEY_USERNAME};
use crate::writer;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use types::{ConfigError, Result};

/// Fixed name of the settings file, looked up next to the executable
pub const CONFIG_FILENAME: &str = "splunktool.conf";

/// Loads and saves the settings file
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load settings from `config_path`.
    ///
    /// A missing file is reported as [`ConfigError::FileNotFound`] so callers
    /// can fall back to defaults; see [`ConfigLoader::load_or_default`].
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Config> {
        let document = Self::load_document(config_path)?;
        Ok(Config::from_document(document))
    }

    /// Load settings from a string (for testing)
    pub fn load_from_str(content: &str) -> Result<Config> {
        Ok(Config::from_document(Document::parse(content)?))
    }

    /// Load settings, treating a missing file as an empty one
    pub fn load_or_default<P: AsRef<Path>>(config_path: P) -> Result<Config> {
        match Self::load(config_path.as_ref()) {
            Err(ConfigError::FileNotFound { path }) => {
                info!(path = %path.display(), "No settings file found, using built-in defaults");
                Ok(Config::default())
            }
            other => other,
        }
    }

    /// Read and parse the raw document
    pub fn load_document<P: AsRef<Path>>(config_path: P) -> Result<Document> {
        let config_path = config_path.as_ref();
        let content = fs::read_to_string(config_path)
            .map_err(|e| ConfigError::from_io(config_path, e))?;

        debug!(path = %config_path.display(), bytes = content.len(), "Read settings file");
        Document::parse(&content)
    }

    /// `splunktool.conf` in the directory of the running executable
    pub fn default_path() -> Result<PathBuf> {
        let exe = std::env::current_exe()
            .map_err(|e| ConfigError::from_io("<current executable>", e))?;
        let dir = exe.parent().unwrap_or_else(|| Path::new("."));
        Ok(dir.join(CONFIG_FILENAME))
    }

    /// Create example configuration file
    pub fn create_example<P: AsRef<Path>>(path: P, overwrite: bool) -> Result<()> {
        writer::write_template(path, overwrite)
    }

    /// Store credentials for a splunkd in `splunkd::<address>`.
    ///
    /// The file is re-read first so other sections are kept; a missing file
    /// is created. Comments in an existing file are not preserved.
    pub fn save_host_credentials<P: AsRef<Path>>(
        path: P,
        address: &str,
        username: &str,
        password: &str,
    ) -> Result<Config> {
        let path = path.as_ref();
        let address = address.trim();
        if address.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "address".to_string(),
                value: address.to_string(),
            });
        }

        let mut document = match Self::load_document(path) {
            Ok(document) => document,
            Err(ConfigError::FileNotFound { .. }) => Document::new(),
            Err(e) => return Err(e),
        };

        let section = format!("{}{}", HOST_SECTION_PREFIX, address);
        document.set(&section, KEY_USERNAME, username)?;
        document.set(&section, KEY_PASSWORD, password)?;

        writer::write_document(path, &document)?;
        info!(address, "Saved credentials for host");

        Ok(Config::from_document(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const FULL: &str = r#"
# settings
[main]
defaultAddress=1.2.3.4:8089
defaultUsername=admin
defaultPassword=changeme

[endpoints]
endpoint.1=/a
endpoint.0=/b
endpoint.3=/c

[splunkd::1.2.3.4:8089]
username=admin

[splunkd::splunk.myhost.com:8089]
"#;

    fn temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_from_file() {
        let file = temp_config(FULL);
        let config = ConfigLoader::load(file.path()).unwrap();

        assert_eq!(config.default_address(), Some("1.2.3.4:8089"));
        assert_eq!(config.default_username(), Some("admin"));
        assert_eq!(config.default_password(), Some("changeme"));
        assert_eq!(config.endpoints(), ["/b", "/a", "/c"]);

        let hosts = config.saved_hosts();
        assert_eq!(hosts.len(), 2);
        assert!(hosts.contains(&"1.2.3.4:8089"));
        assert!(hosts.contains(&"splunk.myhost.com:8089"));

        let creds = config.host_credentials("splunk.myhost.com:8089");
        assert_eq!(creds.username, None);
        assert_eq!(creds.password, None);
        assert_eq!(config.host_credentials("1.2.3.4:8089").username.as_deref(), Some("admin"));
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = ConfigLoader::load(dir.path().join("absent.conf")).unwrap_err();
        assert!(err.is_not_found());
        assert!(!err.is_parse());
    }

    #[test]
    fn test_load_malformed_file_is_parse_error() {
        let file = temp_config("key=value\n[main]\n");
        let err = ConfigLoader::load(file.path()).unwrap_err();
        assert!(err.is_parse());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_load_or_default() {
        let dir = TempDir::new().unwrap();
        let config = ConfigLoader::load_or_default(dir.path().join("absent.conf")).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.endpoints().is_empty());

        let file = temp_config("[main\n");
        assert!(ConfigLoader::load_or_default(file.path()).unwrap_err().is_parse());
    }

    #[test]
    fn test_load_twice_is_equal() {
        let file = temp_config(FULL);
        let first = ConfigLoader::load(file.path()).unwrap();
        let second = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, ConfigLoader::load_from_str(FULL).unwrap());
    }

    #[test]
    fn test_round_trip_through_writer() {
        let file = temp_config(FULL);
        let config = ConfigLoader::load(file.path()).unwrap();

        let dir = TempDir::new().unwrap();
        let out = dir.path().join("copy.conf");
        writer::write_document(&out, config.document()).unwrap();

        let reloaded = ConfigLoader::load(&out).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_create_example_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        ConfigLoader::create_example(&path, false).unwrap();

        let config = ConfigLoader::load(&path).unwrap();
        assert_eq!(config.endpoints(), ["/services/server/info", "/services/server/settings"]);
        assert_eq!(config.saved_hosts(), vec!["1.2.3.4:8089", "splunk.myhost.com:8089"]);
        assert_eq!(config.default_address(), None);
    }

    #[test]
    fn test_save_host_credentials_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);

        let saved = ConfigLoader::save_host_credentials(&path, "10.0.0.1:8089", "admin", "s3cr=t").unwrap();
        assert_eq!(saved.saved_hosts(), vec!["10.0.0.1:8089"]);

        let config = ConfigLoader::load(&path).unwrap();
        let creds = config.host_credentials("10.0.0.1:8089");
        assert_eq!(creds.username.as_deref(), Some("admin"));
        assert_eq!(creds.password.as_deref(), Some("s3cr=t"));
    }

    #[test]
    fn test_save_host_credentials_keeps_other_sections() {
        let file = temp_config(FULL);
        ConfigLoader::save_host_credentials(file.path(), "splunk.myhost.com:8089", "ops", "pw").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.default_username(), Some("admin"));
        assert_eq!(config.endpoints(), ["/b", "/a", "/c"]);
        assert_eq!(config.host_credentials("splunk.myhost.com:8089").username.as_deref(), Some("ops"));
        assert_eq!(config.host_credentials("1.2.3.4:8089").username.as_deref(), Some("admin"));
    }

    #[test]
    fn test_save_host_credentials_rejects_bad_input() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        assert!(ConfigLoader::save_host_credentials(&path, "  ", "u", "p").is_err());
        assert!(ConfigLoader::save_host_credentials(&path, "h:1", "u", "line\nbreak").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_save_host_credentials_into_missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope").join(CONFIG_FILENAME);

        let err = ConfigLoader::save_host_credentials(&path, "h:1", "u", "p").unwrap_err();
        assert!(!err.is_not_found());
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_save_host_credentials_refuses_malformed_file() {
        let file = temp_config("orphan=1\n");
        let err = ConfigLoader::save_host_credentials(file.path(), "h:1", "u", "p").unwrap_err();
        assert!(err.is_parse());
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "orphan=1\n");
    }

    #[test]
    fn test_default_path_has_fixed_name() {
        let path = ConfigLoader::default_path().unwrap();
        assert_eq!(path.file_name().unwrap(), CONFIG_FILENAME);
    }
}
