//! Typed view over the settings document

use crate::document::Document;
use serde::Serialize;
use tracing::{debug, warn};
use types::utils::{numbered_key_index, PASSWORD_MASK};
use types::{Credentials, DefaultConnection, HostPort};

/// Section holding the connection form defaults
pub const MAIN_SECTION: &str = "main";
/// Section holding the REST endpoint shortcuts
pub const ENDPOINTS_SECTION: &str = "endpoints";
/// Prefix of saved splunkd host sections
pub const HOST_SECTION_PREFIX: &str = "splunkd::";

pub const KEY_DEFAULT_ADDRESS: &str = "defaultAddress";
pub const KEY_DEFAULT_USERNAME: &str = "defaultUsername";
pub const KEY_DEFAULT_PASSWORD: &str = "defaultPassword";
pub const KEY_POLL_INTERVAL: &str = "pollInterval";
pub const KEY_ENDPOINT: &str = "endpoint";
pub const KEY_USERNAME: &str = "username";
pub const KEY_PASSWORD: &str = "password";

/// A remembered splunkd location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedHost {
    /// Identifier as written after `splunkd::`, e.g. `1.2.3.4:8089`
    pub address: String,
    /// Structured form, `None` when the identifier is not `host:port`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<HostPort>,
    #[serde(flatten)]
    pub credentials: Credentials,
}

/// Loaded settings.
///
/// Built once from a [`Document`] and never mutated afterwards; pass it by
/// reference to whatever needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Config {
    #[serde(skip)]
    document: Document,
    defaults: DefaultConnection,
    endpoints: Vec<String>,
    hosts: Vec<SavedHost>,
}

impl Config {
    /// Derive the typed view from a parsed document
    pub fn from_document(document: Document) -> Self {
        let defaults = read_defaults(&document);
        let endpoints = read_endpoints(&document);
        let hosts = read_hosts(&document);

        debug!(
            endpoints = endpoints.len(),
            hosts = hosts.len(),
            "Settings loaded"
        );

        Self {
            document,
            defaults,
            endpoints,
            hosts,
        }
    }

    /// Raw sections, including ones this crate does not interpret
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn defaults(&self) -> &DefaultConnection {
        &self.defaults
    }

    pub fn default_address(&self) -> Option<&str> {
        self.defaults.address.as_deref()
    }

    pub fn default_username(&self) -> Option<&str> {
        self.defaults.credentials.username.as_deref()
    }

    pub fn default_password(&self) -> Option<&str> {
        self.defaults.credentials.password.as_deref()
    }

    /// Refresh interval in seconds, if set to a positive integer
    pub fn poll_interval(&self) -> Option<u64> {
        self.defaults.poll_interval
    }

    /// REST endpoint shortcuts ordered by their numeric suffix
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Saved host identifiers in file order
    pub fn saved_hosts(&self) -> Vec<&str> {
        self.hosts.iter().map(|h| h.address.as_str()).collect()
    }

    pub fn hosts(&self) -> &[SavedHost] {
        &self.hosts
    }

    pub fn saved_host(&self, address: &str) -> Option<&SavedHost> {
        self.hosts.iter().find(|h| h.address == address)
    }

    /// Stored credentials for `address`; empty when nothing is stored
    pub fn host_credentials(&self, address: &str) -> Credentials {
        self.saved_host(address)
            .map(|h| h.credentials.clone())
            .unwrap_or_default()
    }

    /// Copy with every password masked, in the typed view and in the raw
    /// document, for display and export
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.document.mask_values(
            |section, key| {
                (section == MAIN_SECTION && key.eq_ignore_ascii_case(KEY_DEFAULT_PASSWORD))
                    || (section.starts_with(HOST_SECTION_PREFIX)
                        && key.eq_ignore_ascii_case(KEY_PASSWORD))
            },
            PASSWORD_MASK,
        );
        copy.defaults.credentials = copy.defaults.credentials.masked();
        for host in &mut copy.hosts {
            host.credentials = host.credentials.masked();
        }
        copy
    }
}

/// Blank values read the same as missing ones
fn owned(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

fn read_defaults(document: &Document) -> DefaultConnection {
    let get = |key| document.get(MAIN_SECTION, key);

    let poll_interval = get(KEY_POLL_INTERVAL)
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => Some(secs),
            _ => {
                warn!(value = raw, "Ignoring pollInterval, must be a positive integer");
                None
            }
        });

    DefaultConnection {
        address: owned(get(KEY_DEFAULT_ADDRESS)),
        credentials: Credentials::new(
            owned(get(KEY_DEFAULT_USERNAME)),
            owned(get(KEY_DEFAULT_PASSWORD)),
        ),
        poll_interval,
    }
}

fn read_endpoints(document: &Document) -> Vec<String> {
    let Some(section) = document.section(ENDPOINTS_SECTION) else {
        return Vec::new();
    };

    let mut numbered: Vec<(u64, &str)> = section
        .entries()
        .iter()
        .filter_map(|e| numbered_key_index(&e.key, KEY_ENDPOINT).map(|n| (n, e.value.as_str())))
        .collect();
    // `endpoint.1` and `endpoint.01` share an index; the later line wins
    numbered.sort_by_key(|(n, _)| *n);
    numbered.dedup_by(|later, earlier| {
        if later.0 == earlier.0 {
            earlier.1 = later.1;
            true
        } else {
            false
        }
    });

    numbered.into_iter().map(|(_, v)| v.to_string()).collect()
}

fn read_hosts(document: &Document) -> Vec<SavedHost> {
    document
        .sections()
        .filter_map(|section| {
            let address = section.name().strip_prefix(HOST_SECTION_PREFIX)?;
            if address.is_empty() {
                warn!("Ignoring saved host section with an empty address");
                return None;
            }
            Some(SavedHost {
                address: address.to_string(),
                location: HostPort::parse(address).ok(),
                credentials: Credentials::new(
                    owned(section.get(KEY_USERNAME)),
                    owned(section.get(KEY_PASSWORD)),
                ),
            })
        })
        .collect()
}
