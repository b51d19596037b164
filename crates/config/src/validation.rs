//! Configuration validation utilities
//!
//! Loading only rejects syntax errors. Everything else that looks wrong is
//! collected here as errors or warnings without changing the loaded values.

use crate::schema::{
    Config, SavedHost, ENDPOINTS_SECTION, KEY_DEFAULT_ADDRESS, KEY_DEFAULT_PASSWORD, KEY_ENDPOINT,
    KEY_POLL_INTERVAL, MAIN_SECTION,
};
use types::utils::{is_rest_path, numbered_key_index};
use types::HostPort;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate complete configuration
    pub fn validate(config: &Config) -> ValidationReport {
        let mut report = ValidationReport::new();

        Self::validate_main(config, &mut report);
        Self::validate_endpoints(config, &mut report);
        for host in config.hosts() {
            Self::validate_host(host, &mut report);
        }

        report
    }

    fn validate_main(config: &Config, report: &mut ValidationReport) {
        let field = |key: &str| format!("{}.{}", MAIN_SECTION, key);

        if let Some(raw) = config.document().get(MAIN_SECTION, KEY_POLL_INTERVAL) {
            if !raw.is_empty() && config.poll_interval().is_none() {
                report.add_warning(
                    &field(KEY_POLL_INTERVAL),
                    &format!(
                        "Bad poll interval '{}', must be a positive integer; using the default",
                        raw
                    ),
                );
            }
        }

        if let Some(address) = config.default_address() {
            if HostPort::parse(address).is_err() {
                report.add_warning(
                    &field(KEY_DEFAULT_ADDRESS),
                    &format!("Default address '{}' is not of the form host:port", address),
                );
            }
        }

        if config.default_password().is_some() {
            report.add_warning(
                &field(KEY_DEFAULT_PASSWORD),
                "Default password is stored as plain text",
            );
        }
    }

    fn validate_endpoints(config: &Config, report: &mut ValidationReport) {
        let Some(section) = config.document().section(ENDPOINTS_SECTION) else {
            return;
        };

        let mut indices = Vec::new();
        for entry in section.entries() {
            let field = format!("{}.{}", ENDPOINTS_SECTION, entry.key);
            match numbered_key_index(&entry.key, KEY_ENDPOINT) {
                Some(n) => {
                    indices.push(n);
                    if !is_rest_path(&entry.value) {
                        report.add_warning(
                            &field,
                            &format!("Endpoint '{}' should be an absolute REST path", entry.value),
                        );
                    }
                }
                None => report.add_warning(
                    &field,
                    "Key ignored, endpoints must be named endpoint.<number>",
                ),
            }
        }

        indices.sort_unstable();
        indices.dedup();
        let mut gaps = Vec::new();
        let mut expected = 0u64;
        for &n in &indices {
            if n > expected {
                gaps.push(if n - 1 == expected {
                    expected.to_string()
                } else {
                    format!("{}-{}", expected, n - 1)
                });
            }
            expected = n.saturating_add(1);
        }
        if !gaps.is_empty() {
            report.add_warning(
                ENDPOINTS_SECTION,
                &format!("Endpoint numbering has gaps at {}", gaps.join(", ")),
            );
        }
    }

    fn validate_host(host: &SavedHost, report: &mut ValidationReport) {
        let field = format!("splunkd::{}", host.address);

        if host.location.is_none() {
            report.add_error(
                &field,
                &format!("Saved host '{}' is not of the form host:port", host.address),
            );
        }

        if host.credentials.password.is_some() {
            if host.credentials.username.is_none() {
                report.add_warning(&field, "Password stored without a username");
            }
            report.add_warning(&field, "Password is stored as plain text");
        }
    }
}

/// Validation report containing errors and warnings
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

/// A validation issue (error or warning)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.errors.push(ValidationIssue {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn summary(&self) -> String {
        format!("Validation: {} errors, {} warnings", self.errors.len(), self.warnings.len())
    }
}
