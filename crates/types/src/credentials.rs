//! Stored login details

use serde::{Deserialize, Serialize};

/// Username and password stored for a host. Both are plaintext.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self { username, password }
    }

    /// Neither field is stored
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }

    /// Copy with the password replaced by a mask, for display and export
    pub fn masked(&self) -> Self {
        Self {
            username: self.username.clone(),
            password: self.password.as_ref().map(|_| crate::utils::PASSWORD_MASK.to_string()),
        }
    }
}

/// Values prefilled in the connection form at startup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultConnection {
    /// `host:port` of the splunkd to connect to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(flatten)]
    pub credentials: Credentials,
    /// Seconds between refreshes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_interval: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_hides_password_only() {
        let creds = Credentials::new(Some("admin".into()), Some("changeme".into()));
        let masked = creds.masked();
        assert_eq!(masked.username.as_deref(), Some("admin"));
        assert_eq!(masked.password.as_deref(), Some("********"));

        let empty = Credentials::default();
        assert!(empty.is_empty());
        assert!(empty.masked().password.is_none());
    }

    #[test]
    fn test_default_connection_serializes_flat() {
        let conn = DefaultConnection {
            address: Some("1.2.3.4:8089".into()),
            credentials: Credentials::new(Some("admin".into()), None),
            poll_interval: None,
        };
        let json = serde_json::to_value(&conn).unwrap();
        assert_eq!(json["address"], "1.2.3.4:8089");
        assert_eq!(json["username"], "admin");
        assert!(json.get("password").is_none());
        assert!(json.get("poll_interval").is_none());
    }
}
