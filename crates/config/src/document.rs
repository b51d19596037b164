//! Sectioned key-value document
//!
//! The settings file is a classic INI-style document:
//!
//! ```text
//! # comment
//! [section]
//! key = value
//! ```
//!
//! Duplicate sections are merged and duplicate keys overwrite earlier values,
//! so the last occurrence of a key always wins. Key lookups ignore ASCII case;
//! section names are matched exactly.

use std::fmt;
use std::str::FromStr;
use tracing::debug;
use types::utils::sanitize_for_logging;
use types::{ConfigError, Result};

/// A single `key=value` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

/// A named group of entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: Vec<Entry>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entries in first-seen order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key.eq_ignore_ascii_case(key))
            .map(|e| e.value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or overwrite. An overwritten entry keeps its position.
    fn insert(&mut self, key: String, value: String) {
        match self.entries.iter_mut().find(|e| e.key.eq_ignore_ascii_case(&key)) {
            Some(entry) => entry.value = value,
            None => self.entries.push(Entry { key, value }),
        }
    }

    /// Remove a key, returning its value
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.entries.iter().position(|e| e.key.eq_ignore_ascii_case(key))?;
        Some(self.entries.remove(idx).value)
    }
}

/// Parsed settings document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    sections: Vec<Section>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whole document. Any malformed line fails the parse.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut doc = Document::new();
        let mut current: Option<usize> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if line.starts_with('[') {
                let name = line
                    .strip_prefix('[')
                    .and_then(|rest| rest.strip_suffix(']'))
                    .ok_or_else(|| malformed(line_no, raw, "unterminated section header"))?
                    .trim();
                if name.is_empty() {
                    return Err(malformed(line_no, raw, "empty section name"));
                }
                current = Some(doc.section_index_or_insert(name));
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| malformed(line_no, raw, "expected `key=value`"))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(malformed(line_no, raw, "empty key"));
            }
            let idx = current
                .ok_or_else(|| malformed(line_no, raw, "entry outside of any section"))?;

            doc.sections[idx].insert(key.to_string(), value.trim().to_string());
        }

        debug!(sections = doc.sections.len(), "Parsed settings document");
        Ok(doc)
    }

    /// Sections in first-seen order
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.name == name)
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    /// Value of `key` in `section`, if both exist
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }

    /// Set a value, creating the section when needed.
    ///
    /// Rejects names and values that would not survive a write and reload.
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> Result<()> {
        let section = section.trim();
        let key = key.trim();
        let value = value.trim();

        if section.is_empty() || section.contains(['\n', '\r']) {
            return Err(invalid("section", section));
        }
        if key.is_empty() || key.contains(['=', '\n', '\r']) || key.starts_with(['#', ';', '[']) {
            return Err(invalid("key", key));
        }
        if value.contains(['\n', '\r']) {
            return Err(invalid(key, value));
        }

        let idx = self.section_index_or_insert(section);
        self.sections[idx].insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Replace every non-empty value whose section name and key match `pred`
    pub fn mask_values<F>(&mut self, pred: F, mask: &str)
    where
        F: Fn(&str, &str) -> bool,
    {
        for section in &mut self.sections {
            for entry in section.entries.iter_mut() {
                if !entry.value.is_empty() && pred(&section.name, &entry.key) {
                    entry.value = mask.to_string();
                }
            }
        }
    }

    /// Remove a whole section, returning it
    pub fn remove_section(&mut self, name: &str) -> Option<Section> {
        let idx = self.sections.iter().position(|s| s.name == name)?;
        Some(self.sections.remove(idx))
    }

    fn section_index_or_insert(&mut self, name: &str) -> usize {
        match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        }
    }
}

fn malformed(line: usize, raw: &str, reason: &str) -> ConfigError {
    let content = raw.trim_end();
    debug!(line, content = %sanitize_for_logging(content), reason, "Rejected settings line");
    ConfigError::parse(line, content, reason)
}

fn invalid(field: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

impl FromStr for Document {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Renders the document back to the file grammar. Comments are not kept.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "[{}]", section.name)?;
            for entry in &section.entries {
                writeln!(f, "{}={}", entry.key, entry.value)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# comment line
; another comment

[main]
defaultAddress = 1.2.3.4:8089
defaultUsername=admin

[endpoints]
endpoint.0=/services/server/info
"#;

    #[test]
    fn test_parse_sections_and_entries() {
        let doc = Document::parse(SAMPLE).unwrap();
        let names: Vec<_> = doc.sections().map(|s| s.name()).collect();
        assert_eq!(names, vec!["main", "endpoints"]);
        assert_eq!(doc.get("main", "defaultAddress"), Some("1.2.3.4:8089"));
        assert_eq!(doc.get("main", "defaultUsername"), Some("admin"));
        assert_eq!(doc.get("endpoints", "endpoint.0"), Some("/services/server/info"));
        assert_eq!(doc.get("main", "missing"), None);
        assert_eq!(doc.get("missing", "defaultAddress"), None);
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let doc = Document::parse("[main]\ndefaultaddress=host:1\n").unwrap();
        assert_eq!(doc.get("main", "defaultAddress"), Some("host:1"));
        assert_eq!(doc.get("Main", "defaultAddress"), None);
    }

    #[test]
    fn test_value_keeps_inner_equals_and_is_trimmed() {
        let doc = Document::parse("[s]\n  password =  a=b==c  \n").unwrap();
        assert_eq!(doc.get("s", "password"), Some("a=b==c"));
    }

    #[test]
    fn test_empty_value_is_present() {
        let doc = Document::parse("[s]\nusername=\n").unwrap();
        assert_eq!(doc.get("s", "username"), Some(""));
    }

    #[test]
    fn test_section_name_with_delimiters() {
        let doc = Document::parse("[splunkd::1.2.3.4:8089]\nusername=admin\r\n").unwrap();
        assert_eq!(doc.get("splunkd::1.2.3.4:8089", "username"), Some("admin"));
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let doc = Document::parse("[s]\na=1\nb=2\nA=3\n").unwrap();
        let section = doc.section("s").unwrap();
        assert_eq!(section.get("a"), Some("3"));
        assert_eq!(section.entries().len(), 2);
        assert_eq!(section.entries()[0].key, "a");
    }

    #[test]
    fn test_duplicate_sections_merge_last_wins() {
        let doc = Document::parse("[s]\na=1\nb=2\n[t]\nx=1\n[s]\nb=20\nc=30\n").unwrap();
        assert_eq!(doc.sections().count(), 2);
        let section = doc.section("s").unwrap();
        assert_eq!(section.get("a"), Some("1"));
        assert_eq!(section.get("b"), Some("20"));
        assert_eq!(section.get("c"), Some("30"));
    }

    #[test]
    fn test_entry_before_section_is_error() {
        let err = Document::parse("# header\nkey=value\n[main]\n").unwrap_err();
        match err {
            ConfigError::Parse { line, content, .. } => {
                assert_eq!(line, 2);
                assert_eq!(content, "key=value");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_keeps_full_line() {
        let line = "endpoint.5 /servicesNS/nobody/search/saved/searches/some_long_name";
        let err = Document::parse(&format!("[endpoints]\n{}  \n", line)).unwrap_err();
        match err {
            ConfigError::Parse { line: 2, content, .. } => assert_eq!(content, line),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_mask_values() {
        let mut doc = Document::parse("[a]\npassword=p\nuser=u\n[b]\npassword=\n").unwrap();
        doc.mask_values(|_, key| key == "password", "***");
        assert_eq!(doc.get("a", "password"), Some("***"));
        assert_eq!(doc.get("a", "user"), Some("u"));
        assert_eq!(doc.get("b", "password"), Some(""));
    }

    #[test]
    fn test_unterminated_header_is_error() {
        let err = Document::parse("[main]\na=1\n[endpoints\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_line_without_equals_is_error() {
        let err = Document::parse("[main]\njust some text\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_empty_key_and_empty_header_are_errors() {
        assert!(Document::parse("[main]\n=value\n").unwrap_err().is_parse());
        assert!(Document::parse("[ ]\n").unwrap_err().is_parse());
    }

    #[test]
    fn test_empty_input() {
        let doc = Document::parse("").unwrap();
        assert_eq!(doc.sections().count(), 0);
        let doc = Document::parse("\u{feff}# only a comment\n").unwrap();
        assert_eq!(doc.sections().count(), 0);
    }

    #[test]
    fn test_render_and_reparse() {
        let doc = Document::parse(SAMPLE).unwrap();
        let rendered = doc.to_string();
        assert_eq!(
            rendered,
            "[main]\ndefaultAddress=1.2.3.4:8089\ndefaultUsername=admin\n\n[endpoints]\nendpoint.0=/services/server/info\n"
        );
        let reparsed: Document = rendered.parse().unwrap();
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn test_set_creates_and_overwrites() {
        let mut doc = Document::new();
        doc.set("splunkd::host:8089", "username", "admin").unwrap();
        doc.set("splunkd::host:8089", "username", "root").unwrap();
        assert_eq!(doc.get("splunkd::host:8089", "username"), Some("root"));
        assert_eq!(doc.section("splunkd::host:8089").unwrap().entries().len(), 1);
    }

    #[test]
    fn test_set_rejects_unwritable_input() {
        let mut doc = Document::new();
        assert!(doc.set("", "k", "v").is_err());
        assert!(doc.set("s", "k=v", "v").is_err());
        assert!(doc.set("s", "#k", "v").is_err());
        assert!(doc.set("s", "k", "multi\nline").is_err());
        assert!(doc.set("s\nt", "k", "v").is_err());
        assert!(doc.sections().next().is_none());
    }

    #[test]
    fn test_remove() {
        let mut doc = Document::parse("[s]\na=1\nb=2\n[t]\n").unwrap();
        assert_eq!(doc.section_mut("s").unwrap().remove("A"), Some("1".to_string()));
        assert!(!doc.section("s").unwrap().contains_key("a"));
        assert!(doc.remove_section("t").is_some());
        assert!(!doc.has_section("t"));
    }
}
