//! Mapped domain records

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

static SCHEME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z][a-z0-9+.\-]*://").expect("scheme pattern is valid")
});

/// Whether a domain is served with or without the `www.` prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WwwRule {
    /// Leave the host as requested
    #[default]
    Auto,
    Always,
    Never,
}

impl WwwRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            WwwRule::Auto => "auto",
            WwwRule::Always => "always",
            WwwRule::Never => "never",
        }
    }
}

impl fmt::Display for WwwRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WwwRule {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(WwwRule::Auto),
            "always" => Ok(WwwRule::Always),
            "never" => Ok(WwwRule::Never),
            other => anyhow::bail!("Invalid www rule '{}'. Valid values: auto, always, never", other),
        }
    }
}

fn default_active() -> bool {
    true
}

/// A custom domain mapped to one site of the network
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Domain {
    /// Sanitized domain name, also the directory key
    pub name: String,
    /// Site (blog) id the domain serves
    #[serde(default)]
    pub site: u64,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Canonical domain of its site
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub www: WwwRule,
    #[serde(default)]
    pub https: bool,
    /// Domain every request is redirected to, if any
    #[serde(default)]
    pub redirect: Option<String>,
}

/// Fields a domain record carries
pub const FIELDS: &[&str] = &["name", "site", "active", "primary", "www", "https", "redirect"];

impl Domain {
    /// Active, non-primary domain for `site` with default preferences
    pub fn new(name: &str, site: u64) -> Result<Self> {
        let name = sanitize(name);
        if name.is_empty() {
            anyhow::bail!("Domain name must not be empty");
        }
        Ok(Self {
            name,
            site,
            active: true,
            primary: false,
            www: WwwRule::Auto,
            https: false,
            redirect: None,
        })
    }

    /// Build a domain from a persisted config record
    ///
    /// `name` always comes from the directory key, any `name` inside the
    /// record is ignored.
    pub fn from_config(name: &str, config: &Value) -> Result<Self> {
        let mut record = match config {
            Value::Object(map) => map.clone(),
            other => anyhow::bail!("Config for domain '{}' is not an object: {}", name, other),
        };

        let name = sanitize(name);
        if name.is_empty() {
            anyhow::bail!("Domain name must not be empty");
        }
        record.insert("name".to_string(), Value::String(name.clone()));

        let mut domain: Domain = serde_json::from_value(Value::Object(record))
            .with_context(|| format!("Invalid config for domain '{}'", name))?;
        domain.normalize();
        Ok(domain)
    }

    /// Sanitize `name` and the redirect target, dropping an empty target
    pub fn normalize(&mut self) {
        self.name = sanitize(&self.name);
        self.redirect = self
            .redirect
            .take()
            .map(|target| sanitize(&target))
            .filter(|target| !target.is_empty());
    }

    /// Serialize to a config record, `name` included
    ///
    /// Names are written in sanitized form, the same as `from_config` reads
    /// them back.
    pub fn dump(&self) -> Map<String, Value> {
        let mut normalized = self.clone();
        normalized.normalize();
        normalized.record()
    }

    fn record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        for field in FIELDS {
            if let Some(value) = self.field(field) {
                if !value.is_null() {
                    record.insert(field.to_string(), value);
                }
            }
        }
        record
    }

    /// Value of one named field, `None` if the domain has no such field
    pub fn field(&self, field: &str) -> Option<Value> {
        let value = match field {
            "name" => Value::String(self.name.clone()),
            "site" => Value::from(self.site),
            "active" => Value::Bool(self.active),
            "primary" => Value::Bool(self.primary),
            "www" => Value::String(self.www.to_string()),
            "https" => Value::Bool(self.https),
            "redirect" => self
                .redirect
                .as_ref()
                .map(|target| Value::String(target.clone()))
                .unwrap_or(Value::Null),
            _ => return None,
        };
        Some(value)
    }
}

/// Normalize a raw domain name to the form used as directory key
///
/// Lower-cases, drops any scheme, credentials, path, query, fragment and
/// port, and strips surrounding dots.
pub fn sanitize(raw: &str) -> String {
    let lowered = raw.trim().to_ascii_lowercase();
    let without_scheme = SCHEME.replace(&lowered, "");

    let host = without_scheme
        .split(|c: char| c == '/' || c == '?' || c == '#')
        .next()
        .unwrap_or("");
    let host = host.rsplit('@').next().unwrap_or(host);

    let host = match host.rsplit_once(':') {
        Some((head, port)) if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) => head,
        Some((head, "")) => head,
        _ => host,
    };

    host.trim_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("Example.COM"), "example.com");
        assert_eq!(sanitize("  https://Example.com/path?q=1 "), "example.com");
        assert_eq!(sanitize("http://user:pw@example.com:8080/"), "example.com");
        assert_eq!(sanitize("www.example.com."), "www.example.com");
        assert_eq!(sanitize("example.com#top"), "example.com");
        assert_eq!(sanitize("example.com:"), "example.com");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for raw in ["HTTPS://A.b.c:443/x", "shop.example.org", ".odd.example."] {
            let once = sanitize(raw);
            assert_eq!(sanitize(&once), once);
        }
    }

    #[test]
    fn test_from_config_injects_name() {
        let domain = Domain::from_config(
            "Example.com",
            &json!({"name": "other.com", "primary": true, "site": 3}),
        )
        .unwrap();

        assert_eq!(domain.name, "example.com");
        assert!(domain.primary);
        assert!(domain.active);
        assert_eq!(domain.site, 3);
        assert_eq!(domain.www, WwwRule::Auto);
        assert_eq!(domain.redirect, None);
    }

    #[test]
    fn test_from_config_ignores_unknown_fields() {
        let domain = Domain::from_config("example.com", &json!({"legacy": 1, "www": "never"})).unwrap();
        assert_eq!(domain.www, WwwRule::Never);
    }

    #[test]
    fn test_from_config_rejects_bad_records() {
        assert!(Domain::from_config("example.com", &json!("primary")).is_err());
        assert!(Domain::from_config("example.com", &json!({"www": "sometimes"})).is_err());
        assert!(Domain::from_config("/", &json!({})).is_err());
    }

    #[test]
    fn test_dump_and_field() {
        let mut domain = Domain::new("shop.example.com", 2).unwrap();
        domain.redirect = Some("example.com".to_string());

        let record = domain.dump();
        assert_eq!(record.get("name"), Some(&json!("shop.example.com")));
        assert_eq!(record.get("redirect"), Some(&json!("example.com")));
        assert_eq!(record.get("www"), Some(&json!("auto")));

        domain.redirect = None;
        assert!(!domain.dump().contains_key("redirect"));
        assert_eq!(domain.field("redirect"), Some(Value::Null));
        assert_eq!(domain.field("site"), Some(json!(2)));
        assert_eq!(domain.field("color"), None);
    }

    #[test]
    fn test_dump_matches_reload() {
        let mut domain = Domain::new("shop.example.com", 2).unwrap();
        domain.redirect = Some("https://X.com/landing".to_string());

        let record = domain.dump();
        assert_eq!(record.get("redirect"), Some(&json!("x.com")));

        let reloaded = Domain::from_config("shop.example.com", &Value::Object(record)).unwrap();
        assert_eq!(reloaded.dump(), domain.dump());

        domain.redirect = Some("/".to_string());
        assert!(!domain.dump().contains_key("redirect"));
    }

    #[test]
    fn test_www_rule_parse() {
        assert_eq!("Always".parse::<WwwRule>().unwrap(), WwwRule::Always);
        assert!("sometimes".parse::<WwwRule>().is_err());
    }
}
