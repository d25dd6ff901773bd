//! Runtime settings of the CLI: where the store lives and how strict to be

use crate::registry::Strictness;
use crate::storage::BlobKeys;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub const ENV_DB: &str = "DOMAIN_MAPPER_DB";
pub const ENV_STRICT: &str = "DOMAIN_MAPPER_STRICT";
pub const ENV_OPTIONS_KEY: &str = "DOMAIN_MAPPER_OPTIONS_KEY";
pub const ENV_DOMAINS_KEY: &str = "DOMAIN_MAPPER_DOMAINS_KEY";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub strictness: Strictness,
    pub keys: BlobKeys,
}

impl AppConfig {
    /// Get the path to the default SQLite database file
    pub fn default_db_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("domain-mapper")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".domain-mapper")
        };

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            log::info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir.join("config.db"))
    }

    /// Resolve settings from flags, then the environment, then defaults
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn resolve(db_flag: Option<PathBuf>, strict_flag: bool) -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {:?}", path);
        }

        Self::from_lookup(db_flag, strict_flag, |key| std::env::var(key).ok())
    }

    /// Same as `resolve`, reading variables through `lookup`
    pub fn from_lookup(
        db_flag: Option<PathBuf>,
        strict_flag: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let db_path = match db_flag.or_else(|| lookup(ENV_DB).map(PathBuf::from)) {
            Some(path) => path,
            None => Self::default_db_path()?,
        };

        let strict_env = match lookup(ENV_STRICT) {
            Some(raw) => parse_flag(&raw)
                .with_context(|| format!("Invalid value for {}: '{}'", ENV_STRICT, raw))?,
            None => false,
        };
        let strictness = if strict_flag || strict_env {
            Strictness::Strict
        } else {
            Strictness::Warn
        };

        let defaults = BlobKeys::default();
        let keys = BlobKeys {
            options: lookup(ENV_OPTIONS_KEY).unwrap_or(defaults.options),
            domains: lookup(ENV_DOMAINS_KEY).unwrap_or(defaults.domains),
        };
        if keys.options == keys.domains {
            anyhow::bail!("Options and domains must be stored under different keys ('{}')", keys.options);
        }

        log::debug!("Using database {:?} ({:?})", db_path, strictness);
        Ok(Self {
            db_path,
            strictness,
            keys,
        })
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => anyhow::bail!("expected a boolean"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_flag_beats_environment() {
        let config = AppConfig::from_lookup(
            Some(PathBuf::from("/tmp/flag.db")),
            false,
            env(&[(ENV_DB, "/tmp/env.db")]),
        )
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/flag.db"));
        assert_eq!(config.strictness, Strictness::Warn);
        assert_eq!(config.keys, BlobKeys::default());
    }

    #[test]
    fn test_environment_settings() {
        let config = AppConfig::from_lookup(
            None,
            false,
            env(&[
                (ENV_DB, "/tmp/env.db"),
                (ENV_STRICT, "yes"),
                (ENV_OPTIONS_KEY, "site_options"),
            ]),
        )
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/env.db"));
        assert_eq!(config.strictness, Strictness::Strict);
        assert_eq!(config.keys.options, "site_options");
        assert_eq!(config.keys.domains, crate::storage::DEFAULT_DOMAINS_KEY);
    }

    #[test]
    fn test_invalid_settings() {
        let bad_strict = AppConfig::from_lookup(
            Some(PathBuf::from("/tmp/x.db")),
            false,
            env(&[(ENV_STRICT, "sometimes")]),
        );
        assert!(bad_strict.is_err());

        let same_keys = AppConfig::from_lookup(
            Some(PathBuf::from("/tmp/x.db")),
            false,
            env(&[(ENV_OPTIONS_KEY, "blob"), (ENV_DOMAINS_KEY, "blob")]),
        );
        assert!(same_keys.is_err());
    }
}
