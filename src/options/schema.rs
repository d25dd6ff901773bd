//! Whitelist of option definitions plus deprecated aliases

use super::types::OptionDefinition;
use anyhow::Result;
use std::collections::HashMap;

/// The set of recognized options and the names they used to go by
#[derive(Debug, Clone, Default)]
pub struct OptionsSchema {
    definitions: HashMap<String, OptionDefinition>,
    deprecated: HashMap<String, String>,
}

impl OptionsSchema {
    /// Create a new empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new option definition
    ///
    /// Returns an error if an option with the same key is already registered
    /// or the key is in use as a deprecated alias
    pub fn register(&mut self, def: OptionDefinition) -> Result<()> {
        if self.definitions.contains_key(&def.key) {
            anyhow::bail!("Option '{}' is already registered", def.key);
        }
        if self.deprecated.contains_key(&def.key) {
            anyhow::bail!("Option '{}' is registered as a deprecated alias", def.key);
        }
        log::debug!("Registered option: {} ({})", def.key, def.display_name);
        self.definitions.insert(def.key.clone(), def);
        Ok(())
    }

    /// Retire `old` in favour of the already registered `replacement`
    pub fn deprecate(&mut self, old: &str, replacement: &str) -> Result<()> {
        if !self.definitions.contains_key(replacement) {
            anyhow::bail!(
                "Cannot deprecate '{}': replacement '{}' is not registered",
                old,
                replacement
            );
        }
        if self.definitions.contains_key(old) {
            anyhow::bail!("Cannot deprecate '{}': it is a registered option", old);
        }
        log::debug!("Deprecated option: {} -> {}", old, replacement);
        self.deprecated.insert(old.to_string(), replacement.to_string());
        Ok(())
    }

    /// Current name for `name`, following a deprecated alias if there is one
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        match self.deprecated.get(name) {
            Some(replacement) => {
                log::debug!("Option '{}' is deprecated, using '{}'", name, replacement);
                replacement.as_str()
            }
            None => name,
        }
    }

    /// Check if an option is recognized, after alias resolution
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(self.resolve(name))
    }

    /// Get option definition, after alias resolution
    pub fn get(&self, name: &str) -> Option<&OptionDefinition> {
        self.definitions.get(self.resolve(name))
    }

    /// Check whether `name` is a deprecated alias
    pub fn is_deprecated(&self, name: &str) -> bool {
        self.deprecated.contains_key(name)
    }

    /// Deprecated aliases that point at `name`
    pub fn aliases_of(&self, name: &str) -> Vec<&str> {
        let mut aliases: Vec<_> = self
            .deprecated
            .iter()
            .filter(|(_, replacement)| replacement.as_str() == name)
            .map(|(old, _)| old.as_str())
            .collect();
        aliases.sort();
        aliases
    }

    /// Get total number of registered options
    pub fn count(&self) -> usize {
        self.definitions.len()
    }

    /// List all option definitions, sorted by key
    pub fn list_all(&self) -> Vec<&OptionDefinition> {
        let mut options: Vec<_> = self.definitions.values().collect();
        options.sort_by(|a, b| a.key.cmp(&b.key));
        options
    }
}
