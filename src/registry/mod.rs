//! The configuration registry
//!
//! Holds the effective option values, transient overrides and the domain
//! directory for one context (a request, a CLI invocation). Values come
//! from and go back to a [`BlobStore`] as two independent blobs.

use crate::domain::{self, Domain};
use crate::options::{OptionDefinition, OptionValue, OptionsSchema};
use crate::storage::{Blob, BlobKeys, BlobStore};
use anyhow::Result;
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// How access to an option outside the whitelist is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Log a warning and carry on
    #[default]
    Warn,
    /// Fail the operation
    Strict,
}

/// Which blob(s) `save` writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveScope {
    Options,
    Domains,
    #[default]
    All,
}

/// Result of reading an option
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    /// Override, stored value, or `None` when the option has no stored value
    pub value: Option<OptionValue>,
    /// Whether a stored option is currently shadowed by an override
    pub has_override: bool,
}

pub struct ConfigRegistry {
    schema: Arc<OptionsSchema>,
    store: Arc<dyn BlobStore>,
    keys: BlobKeys,
    strictness: Strictness,
    options: BTreeMap<String, OptionValue>,
    overrides: BTreeMap<String, OptionValue>,
    domains: BTreeMap<String, Domain>,
    loaded: bool,
}

impl ConfigRegistry {
    /// Empty, unloaded registry over `store`
    pub fn new(schema: Arc<OptionsSchema>, store: Arc<dyn BlobStore>) -> Self {
        Self {
            schema,
            store,
            keys: BlobKeys::default(),
            strictness: Strictness::default(),
            options: BTreeMap::new(),
            overrides: BTreeMap::new(),
            domains: BTreeMap::new(),
            loaded: false,
        }
    }

    pub fn with_keys(mut self, keys: BlobKeys) -> Self {
        self.keys = keys;
        self
    }

    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn schema(&self) -> &OptionsSchema {
        &self.schema
    }

    pub fn keys(&self) -> &BlobKeys {
        &self.keys
    }

    pub fn store(&self) -> &dyn BlobStore {
        self.store.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Current name of an option, following deprecated aliases
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.schema.resolve(name)
    }

    /// Whether `name`, after alias resolution, is a whitelisted option
    pub fn has(&self, name: &str) -> bool {
        self.schema.contains(name)
    }

    /// Definition of a whitelisted option
    pub fn definition(&self, name: &str) -> Option<&OptionDefinition> {
        self.schema.get(name)
    }

    fn check_supported(&self, name: &str) -> Result<()> {
        if self.has(name) {
            return Ok(());
        }
        match self.strictness {
            Strictness::Warn => {
                warn!("Unsupported option: '{}'", name);
                Ok(())
            }
            Strictness::Strict => anyhow::bail!("Unsupported option: '{}'", name),
        }
    }

    /// Read an option
    ///
    /// Overrides only shadow options that have a stored value.
    pub fn lookup(&self, name: &str, bypass_override: bool) -> Result<Lookup> {
        self.check_supported(name)?;
        let name = self.resolve(name);

        let Some(stored) = self.options.get(name) else {
            return Ok(Lookup {
                value: None,
                has_override: false,
            });
        };

        let override_value = self.overrides.get(name);
        let value = match override_value {
            Some(value) if !bypass_override => value,
            _ => stored,
        };

        Ok(Lookup {
            value: Some(value.clone()),
            has_override: override_value.is_some(),
        })
    }

    /// Override or stored value of an option
    pub fn get(&self, name: &str) -> Result<Option<OptionValue>> {
        Ok(self.lookup(name, false)?.value)
    }

    /// Override or stored value, `default` when the option has no stored value
    pub fn get_or(&self, name: &str, default: OptionValue) -> Result<OptionValue> {
        Ok(self.get(name)?.unwrap_or(default))
    }

    /// Value of an option, falling back to its whitelisted default
    pub fn effective(&self, name: &str) -> Result<OptionValue> {
        if let Some(value) = self.get(name)? {
            return Ok(value);
        }
        self.definition(name)
            .map(|def| def.default.clone())
            .ok_or_else(|| anyhow::anyhow!("Option '{}' has no value and no default", name))
    }

    pub fn get_bool(&self, name: &str) -> Result<bool> {
        self.effective(name)?.as_bool()
    }

    pub fn get_int(&self, name: &str) -> Result<i64> {
        self.effective(name)?.as_int()
    }

    pub fn get_uint(&self, name: &str) -> Result<u64> {
        self.effective(name)?.as_uint()
    }

    pub fn get_float(&self, name: &str) -> Result<f64> {
        self.effective(name)?.as_float()
    }

    pub fn get_string(&self, name: &str) -> Result<String> {
        self.effective(name)?.as_string()
    }

    pub fn get_list(&self, name: &str) -> Result<Vec<String>> {
        self.effective(name)?.as_list()
    }

    /// Validate `value` against the option's definition, if it has one
    fn validate(&self, name: &str, value: &OptionValue) -> Result<()> {
        if let Some(def) = self.definition(name) {
            def.validate(value)
                .map_err(|e| anyhow::anyhow!("Invalid value for option '{}': {}", def.key, e))?;
        }
        Ok(())
    }

    /// Store a value under the option's current name
    pub fn set(&mut self, name: &str, value: impl Into<OptionValue>) -> Result<()> {
        let value = value.into();
        self.check_supported(name)?;
        self.validate(name, &value)?;

        let name = self.resolve(name).to_string();
        debug!("Set option: {} = {}", name, value);
        self.options.insert(name, value);
        Ok(())
    }

    /// Shadow an option with a value that is never saved
    pub fn set_override(&mut self, name: &str, value: impl Into<OptionValue>) -> Result<()> {
        let value = value.into();
        self.check_supported(name)?;
        self.validate(name, &value)?;

        let name = self.resolve(name).to_string();
        debug!("Override option: {} = {}", name, value);
        self.overrides.insert(name, value);
        Ok(())
    }

    /// Drop the override of one option, returning it
    pub fn clear_override(&mut self, name: &str) -> Option<OptionValue> {
        let name = self.resolve(name).to_string();
        self.overrides.remove(&name)
    }

    pub fn clear_overrides(&mut self) {
        self.overrides.clear();
    }

    /// Stored values in name order, overrides not applied
    pub fn options(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.options.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Whether `name` currently has an override
    pub fn is_overridden(&self, name: &str) -> bool {
        self.overrides.contains_key(self.resolve(name))
    }

    /// Domain registered under the sanitized form of `name`
    pub fn domain(&self, name: &str) -> Option<&Domain> {
        self.domains.get(&domain::sanitize(name))
    }

    /// One field of a registered domain
    pub fn domain_field(&self, name: &str, field: &str) -> Option<Value> {
        self.domain(name)?.field(field)
    }

    /// Register a domain under its sanitized name, returning the one it replaces
    pub fn add_domain(&mut self, mut domain: Domain) -> Option<Domain> {
        domain.normalize();
        debug!("Add domain: {}", domain.name);
        self.domains.insert(domain.name.clone(), domain)
    }

    pub fn remove_domain(&mut self, name: &str) -> Option<Domain> {
        let removed = self.domains.remove(&domain::sanitize(name));
        if removed.is_some() {
            debug!("Removed domain: {}", domain::sanitize(name));
        }
        removed
    }

    /// Registered domains in name order
    pub fn domains(&self) -> impl Iterator<Item = &Domain> {
        self.domains.values()
    }

    /// Populate options and domains from the store
    ///
    /// Does nothing if already loaded, unless `force_reload` is set. A forced
    /// reload starts from empty options and domains; overrides are kept. If
    /// either blob cannot be read the registry is left as it was.
    pub async fn load(&mut self, force_reload: bool) -> Result<()> {
        if self.loaded && !force_reload {
            debug!("Registry already loaded");
            return Ok(());
        }

        let options = self.load_options().await?;
        let domains = self.load_domains().await?;

        self.options = options;
        self.domains = domains;
        self.loaded = true;
        info!(
            "Loaded {} options and {} domains",
            self.options.len(),
            self.domains.len()
        );
        Ok(())
    }

    async fn load_options(&self) -> Result<BTreeMap<String, OptionValue>> {
        let blob = self
            .store
            .load_blob(&self.keys.options)
            .await?
            .unwrap_or_default();

        let mut options = BTreeMap::new();
        for def in self.schema.list_all() {
            let persisted = blob.get(&def.key).or_else(|| {
                self.schema
                    .aliases_of(&def.key)
                    .into_iter()
                    .find_map(|alias| blob.get(alias))
            });

            let value = match persisted {
                Some(raw) => match def.coerce(raw) {
                    Ok(value) => value,
                    Err(e) => {
                        warn!("Ignoring stored value of '{}': {}", def.key, e);
                        def.default.clone()
                    }
                },
                None => def.default.clone(),
            };

            options.insert(def.key.clone(), value);
        }

        for name in blob.keys().filter(|name| !self.schema.contains(name)) {
            debug!("Dropping unknown stored option '{}'", name);
        }

        Ok(options)
    }

    async fn load_domains(&self) -> Result<BTreeMap<String, Domain>> {
        let blob = self
            .store
            .load_blob(&self.keys.domains)
            .await?
            .unwrap_or_default();

        let mut domains = BTreeMap::new();
        for (name, config) in &blob {
            match Domain::from_config(name, config) {
                Ok(domain) => {
                    domains.insert(domain.name.clone(), domain);
                }
                Err(e) => warn!("Skipping stored domain '{}': {:#}", name, e),
            }
        }

        Ok(domains)
    }

    /// Persist options, domains, or both
    pub async fn save(&self, scope: SaveScope) -> Result<()> {
        if matches!(scope, SaveScope::Options | SaveScope::All) {
            let blob: Blob = self
                .options
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect();
            self.store.save_blob(&self.keys.options, &blob).await?;
            info!("Saved {} options", blob.len());
        }

        if matches!(scope, SaveScope::Domains | SaveScope::All) {
            let blob: Blob = self
                .domains
                .iter()
                .map(|(name, domain)| {
                    let mut record = domain.dump();
                    record.remove("name");
                    (name.clone(), Value::Object(record))
                })
                .collect();
            self.store.save_blob(&self.keys.domains, &blob).await?;
            info!("Saved {} domains", blob.len());
        }

        Ok(())
    }
}
