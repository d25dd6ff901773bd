pub mod domains;
pub mod options;
pub mod transfer;

use domain_mapper::options::OptionValue;
use domain_mapper::registry::ConfigRegistry;
use anyhow::Result;

pub use domains::{DomainsCommands, domains_command};
pub use options::{OptionsCommands, options_command};
pub use transfer::{export_command, import_command};

/// Parse a command-line value for `name` according to its definition
///
/// Names outside the whitelist keep the raw text.
pub fn parse_option_value(registry: &ConfigRegistry, name: &str, raw: &str) -> Result<OptionValue> {
    match registry.definition(name) {
        Some(def) => def
            .ty
            .parse(raw)
            .map_err(|e| anyhow::anyhow!("Invalid value for option '{}': {}", def.key, e)),
        None => Ok(OptionValue::String(raw.to_string())),
    }
}

/// Apply `NAME=VALUE` overrides given on the command line
pub fn apply_overrides(registry: &mut ConfigRegistry, overrides: &[String]) -> Result<()> {
    for entry in overrides {
        let Some((name, raw)) = entry.split_once('=') else {
            anyhow::bail!("Invalid override '{}', expected NAME=VALUE", entry);
        };
        let name = name.trim();
        let value = parse_option_value(registry, name, raw)?;
        registry.set_override(name, value)?;
    }
    Ok(())
}
