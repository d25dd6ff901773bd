//! URL rewriting and caching options

use crate::options::{OptionDefBuilder, OptionsSchema};
use anyhow::Result;

pub fn register(schema: &mut OptionsSchema) -> Result<usize> {
    let before = schema.count();

    schema.register(
        OptionDefBuilder::new("rewrite_content_urls")
            .display_name("Rewrite Content URLs")
            .description("Replace the network domain with the mapped domain in generated URLs")
            .bool_type(true)
            .build()?
    )?;

    schema.register(
        OptionDefBuilder::new("excluded_paths")
            .display_name("Excluded Paths")
            .description("Path prefixes that are always served from the network domain")
            .list_type(vec!["/wp-admin", "/wp-login.php"], Some(64))
            .build()?
    )?;

    schema.register(
        OptionDefBuilder::new("cache_ttl_hours")
            .display_name("Mapping Cache TTL")
            .description("Hours a resolved domain lookup stays cached")
            .float_type(24.0, Some(0.0), None)
            .build()?
    )?;

    schema.register(
        OptionDefBuilder::new("max_domains_per_site")
            .display_name("Max Domains Per Site")
            .description("Upper bound on domains mapped to one site (0 for unlimited)")
            .int_type(0, Some(0), Some(1000))
            .build()?
    )?;

    schema.deprecate("rewrite_urls", "rewrite_content_urls")?;

    let added = schema.count() - before;
    log::debug!("Registered {} rewrite options", added);
    Ok(added)
}
