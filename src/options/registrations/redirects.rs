//! Canonical-domain and redirect options

use crate::options::{OptionDefBuilder, OptionsSchema};
use anyhow::Result;

/// Register redirect-related options
pub fn register(schema: &mut OptionsSchema) -> Result<usize> {
    let before = schema.count();

    schema.register(
        OptionDefBuilder::new("default_www")
            .display_name("WWW Preference")
            .description("Whether mapped domains get a www prefix unless the domain says otherwise")
            .enum_type(vec!["auto", "always", "never"], "auto")
            .build()?
    )?;

    schema.register(
        OptionDefBuilder::new("default_https")
            .display_name("Force HTTPS")
            .description("Redirect plain http requests to https unless the domain says otherwise")
            .bool_type(false)
            .build()?
    )?;

    schema.register(
        OptionDefBuilder::new("redirect_to_primary")
            .display_name("Redirect To Primary")
            .description("Send visitors of secondary domains to the site's primary domain")
            .bool_type(true)
            .build()?
    )?;

    schema.register(
        OptionDefBuilder::new("redirect_status")
            .display_name("Redirect Status")
            .description("HTTP status code used for canonical redirects")
            .uint_type(301, Some(300), Some(308))
            .build()?
    )?;

    schema.register(
        OptionDefBuilder::new("fallback_domain")
            .display_name("Fallback Domain")
            .description("Domain to send unmapped requests to (empty to disable)")
            .string_type("", Some(253))
            .build()?
    )?;

    schema.deprecate("www_rule", "default_www")?;
    schema.deprecate("force_ssl", "default_https")?;
    schema.deprecate("redirect_code", "redirect_status")?;

    let added = schema.count() - before;
    log::debug!("Registered {} redirect options", added);
    Ok(added)
}
