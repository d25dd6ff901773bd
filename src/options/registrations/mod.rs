//! Registration of all built-in options

pub mod redirects;
pub mod rewrite;

use super::OptionsSchema;
use anyhow::Result;

/// Register all options and deprecated aliases from all modules
pub fn register_all(schema: &mut OptionsSchema) -> Result<()> {
    redirects::register(schema)?;
    rewrite::register(schema)?;
    Ok(())
}

/// Schema with every built-in option registered
pub fn default_schema() -> Result<OptionsSchema> {
    let mut schema = OptionsSchema::new();
    register_all(&mut schema)?;
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema() {
        let schema = default_schema().unwrap();
        assert_eq!(schema.count(), 9);

        for def in schema.list_all() {
            assert!(def.validate(&def.default).is_ok(), "bad default for {}", def.key);
        }
    }

    #[test]
    fn test_modules_report_registered_count() {
        let mut schema = OptionsSchema::new();
        assert_eq!(redirects::register(&mut schema).unwrap(), 5);
        assert_eq!(rewrite::register(&mut schema).unwrap(), 4);
        assert_eq!(schema.count(), 9);
    }

    #[test]
    fn test_deprecated_aliases_resolve() {
        let schema = default_schema().unwrap();
        assert_eq!(schema.resolve("www_rule"), "default_www");
        assert_eq!(schema.resolve("force_ssl"), "default_https");
        assert_eq!(schema.resolve("redirect_code"), "redirect_status");
        assert_eq!(schema.resolve("rewrite_urls"), "rewrite_content_urls");
    }
}
