//! Fluent builder API for creating option definitions

use super::types::{OptionDefinition, OptionType, OptionValue};
use anyhow::Result;

/// Builder for creating option definitions with a fluent API
pub struct OptionDefBuilder {
    key: String,
    display_name: Option<String>,
    description: Option<String>,
    ty: Option<OptionType>,
    default: Option<OptionValue>,
}

impl OptionDefBuilder {
    /// Create a new builder for the option stored under `key`
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            display_name: None,
            description: None,
            ty: None,
            default: None,
        }
    }

    /// Set the display name (human-readable label)
    pub fn display_name(mut self, name: &str) -> Self {
        self.display_name = Some(name.to_string());
        self
    }

    /// Set the description (help text)
    pub fn description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Define as a boolean type with default value
    pub fn bool_type(mut self, default: bool) -> Self {
        self.ty = Some(OptionType::Bool);
        self.default = Some(OptionValue::Bool(default));
        self
    }

    /// Define as an unsigned integer type with default and optional constraints
    pub fn uint_type(mut self, default: u64, min: Option<u64>, max: Option<u64>) -> Self {
        self.ty = Some(OptionType::UInt { min, max });
        self.default = Some(OptionValue::UInt(default));
        self
    }

    /// Define as a signed integer type with default and optional constraints
    pub fn int_type(mut self, default: i64, min: Option<i64>, max: Option<i64>) -> Self {
        self.ty = Some(OptionType::Int { min, max });
        self.default = Some(OptionValue::Int(default));
        self
    }

    /// Define as a float type with default and optional constraints
    pub fn float_type(mut self, default: f64, min: Option<f64>, max: Option<f64>) -> Self {
        self.ty = Some(OptionType::Float { min, max });
        self.default = Some(OptionValue::Float(default));
        self
    }

    /// Define as a string type with default and optional max length
    pub fn string_type(mut self, default: &str, max_length: Option<usize>) -> Self {
        self.ty = Some(OptionType::String { max_length });
        self.default = Some(OptionValue::String(default.to_string()));
        self
    }

    /// Define as an enum type with allowed variants and default value
    pub fn enum_type(mut self, variants: Vec<&str>, default: &str) -> Self {
        self.ty = Some(OptionType::Enum {
            variants: variants.iter().map(|s| s.to_string()).collect(),
        });
        self.default = Some(OptionValue::String(default.to_string()));
        self
    }

    /// Define as a flat list of strings with default items
    pub fn list_type(mut self, default: Vec<&str>, max_items: Option<usize>) -> Self {
        self.ty = Some(OptionType::List { max_items });
        self.default = Some(OptionValue::List(
            default.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    /// Build the option definition
    ///
    /// Returns an error if required fields are missing or the default
    /// does not satisfy the declared type
    pub fn build(self) -> Result<OptionDefinition> {
        if self.key.is_empty() {
            anyhow::bail!("option key must not be empty");
        }
        let display_name = self
            .display_name
            .ok_or_else(|| anyhow::anyhow!("display_name is required"))?;
        let ty = self
            .ty
            .ok_or_else(|| anyhow::anyhow!("type is required (use bool_type, uint_type, enum_type, etc.)"))?;
        let default = self
            .default
            .ok_or_else(|| anyhow::anyhow!("default value is required"))?;

        ty.validate(&default)
            .map_err(|e| anyhow::anyhow!("Invalid default for '{}': {}", self.key, e))?;

        Ok(OptionDefinition {
            key: self.key,
            display_name,
            description: self.description.unwrap_or_default(),
            ty,
            default,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_builder() {
        let def = OptionDefBuilder::new("default_https")
            .display_name("Force HTTPS")
            .description("A test boolean")
            .bool_type(true)
            .build()
            .unwrap();

        assert_eq!(def.key, "default_https");
        assert_eq!(def.display_name, "Force HTTPS");
        assert_eq!(def.description, "A test boolean");
        assert!(matches!(def.ty, OptionType::Bool));
        assert_eq!(def.default, OptionValue::Bool(true));
    }

    #[test]
    fn test_uint_builder_with_constraints() {
        let def = OptionDefBuilder::new("redirect_status")
            .display_name("Redirect Status")
            .uint_type(301, Some(300), Some(308))
            .build()
            .unwrap();

        assert_eq!(def.default, OptionValue::UInt(301));

        match def.ty {
            OptionType::UInt { min, max } => {
                assert_eq!(min, Some(300));
                assert_eq!(max, Some(308));
            }
            _ => panic!("Expected UInt type"),
        }
    }

    #[test]
    fn test_enum_builder() {
        let def = OptionDefBuilder::new("default_www")
            .display_name("WWW Preference")
            .enum_type(vec!["auto", "always", "never"], "auto")
            .build()
            .unwrap();

        assert_eq!(def.default, OptionValue::String("auto".to_string()));

        match def.ty {
            OptionType::Enum { variants } => {
                assert_eq!(variants.len(), 3);
                assert!(variants.contains(&"never".to_string()));
            }
            _ => panic!("Expected Enum type"),
        }
    }

    #[test]
    fn test_list_builder() {
        let def = OptionDefBuilder::new("excluded_paths")
            .display_name("Excluded Paths")
            .list_type(vec!["/wp-admin"], None)
            .build()
            .unwrap();

        assert_eq!(def.default, OptionValue::List(vec!["/wp-admin".to_string()]));
    }

    #[test]
    fn test_default_outside_constraints() {
        let result = OptionDefBuilder::new("redirect_status")
            .display_name("Redirect Status")
            .uint_type(200, Some(300), Some(308))
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_missing_display_name() {
        let result = OptionDefBuilder::new("option")
            .bool_type(true)
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_missing_type() {
        let result = OptionDefBuilder::new("option")
            .display_name("Test")
            .build();

        assert!(result.is_err());
    }
}
