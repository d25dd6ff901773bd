//! Core types for the options system

use anyhow::{Context, Result};
use serde_json::Value;
use std::fmt;

/// A strongly-typed option value
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    List(Vec<String>),
}

impl OptionValue {
    /// Get as bool, returning error if wrong type
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            OptionValue::Bool(v) => Ok(*v),
            _ => anyhow::bail!("Expected Bool, got {:?}", self),
        }
    }

    /// Get as int, returning error if wrong type
    pub fn as_int(&self) -> Result<i64> {
        match self {
            OptionValue::Int(v) => Ok(*v),
            _ => anyhow::bail!("Expected Int, got {:?}", self),
        }
    }

    /// Get as uint, returning error if wrong type
    pub fn as_uint(&self) -> Result<u64> {
        match self {
            OptionValue::UInt(v) => Ok(*v),
            _ => anyhow::bail!("Expected UInt, got {:?}", self),
        }
    }

    /// Get as float, returning error if wrong type
    pub fn as_float(&self) -> Result<f64> {
        match self {
            OptionValue::Float(v) => Ok(*v),
            _ => anyhow::bail!("Expected Float, got {:?}", self),
        }
    }

    /// Get as string, returning error if wrong type
    pub fn as_string(&self) -> Result<String> {
        match self {
            OptionValue::String(v) => Ok(v.clone()),
            _ => anyhow::bail!("Expected String, got {:?}", self),
        }
    }

    /// Get as list, returning error if wrong type
    pub fn as_list(&self) -> Result<Vec<String>> {
        match self {
            OptionValue::List(v) => Ok(v.clone()),
            _ => anyhow::bail!("Expected List, got {:?}", self),
        }
    }

    /// JSON representation used inside persisted blobs
    pub fn to_json(&self) -> Value {
        match self {
            OptionValue::Bool(v) => Value::Bool(*v),
            OptionValue::Int(v) => Value::from(*v),
            OptionValue::UInt(v) => Value::from(*v),
            OptionValue::Float(v) => Value::from(*v),
            OptionValue::String(v) => Value::String(v.clone()),
            OptionValue::List(v) => Value::Array(v.iter().cloned().map(Value::String).collect()),
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(v) => write!(f, "{}", v),
            OptionValue::Int(v) => write!(f, "{}", v),
            OptionValue::UInt(v) => write!(f, "{}", v),
            OptionValue::Float(v) => write!(f, "{}", v),
            OptionValue::String(v) => write!(f, "{}", v),
            OptionValue::List(v) => write!(f, "{}", v.join(",")),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Int(v)
    }
}

impl From<u64> for OptionValue {
    fn from(v: u64) -> Self {
        OptionValue::UInt(v)
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Float(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::String(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::String(v)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(v: Vec<String>) -> Self {
        OptionValue::List(v)
    }
}

/// Type definition with constraints for validation
#[derive(Debug, Clone)]
pub enum OptionType {
    Bool,
    Int {
        min: Option<i64>,
        max: Option<i64>,
    },
    UInt {
        min: Option<u64>,
        max: Option<u64>,
    },
    Float {
        min: Option<f64>,
        max: Option<f64>,
    },
    String {
        max_length: Option<usize>,
    },
    Enum {
        variants: Vec<String>,
    },
    List {
        max_items: Option<usize>,
    },
}

fn check_range<T: PartialOrd + fmt::Display>(v: &T, min: &Option<T>, max: &Option<T>) -> Result<()> {
    if let Some(min) = min {
        if v < min {
            anyhow::bail!("Value {} is below minimum {}", v, min);
        }
    }
    if let Some(max) = max {
        if v > max {
            anyhow::bail!("Value {} is above maximum {}", v, max);
        }
    }
    Ok(())
}

impl OptionType {
    /// Check if a value matches this type
    pub fn matches(&self, value: &OptionValue) -> bool {
        matches!(
            (self, value),
            (OptionType::Bool, OptionValue::Bool(_))
                | (OptionType::Int { .. }, OptionValue::Int(_))
                | (OptionType::UInt { .. }, OptionValue::UInt(_))
                | (OptionType::Float { .. }, OptionValue::Float(_))
                | (OptionType::String { .. }, OptionValue::String(_))
                | (OptionType::Enum { .. }, OptionValue::String(_))
                | (OptionType::List { .. }, OptionValue::List(_))
        )
    }

    /// Validate that a value meets the constraints for this type
    pub fn validate(&self, value: &OptionValue) -> Result<()> {
        if !self.matches(value) {
            anyhow::bail!("Type mismatch: expected {:?}, got {:?}", self, value);
        }

        match (self, value) {
            (OptionType::Int { min, max }, OptionValue::Int(v)) => check_range(v, min, max),
            (OptionType::UInt { min, max }, OptionValue::UInt(v)) => check_range(v, min, max),
            (OptionType::Float { min, max }, OptionValue::Float(v)) => {
                if !v.is_finite() {
                    anyhow::bail!("Value {} is not a finite number", v);
                }
                check_range(v, min, max)
            }
            (OptionType::String { max_length }, OptionValue::String(v)) => {
                if let Some(max_length) = max_length {
                    if v.len() > *max_length {
                        anyhow::bail!("String length {} exceeds maximum {}", v.len(), max_length);
                    }
                }
                Ok(())
            }
            (OptionType::Enum { variants }, OptionValue::String(v)) => {
                if !variants.contains(v) {
                    anyhow::bail!("Value '{}' is not a valid variant. Valid values: {:?}", v, variants);
                }
                Ok(())
            }
            (OptionType::List { max_items }, OptionValue::List(v)) => {
                if let Some(max_items) = max_items {
                    if v.len() > *max_items {
                        anyhow::bail!("List has {} items, maximum is {}", v.len(), max_items);
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Convert a persisted JSON value into this type
    ///
    /// Lenient about representation (numeric strings, 0/1 booleans, comma
    /// separated lists) but the result still has to pass `validate`.
    pub fn coerce(&self, raw: &Value) -> Result<OptionValue> {
        let value = match self {
            OptionType::Bool => OptionValue::Bool(coerce_bool(raw)?),
            OptionType::Int { .. } => OptionValue::Int(coerce_int(raw)?),
            OptionType::UInt { .. } => OptionValue::UInt(coerce_uint(raw)?),
            OptionType::Float { .. } => OptionValue::Float(coerce_float(raw)?),
            OptionType::String { .. } | OptionType::Enum { .. } => {
                OptionValue::String(scalar_to_string(raw)?)
            }
            OptionType::List { .. } => OptionValue::List(coerce_list(raw)?),
        };

        self.validate(&value)?;
        Ok(value)
    }

    /// Parse a value typed on the command line
    pub fn parse(&self, raw: &str) -> Result<OptionValue> {
        self.coerce(&Value::String(raw.to_string()))
    }
}

fn coerce_bool(raw: &Value) -> Result<bool> {
    match raw {
        Value::Bool(v) => Ok(*v),
        Value::Number(n) => Ok(n.as_f64().map(|v| v != 0.0).unwrap_or(false)),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            other => anyhow::bail!("Cannot interpret '{}' as a boolean", other),
        },
        other => anyhow::bail!("Cannot interpret {} as a boolean", other),
    }
}

fn coerce_int(raw: &Value) -> Result<i64> {
    match raw {
        Value::Bool(v) => Ok(i64::from(*v)),
        Value::Number(n) => {
            if let Some(v) = n.as_i64() {
                Ok(v)
            } else if let Some(v) = n.as_u64() {
                i64::try_from(v).context("Integer out of range")
            } else {
                let v = n.as_f64().context("Invalid number")?;
                Ok(v.trunc() as i64)
            }
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(v) = s.parse::<i64>() {
                return Ok(v);
            }
            let v = s
                .parse::<f64>()
                .with_context(|| format!("Cannot interpret '{}' as an integer", s))?;
            if !v.is_finite() {
                anyhow::bail!("Cannot interpret '{}' as an integer", s);
            }
            Ok(v.trunc() as i64)
        }
        other => anyhow::bail!("Cannot interpret {} as an integer", other),
    }
}

fn coerce_uint(raw: &Value) -> Result<u64> {
    let unsigned = match raw {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    if let Some(v) = unsigned {
        return Ok(v);
    }

    let v = coerce_int(raw)?;
    u64::try_from(v).with_context(|| format!("Negative value {} for unsigned option", v))
}

fn coerce_float(raw: &Value) -> Result<f64> {
    match raw {
        Value::Bool(v) => Ok(if *v { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64().context("Invalid number"),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .with_context(|| format!("Cannot interpret '{}' as a float", s)),
        other => anyhow::bail!("Cannot interpret {} as a float", other),
    }
}

fn scalar_to_string(raw: &Value) -> Result<String> {
    match raw {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(v) => Ok(v.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => anyhow::bail!("Cannot interpret {} as a string", other),
    }
}

fn coerce_list(raw: &Value) -> Result<Vec<String>> {
    match raw {
        Value::Array(items) => items.iter().map(scalar_to_string).collect(),
        Value::String(s) if s.trim().is_empty() => Ok(Vec::new()),
        Value::String(s) => Ok(s.split(',').map(|item| item.trim().to_string()).collect()),
        Value::Null => Ok(Vec::new()),
        other => Ok(vec![scalar_to_string(other)?]),
    }
}

/// Complete definition of an option including metadata for display
#[derive(Debug, Clone)]
pub struct OptionDefinition {
    /// Option name as stored in the options blob (e.g., "redirect_status")
    pub key: String,

    /// Human-readable display name (e.g., "Redirect Status")
    pub display_name: String,

    /// Detailed description for help text
    pub description: String,

    /// Type definition with constraints
    pub ty: OptionType,

    /// Default value
    pub default: OptionValue,
}

impl OptionDefinition {
    /// Validate that a value is valid for this option
    pub fn validate(&self, value: &OptionValue) -> Result<()> {
        self.ty.validate(value)
    }

    /// Coerce a persisted value to this option's type
    pub fn coerce(&self, raw: &Value) -> Result<OptionValue> {
        self.ty.coerce(raw)
    }
}
