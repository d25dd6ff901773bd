//! Options system for typed, whitelisted configuration
//!
//! The options system provides:
//! - Type-safe values with validation
//! - Deprecated aliases that resolve to their replacement
//! - Self-describing metadata for listing
//! - Lenient coercion of persisted values

pub mod builder;
pub mod registrations;
pub mod schema;
pub mod types;

pub use builder::OptionDefBuilder;
pub use schema::OptionsSchema;
pub use types::{OptionDefinition, OptionType, OptionValue};
