//! Configuration registry for multisite custom domain mapping
//!
//! - [`options`]: the typed whitelist of network-wide options
//! - [`domain`]: mapped domain records
//! - [`storage`]: blob persistence (memory, SQLite, TOML export)
//! - [`registry`]: the registry tying them together

pub mod config;
pub mod domain;
pub mod options;
pub mod registry;
pub mod storage;

pub use config::AppConfig;
pub use domain::{Domain, WwwRule};
pub use options::{OptionDefinition, OptionType, OptionValue, OptionsSchema};
pub use registry::{ConfigRegistry, Lookup, SaveScope, Strictness};
pub use storage::{Blob, BlobKeys, BlobStore, MemoryStore, SqliteStore};
