//! Persistence for the registry's two blobs
//!
//! The registry never talks to a database directly. It reads and writes
//! whole named mappings through a [`BlobStore`]:
//! - the flat option map (option name -> value)
//! - the domain map (domain name -> config record)

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

pub mod compat;
pub mod memory;
pub mod migrations;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A JSON object, the unit of persistence
pub type Blob = Map<String, Value>;

pub const DEFAULT_OPTIONS_KEY: &str = "domain_mapper_options";
pub const DEFAULT_DOMAINS_KEY: &str = "domain_mapper_domains";

/// Key-value persistence of named blobs
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Load the blob stored under `key`, `None` if nothing was ever saved
    async fn load_blob(&self, key: &str) -> Result<Option<Blob>>;

    /// Replace the blob stored under `key`
    async fn save_blob(&self, key: &str, blob: &Blob) -> Result<()>;
}

/// Names of the two blobs the registry uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobKeys {
    pub options: String,
    pub domains: String,
}

impl Default for BlobKeys {
    fn default() -> Self {
        Self {
            options: DEFAULT_OPTIONS_KEY.to_string(),
            domains: DEFAULT_DOMAINS_KEY.to_string(),
        }
    }
}
