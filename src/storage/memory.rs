//! In-process blob store

use super::{Blob, BlobStore};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Blob store kept in memory, with read/write counters
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: RwLock<HashMap<String, Blob>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `blobs`, counters at zero
    pub fn with_blobs(blobs: HashMap<String, Blob>) -> Self {
        Self {
            blobs: RwLock::new(blobs),
            ..Self::default()
        }
    }

    /// Number of `load_blob` calls so far
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of `save_blob` calls so far
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Current content of a blob, without counting as a read
    pub async fn peek(&self, key: &str) -> Option<Blob> {
        self.blobs.read().await.get(key).cloned()
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn load_blob(&self, key: &str) -> Result<Option<Blob>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.blobs.read().await.get(key).cloned())
    }

    async fn save_blob(&self, key: &str, blob: &Blob) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.blobs.write().await.insert(key.to_string(), blob.clone());
        log::debug!("Saved blob '{}' ({} entries) in memory", key, blob.len());
        Ok(())
    }
}
