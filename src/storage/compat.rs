//! TOML export/import of the persisted blobs

use super::{Blob, BlobKeys, BlobStore};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
struct ExportFile {
    #[serde(default)]
    options: Blob,
    #[serde(default)]
    domains: Blob,
}

/// Write both blobs to a TOML file
pub async fn export_to_toml(store: &dyn BlobStore, keys: &BlobKeys, path: &Path) -> Result<()> {
    log::info!("Exporting blobs to TOML: {:?}", path);

    let export = ExportFile {
        options: store.load_blob(&keys.options).await?.unwrap_or_default(),
        domains: store.load_blob(&keys.domains).await?.unwrap_or_default(),
    };

    let toml_content = toml::to_string_pretty(&export)
        .context("Failed to serialize blobs to TOML")?;

    std::fs::write(path, toml_content)
        .with_context(|| format!("Failed to write TOML file: {:?}", path))?;

    log::info!(
        "Exported {} options and {} domains",
        export.options.len(),
        export.domains.len()
    );
    Ok(())
}

/// Replace both blobs with the content of a TOML file
pub async fn import_from_toml(store: &dyn BlobStore, keys: &BlobKeys, path: &Path) -> Result<()> {
    log::info!("Importing TOML into blobs: {:?}", path);

    let toml_content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read TOML file: {:?}", path))?;

    let import: ExportFile = toml::from_str(&toml_content)
        .with_context(|| format!("Failed to parse TOML file: {:?}", path))?;

    store.save_blob(&keys.options, &import.options).await?;
    store.save_blob(&keys.domains, &import.domains).await?;

    log::info!(
        "Imported {} options and {} domains",
        import.options.len(),
        import.domains.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_export_import_roundtrip() {
        let keys = BlobKeys::default();
        let source = MemoryStore::new();

        let mut options = Blob::new();
        options.insert("default_https".to_string(), json!(true));
        options.insert("cache_ttl_hours".to_string(), json!(1.5));
        options.insert("excluded_paths".to_string(), json!(["/wp-admin"]));
        let mut domains = Blob::new();
        domains.insert("example.com".to_string(), json!({"primary": true, "site": 1}));
        source.save_blob(&keys.options, &options).await.unwrap();
        source.save_blob(&keys.domains, &domains).await.unwrap();

        let path = std::env::temp_dir().join(format!("domain-mapper-export-{}.toml", std::process::id()));
        export_to_toml(&source, &keys, &path).await.unwrap();

        let target = MemoryStore::new();
        import_from_toml(&target, &keys, &path).await.unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(target.peek(&keys.options).await, Some(options));
        assert_eq!(target.peek(&keys.domains).await, Some(domains));
    }
}
