//! End-to-end behaviour of the registry against an in-memory store
//!
//! Covers persistence round trips of every value kind, deprecated names,
//! override layering and the domain directory.

use domain_mapper::options::registrations::default_schema;
use domain_mapper::storage::{DEFAULT_DOMAINS_KEY, DEFAULT_OPTIONS_KEY};
use domain_mapper::{Blob, ConfigRegistry, Domain, MemoryStore, OptionValue, SaveScope, WwwRule};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

fn registry_over(store: &Arc<MemoryStore>) -> ConfigRegistry {
    ConfigRegistry::new(Arc::new(default_schema().unwrap()), store.clone())
}

/// Every value kind survives save + forced reload unchanged
#[tokio::test]
async fn test_options_roundtrip_all_types() {
    let store = Arc::new(MemoryStore::new());
    let mut registry = registry_over(&store);
    registry.load(false).await.unwrap();

    registry.set("default_https", true).unwrap();
    registry.set("max_domains_per_site", 12i64).unwrap();
    registry.set("redirect_status", 308u64).unwrap();
    registry.set("fallback_domain", "network.example.org").unwrap();
    registry.set("cache_ttl_hours", 0.25).unwrap();
    registry
        .set("excluded_paths", vec!["/wp-json".to_string(), "/xmlrpc.php".to_string()])
        .unwrap();

    let before: Vec<(String, OptionValue)> = registry
        .options()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect();

    registry.save(SaveScope::Options).await.unwrap();
    registry.load(true).await.unwrap();

    let after: Vec<(String, OptionValue)> = registry
        .options()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect();
    assert_eq!(before, after);

    let mut fresh = registry_over(&store);
    fresh.load(false).await.unwrap();
    assert!(fresh.get_bool("default_https").unwrap());
    assert_eq!(fresh.get_float("cache_ttl_hours").unwrap(), 0.25);
    assert_eq!(fresh.get_list("excluded_paths").unwrap(), vec!["/wp-json", "/xmlrpc.php"]);
}

/// Values written under a retired name are saved under the current one
#[tokio::test]
async fn test_deprecated_names_persist_under_replacement() {
    let store = Arc::new(MemoryStore::new());
    let mut registry = registry_over(&store);
    registry.load(false).await.unwrap();

    registry.set("redirect_code", 302u64).unwrap();
    registry.save(SaveScope::Options).await.unwrap();

    let blob = store.peek(DEFAULT_OPTIONS_KEY).await.unwrap();
    assert_eq!(blob.get("redirect_status"), Some(&json!(302)));
    assert!(!blob.contains_key("redirect_code"));
}

#[tokio::test]
async fn test_override_shadows_without_persisting() {
    let store = Arc::new(MemoryStore::new());
    let mut registry = registry_over(&store);
    registry.load(false).await.unwrap();

    registry.set("default_www", "always").unwrap();
    registry.set_override("default_www", "never").unwrap();

    let lookup = registry.lookup("default_www", false).unwrap();
    assert_eq!(lookup.value, Some(OptionValue::from("never")));
    assert!(lookup.has_override);
    let bypassed = registry.lookup("default_www", true).unwrap();
    assert_eq!(bypassed.value, Some(OptionValue::from("always")));

    registry.save(SaveScope::All).await.unwrap();
    let blob = store.peek(DEFAULT_OPTIONS_KEY).await.unwrap();
    assert_eq!(blob.get("default_www"), Some(&json!("always")));
}

#[tokio::test]
async fn test_second_load_reads_nothing() {
    let store = Arc::new(MemoryStore::new());
    let mut registry = registry_over(&store);

    registry.load(false).await.unwrap();
    let reads = store.reads();
    registry.load(false).await.unwrap();
    registry.load(false).await.unwrap();

    assert_eq!(store.reads(), reads);
}

/// A persisted domain blob loads with the key injected as the name
#[tokio::test]
async fn test_domain_blob_loads() {
    let mut domains = Blob::new();
    domains.insert("example.com".to_string(), json!({"primary": true}));
    let store = Arc::new(MemoryStore::with_blobs(HashMap::from([(
        DEFAULT_DOMAINS_KEY.to_string(),
        domains,
    )])));

    let mut registry = registry_over(&store);
    registry.load(false).await.unwrap();

    let domain = registry.domain("example.com").unwrap();
    assert_eq!(domain.name, "example.com");
    assert_eq!(domain.field("name"), Some(json!("example.com")));
    assert_eq!(domain.field("primary"), Some(json!(true)));
    assert!(registry.domain("unknown.com").is_none());
    assert_eq!(registry.domain_field("unknown.com", "primary"), None);
}

/// Saved records drop `name`, reload puts it back from the key
#[tokio::test]
async fn test_domains_roundtrip() {
    let store = Arc::new(MemoryStore::new());
    let mut registry = registry_over(&store);
    registry.load(false).await.unwrap();

    let mut shop = Domain::new("Shop.Example.com", 4).unwrap();
    shop.www = WwwRule::Never;
    shop.https = true;
    shop.redirect = Some("example.com".to_string());
    registry.add_domain(shop.clone());
    registry.add_domain(Domain::new("example.com", 4).unwrap());

    registry.save(SaveScope::Domains).await.unwrap();
    let blob = store.peek(DEFAULT_DOMAINS_KEY).await.unwrap();
    assert_eq!(blob.len(), 2);
    for record in blob.values() {
        assert!(!record.as_object().unwrap().contains_key("name"));
    }

    registry.load(true).await.unwrap();
    assert_eq!(registry.domain("shop.example.com"), Some(&shop));
    assert_eq!(registry.domains().count(), 2);

    assert!(registry.remove_domain("SHOP.example.com").is_some());
    registry.save(SaveScope::Domains).await.unwrap();
    registry.load(true).await.unwrap();
    assert!(registry.domain("shop.example.com").is_none());
}
