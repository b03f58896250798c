//! Cache provider tests

use std::time::Duration;

use meete_domain::ports::providers::CacheProvider;
use meete_providers::cache::{CacheEntryConfig, MokaCacheProvider, NullCacheProvider};

#[tokio::test]
async fn test_moka_set_get_delete() {
    let cache = MokaCacheProvider::with_capacity(100);

    cache
        .set_json("course:1", r#"{"id":1}"#, CacheEntryConfig::new())
        .await
        .expect("set");
    assert!(cache.exists("course:1").await.expect("exists"));
    assert_eq!(
        cache.get_json("course:1").await.expect("get").as_deref(),
        Some(r#"{"id":1}"#)
    );

    assert!(cache.delete("course:1").await.expect("delete"));
    assert!(!cache.delete("course:1").await.expect("delete twice"));
    assert!(cache.get_json("course:1").await.expect("get").is_none());
}

#[tokio::test]
async fn test_moka_entry_ttl_expires() {
    let cache = MokaCacheProvider::with_capacity(100);
    cache
        .set_json(
            "short",
            "1",
            CacheEntryConfig::new().with_ttl(Duration::from_millis(100)),
        )
        .await
        .expect("set");
    cache
        .set_json("forever", "2", CacheEntryConfig::new())
        .await
        .expect("set");

    tokio::time::sleep(Duration::from_millis(400)).await;

    assert!(cache.get_json("short").await.expect("get").is_none());
    assert_eq!(cache.get_json("forever").await.expect("get").as_deref(), Some("2"));
}

#[tokio::test]
async fn test_moka_stats_track_hits_and_misses() {
    let cache = MokaCacheProvider::new();
    cache
        .set_json("k", "\"v\"", CacheEntryConfig::new())
        .await
        .expect("set");
    let _ = cache.get_json("k").await.expect("hit");
    let _ = cache.get_json("missing").await.expect("miss");

    let stats = cache.stats().await.expect("stats");
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.entries, 1);
    assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);

    cache.clear().await.expect("clear");
    assert_eq!(cache.stats().await.expect("stats").entries, 0);
}

#[tokio::test]
async fn test_null_cache_never_hits() {
    let cache = NullCacheProvider::new();
    cache
        .set_json("k", "1", CacheEntryConfig::new())
        .await
        .expect("set");
    assert!(!cache.exists("k").await.expect("exists"));
    assert!(cache.get_json("k").await.expect("get").is_none());
    assert_eq!(cache.provider_name(), "null");
}

#[cfg(feature = "cache-redis")]
#[test]
fn test_redis_clear_is_scoped_to_namespace() {
    use meete_providers::cache::RedisCacheProvider;

    let cache = RedisCacheProvider::new("redis://localhost:6379", "meete").expect("client");
    assert_eq!(cache.key_pattern(), "meete:*");
    assert_eq!(cache.provider_name(), "redis");
}
