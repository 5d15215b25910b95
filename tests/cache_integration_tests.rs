//! Integration Tests for the public cache API
//!
//! Exercises recency ordering, size bounds and sliding expiry end to end.

use std::time::Duration;

use evict_cache::shell::{self, Session};
use evict_cache::{CacheItem, CacheOptions, EvictionCache};

// == Helper Functions ==

const MINUTE: Duration = Duration::from_secs(60);

fn keys<K: evict_cache::CacheKey, V: Clone + Send + 'static>(cache: &EvictionCache<K, V>) -> Vec<K> {
    cache.entries().map(|item| item.key).collect()
}

async fn advance_to(start: tokio::time::Instant, secs: u64) {
    tokio::time::sleep_until(start + Duration::from_secs(secs)).await;
}

// == Recency Tests ==

#[test]
fn test_put_makes_key_most_recent() {
    let mut cache = EvictionCache::default();
    cache.put("a", 1);
    cache.put("b", 2);
    cache.put("a", 3);

    assert_eq!(
        cache.entries().next(),
        Some(CacheItem { key: "a", value: Some(3) })
    );
}

#[test]
fn test_get_makes_key_most_recent() {
    let mut cache = EvictionCache::default();
    cache.put("a", 1);
    cache.put("b", 2);

    assert_eq!(cache.get(&"a"), Some(1));
    assert_eq!(keys(&cache), vec!["a", "b"]);
}

#[test]
fn test_upsert_is_update() {
    let mut cache = EvictionCache::default();
    cache.put("k", "v1");
    cache.put("k", "v2");

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(&"k"), Some("v2"));
}

#[test]
fn test_put_none_drops_exactly_one() {
    let mut cache = EvictionCache::default();
    cache.put("k", "v");
    cache.put("other", "w");

    cache.put("k", None);
    assert_eq!(cache.len(), 1);
    assert_eq!(keys(&cache), vec!["other"]);
}

#[test]
fn test_max_size_keeps_most_recent() {
    let mut cache = EvictionCache::new(CacheOptions::new().with_max_size(2));
    cache.put(1, "one");
    cache.put(2, "two");
    cache.put(3, "three");

    assert_eq!(keys(&cache), vec![3, 2]);
    assert_eq!(cache.get(&1), None);
}

#[test]
fn test_blank_key_asymmetry() {
    let mut cache = EvictionCache::default();
    cache.put(0, "zero");
    assert_eq!(cache.len(), 1);

    cache.remove(&0);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_blank_key_put_none_is_upsert() {
    let mut cache = EvictionCache::default();
    cache.put(0, "zero");
    cache.put(1, "one");
    cache.put(0, None);

    assert_eq!(keys(&cache), vec![0, 1]);
    assert_eq!(cache.get(&0), None);
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_idempotent_removal() {
    let mut cache = EvictionCache::default();
    cache.put("present", 1);

    for _ in 0..3 {
        assert_eq!(cache.remove(&"absent"), None);
        assert_eq!(cache.len(), 1);
    }
}

#[test]
fn test_empty_cache_lookup() {
    let mut cache: EvictionCache<String, String> = EvictionCache::default();
    assert_eq!(cache.get(&"anything".to_string()), None);
}

#[test]
fn test_options_from_json_drive_cache() {
    let options = CacheOptions::from_json(r#"{"maxSize": 1, "maxAge": "never"}"#).unwrap();
    let mut cache = EvictionCache::new(options);
    cache.put("a", 1);
    cache.put("b", 2);

    assert_eq!(cache.max_size(), Some(1));
    assert_eq!(cache.max_age(), None);
    assert_eq!(keys(&cache), vec!["b"]);
}

// == Expiry Tests ==

#[tokio::test(start_paused = true)]
async fn test_ttl_expiry() {
    let start = tokio::time::Instant::now();
    let mut cache = EvictionCache::new(CacheOptions::new().with_max_age(MINUTE));
    cache.put("k", "v");

    advance_to(start, 59).await;
    assert!(cache.contains_key(&"k"));

    advance_to(start, 61).await;
    assert!(!cache.contains_key(&"k"));
}

#[tokio::test(start_paused = true)]
async fn test_sliding_expiry_via_get() {
    let start = tokio::time::Instant::now();
    let mut cache = EvictionCache::new(CacheOptions::new().with_max_age(MINUTE));
    cache.put("k", "v");

    advance_to(start, 30).await;
    assert_eq!(cache.get(&"k"), Some("v"));

    advance_to(start, 60).await;
    assert!(cache.contains_key(&"k"));

    advance_to(start, 91).await;
    assert!(!cache.contains_key(&"k"));
}

#[tokio::test(start_paused = true)]
async fn test_sliding_expiry_via_put() {
    let start = tokio::time::Instant::now();
    let mut cache = EvictionCache::new(CacheOptions::new().with_max_age(MINUTE));
    cache.put("k", "v");

    advance_to(start, 30).await;
    cache.put("k", "newer");

    advance_to(start, 60).await;
    assert_eq!(cache.entries().next().map(|item| item.value), Some(Some("newer")));

    advance_to(start, 91).await;
    assert!(cache.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_expiry_and_size_compose() {
    let start = tokio::time::Instant::now();
    let mut cache = EvictionCache::new(
        CacheOptions::new().with_max_age(MINUTE).with_max_size(2),
    );
    cache.put("a", 1);
    advance_to(start, 20).await;
    cache.put("b", 2);
    advance_to(start, 40).await;
    cache.put("c", 3);

    // "a" went to LRU eviction, "b" and "c" expire on their own clocks
    assert_eq!(keys(&cache), vec!["c", "b"]);

    advance_to(start, 81).await;
    assert_eq!(keys(&cache), vec!["c"]);

    advance_to(start, 101).await;
    assert!(cache.is_empty());

    let stats = cache.stats();
    assert_eq!(stats.evictions, 1);
    assert_eq!(stats.expirations, 2);
}

#[tokio::test(start_paused = true)]
async fn test_expire_in_overrides_one_countdown() {
    let start = tokio::time::Instant::now();
    let mut cache = EvictionCache::new(CacheOptions::new().with_max_age(MINUTE));
    cache.put("short", 1);
    cache.put("long", 2);
    cache.expire_in(&"short", Duration::from_secs(10));

    advance_to(start, 11).await;
    assert_eq!(keys(&cache), vec!["long"]);

    advance_to(start, 61).await;
    assert!(cache.is_empty());
}

// == Shell Tests ==

#[tokio::test]
async fn test_shell_session() {
    let mut session = Session::from_options(CacheOptions::default());
    let mut out = Vec::new();

    shell::run(
        &mut session,
        "set a 1\nset b 2\nget a\ndel b\nlist\n".as_bytes(),
        &mut out,
    )
    .await
    .unwrap();

    let output = String::from_utf8(out).unwrap();
    let last = output.lines().last().unwrap();
    assert_eq!(last, r#"{"entries":[{"key":"a","value":"1"}]}"#);
}
