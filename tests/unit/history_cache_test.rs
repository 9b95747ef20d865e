//! Unit tests for the HistoryCache public API.
//!
//! Covers in-place updates, lookup, removal of route variants, front
//! eviction and lenient snapshot decoding.

use rstest::rstest;
use scroll_restore::managers::history_cache::{HistoryCache, HistoryCacheTrait};
use scroll_restore::types::record::{ScrollEntry, ScrollRecord};
use serde_json::json;

fn urls(cache: &HistoryCache) -> Vec<&str> {
    cache.records().iter().map(|r| r.url.as_str()).collect()
}

/// Adding an existing url replaces its payload without moving it.
#[test]
fn test_add_existing_url_updates_in_place() {
    let mut cache = HistoryCache::new(25);
    cache.add("/a", 10, None, None);
    cache.add("/b", 20, None, None);
    cache.add("/c", 30, None, None);

    cache.add("/b", 99, Some("main"), Some(640));

    assert_eq!(cache.len(), 3);
    assert_eq!(urls(&cache), vec!["/a", "/b", "/c"]);
    assert_eq!(
        cache.lookup("/b").unwrap().scroll,
        Some(ScrollEntry::new(99, Some("main".to_string()), Some(640)))
    );
}

#[test]
fn test_lookup_is_exact_match() {
    let mut cache = HistoryCache::new(25);
    cache.add("https://site.test/a?x=1", 5, None, None);

    assert!(cache.lookup("https://site.test/a").is_none());
    assert!(cache.lookup("https://site.test/a?x=1#top").is_none());
    assert_eq!(cache.lookup("https://site.test/a?x=1").unwrap().url, "https://site.test/a?x=1");
}

/// remove(url) drops both `url` and `url#/`.
#[test]
fn test_remove_drops_route_variant() {
    let mut cache = HistoryCache::new(25);
    cache.add("/app", 1, None, None);
    cache.add("/other", 2, None, None);
    cache.add("/app#/", 3, None, None);

    cache.remove("/app");

    assert_eq!(urls(&cache), vec!["/other"]);
}

#[test]
fn test_remove_route_variant_alone() {
    let mut cache = HistoryCache::new(25);
    cache.add("/app#/", 3, None, None);

    cache.remove("/app");

    assert!(cache.is_empty());
}

#[test]
fn test_remove_missing_url_is_noop() {
    let mut cache = HistoryCache::new(25);
    cache.add("/a", 1, None, None);
    let before = cache.clone();

    cache.remove("/zzz");

    assert_eq!(cache, before);
}

/// Overflow is trimmed from the front, oldest first.
#[test]
fn test_overflow_evicts_oldest() {
    let mut cache = HistoryCache::new(3);
    for (i, url) in ["/1", "/2", "/3", "/4", "/5"].iter().enumerate() {
        cache.add(url, i as i64, None, None);
        assert!(cache.len() <= 3);
    }

    assert_eq!(urls(&cache), vec!["/3", "/4", "/5"]);
}

/// An in-place update keeps an old record alive only in its original slot:
/// it is still the first to go on overflow.
#[test]
fn test_update_does_not_refresh_eviction_order() {
    let mut cache = HistoryCache::new(2);
    cache.add("/a", 1, None, None);
    cache.add("/b", 2, None, None);
    cache.add("/a", 3, None, None);
    cache.add("/c", 4, None, None);

    assert_eq!(urls(&cache), vec!["/b", "/c"]);
}

#[test]
fn test_shrinking_max_size_trims_front() {
    let mut cache = HistoryCache::new(10);
    for url in ["/1", "/2", "/3", "/4"] {
        cache.add(url, 0, None, None);
    }

    cache.set_max_size(2);

    assert_eq!(cache.max_size(), 2);
    assert_eq!(urls(&cache), vec!["/3", "/4"]);
}

#[test]
fn test_zero_capacity_keeps_nothing() {
    let mut cache = HistoryCache::new(0);
    cache.add("/a", 1, None, None);
    assert!(cache.is_empty());
}

#[test]
fn test_serialize_layout() {
    let mut cache = HistoryCache::new(25);
    cache.add("/a", 120, Some("main"), Some(800));
    cache.add("/b", 0, None, None);

    let value: serde_json::Value = serde_json::from_str(&cache.to_json_string()).unwrap();

    assert_eq!(
        value,
        json!({
            "urls": ["/a", "/b"],
            "scrolly": [
                {"pos": 120, "id": "main", "height": 800},
                {"pos": 0, "id": null, "height": null}
            ]
        })
    );
}

/// Payloads missing either array, or carrying non-arrays, decode to an empty cache.
#[rstest]
#[case("")]
#[case("not json")]
#[case("null")]
#[case("42")]
#[case("\"scrollHistory\"")]
#[case("[]")]
#[case("{}")]
#[case(r#"{"urls": ["/a"]}"#)]
#[case(r#"{"scrolly": [{"pos": 1}]}"#)]
#[case(r#"{"urls": "/a", "scrolly": [{"pos": 1}]}"#)]
#[case(r#"{"urls": ["/a"], "scrolly": {"pos": 1}}"#)]
fn test_malformed_snapshot_yields_empty_cache(#[case] raw: &str) {
    let cache = HistoryCache::from_json_str(raw, 25);
    assert!(cache.is_empty(), "expected empty cache for {:?}", raw);
}

#[test]
fn test_deserialize_keeps_malformed_payload_as_record() {
    let raw = json!({"urls": ["/a", "/b"], "scrolly": ["oops", {"pos": 7, "id": null, "height": null}]})
        .to_string();

    let cache = HistoryCache::from_json_str(&raw, 25);

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.lookup("/a").unwrap().scroll, None);
    assert_eq!(
        cache.lookup("/b").unwrap(),
        &ScrollRecord::new("/b", ScrollEntry::new(7, None, None))
    );
}

#[test]
fn test_deserialize_drops_duplicate_urls() {
    let raw = json!({
        "urls": ["/a", "/a"],
        "scrolly": [{"pos": 1, "id": null, "height": null}, {"pos": 2, "id": null, "height": null}]
    })
    .to_string();

    let cache = HistoryCache::from_json_str(&raw, 25);

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.lookup("/a").unwrap().scroll.as_ref().unwrap().position, 1);
}

/// Saving over an existing url also trims a snapshot loaded with a larger capacity.
#[test]
fn test_update_in_place_trims_oversized_snapshot() {
    let raw = json!({
        "urls": ["/1", "/2", "/3", "/4", "/5"],
        "scrolly": [{"pos": 1}, {"pos": 2}, {"pos": 3}, {"pos": 4}, {"pos": 5}]
    })
    .to_string();

    let mut cache = HistoryCache::from_json_str(&raw, 2);
    cache.add("/5", 50, None, None);

    assert_eq!(urls(&cache), vec!["/4", "/5"]);
    assert_eq!(cache.lookup("/5").unwrap().scroll.as_ref().unwrap().position, 50);
}

#[test]
fn test_deserialize_does_not_trim_until_mutation() {
    let raw = json!({
        "urls": ["/1", "/2", "/3"],
        "scrolly": [{"pos": 1}, {"pos": 2}, {"pos": 3}]
    })
    .to_string();

    let mut cache = HistoryCache::from_json_str(&raw, 2);
    assert_eq!(cache.len(), 3);

    cache.remove("/unrelated");
    assert_eq!(urls(&cache), vec!["/2", "/3"]);
}
