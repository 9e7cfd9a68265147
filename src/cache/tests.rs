use tempfile::TempDir;

use super::*;

async fn open_cache(temp_dir: &TempDir) -> ChunkCache {
    ChunkCache::new(temp_dir.path().join("chunks.db"))
        .await
        .expect("can open cache")
}

#[tokio::test]
async fn miss_on_unknown_key() {
    let temp_dir = TempDir::new().expect("can create temp dir");
    let cache = open_cache(&temp_dir).await;

    let result = cache.get("doc-1").await.expect("get should succeed");
    assert!(result.is_none());
}

#[tokio::test]
async fn put_then_get_roundtrip() {
    let temp_dir = TempDir::new().expect("can create temp dir");
    let cache = open_cache(&temp_dir).await;

    let chunks = vec!["First chunk.".to_string(), "Second chunk.".to_string()];
    cache.put("doc-1", &chunks).await.expect("put should succeed");

    let stored = cache
        .get("doc-1")
        .await
        .expect("get should succeed")
        .expect("entry should exist");
    assert_eq!(stored, chunks);
}

#[tokio::test]
async fn put_overwrites_prior_value() {
    let temp_dir = TempDir::new().expect("can create temp dir");
    let cache = open_cache(&temp_dir).await;

    cache
        .put("doc-1", &["old".to_string()])
        .await
        .expect("put should succeed");
    cache
        .put("doc-1", &["new".to_string()])
        .await
        .expect("put should succeed");

    let stored = cache
        .get("doc-1")
        .await
        .expect("get should succeed")
        .expect("entry should exist");
    assert_eq!(stored, vec!["new".to_string()]);
    assert_eq!(cache.entry_count().await.expect("count should succeed"), 1);
}

#[tokio::test]
async fn empty_chunk_list_is_stored_explicitly() {
    let temp_dir = TempDir::new().expect("can create temp dir");
    let cache = open_cache(&temp_dir).await;

    cache.put("empty-doc", &[]).await.expect("put should succeed");

    let stored = cache
        .get("empty-doc")
        .await
        .expect("get should succeed")
        .expect("entry should exist even when empty");
    assert!(stored.is_empty());
}

#[tokio::test]
async fn clear_all_wipes_every_entry() {
    let temp_dir = TempDir::new().expect("can create temp dir");
    let cache = open_cache(&temp_dir).await;

    cache
        .put("doc-1", &["a".to_string()])
        .await
        .expect("put should succeed");
    cache
        .put("doc-2", &["b".to_string()])
        .await
        .expect("put should succeed");

    let cleared = cache.clear_all().await.expect("clear should succeed");
    assert_eq!(cleared, 2);
    assert!(cache.get("doc-1").await.expect("get should succeed").is_none());
    assert_eq!(cache.entry_count().await.expect("count should succeed"), 0);
}

#[tokio::test]
async fn entries_persist_across_reopen() {
    let temp_dir = TempDir::new().expect("can create temp dir");

    {
        let cache = open_cache(&temp_dir).await;
        cache
            .put("doc-1", &["persisted".to_string()])
            .await
            .expect("put should succeed");
    }

    let cache = open_cache(&temp_dir).await;
    let stored = cache
        .get("doc-1")
        .await
        .expect("get should succeed")
        .expect("entry should survive reopen");
    assert_eq!(stored, vec!["persisted".to_string()]);
}
