mod common;

use common::FakeForum;
use quorum_client::ForumError;
use quorum_search::{TagCatalog, ThreadDetail};
use quorum_types::{ThreadDraft, ValidationError};
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[tokio::test]
async fn test_catalog_fetches_once() {
    let api = Arc::new(FakeForum::with_total(0));
    let catalog = TagCatalog::new(api.clone());
    assert!(catalog.cached().is_none());

    let (a, b) = tokio::join!(catalog.tags(), catalog.tags());
    assert_eq!(a.unwrap().len(), 2);
    assert_eq!(b.unwrap().len(), 2);
    assert_eq!(catalog.name_of("t2").await.unwrap(), Some("Frontend"));

    assert_eq!(api.tag_calls.load(Ordering::SeqCst), 1);
    assert!(catalog.cached().is_some());
}

#[tokio::test]
async fn test_catalog_resolves_by_name() {
    let api = Arc::new(FakeForum::with_total(0));
    let catalog = TagCatalog::new(api);

    assert_eq!(catalog.resolve("t1").await.unwrap().unwrap().name, "backend");
    assert_eq!(catalog.resolve("frontend").await.unwrap().unwrap().id, "t2");
    assert!(catalog.resolve("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn test_catalog_retries_after_failure() {
    let api = Arc::new(FakeForum::with_total(0));
    let catalog = TagCatalog::new(api.clone());

    api.set_failing(true);
    assert!(catalog.tags().await.is_err());
    assert!(catalog.cached().is_none());

    api.set_failing(false);
    assert_eq!(catalog.tags().await.unwrap().len(), 2);
    assert_eq!(api.tag_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_post_reply_refetches_replies() {
    let api = Arc::new(FakeForum::with_total(0));
    let mut detail = ThreadDetail::load(api.clone(), "thread-9").await.unwrap();
    assert_eq!(detail.thread().id, "thread-9");
    assert!(detail.replies().is_empty());

    let reply = detail.post_reply("  Looks good to me ").await.unwrap();
    assert_eq!(reply.content, "Looks good to me");
    assert_eq!(detail.replies().len(), 1);
    assert_eq!(detail.replies()[0].thread_id, "thread-9");
}

#[tokio::test]
async fn test_empty_reply_never_sent() {
    let api = Arc::new(FakeForum::with_total(0));
    let mut detail = ThreadDetail::load(api.clone(), "thread-9").await.unwrap();

    let err = detail.post_reply("   ").await.unwrap_err();
    assert!(matches!(
        err,
        ForumError::Validation(ValidationError::Required { field: "content" })
    ));
    assert!(api.replies.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_load_missing_thread() {
    let api = Arc::new(FakeForum::with_total(0));
    let err = ThreadDetail::load(api, "missing").await.err().unwrap();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_create_thread_validates_first() {
    let api = Arc::new(FakeForum::with_total(0));

    let err = ThreadDetail::create(api.clone(), &ThreadDraft::new("x".repeat(101), "body"))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, ForumError::Validation(_)));
    assert!(api.created.lock().unwrap().is_empty());

    let draft = ThreadDraft::new("Sprint review", "Notes inside").with_tags(["t1"]);
    let detail = ThreadDetail::create(api.clone(), &draft).await.unwrap();
    assert_eq!(detail.thread().title, "Sprint review");
    assert_eq!(
        api.created.lock().unwrap()[0].tag_ids,
        Some(vec!["t1".to_string()])
    );
}
