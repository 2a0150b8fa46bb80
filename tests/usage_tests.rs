//! Usage tracking and error log tests

use tempfile::TempDir;
use url_shortener::config::DatabaseConfig;
use url_shortener::context::CallContext;
use url_shortener::errors::ShortcutError;
use url_shortener::storage::SeaOrmStorage;

async fn create_temp_storage() -> (SeaOrmStorage, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("usage.db");
    let config = DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        pool_size: 5,
        timeout: 30,
    };

    let storage = SeaOrmStorage::new(&config)
        .await
        .expect("Failed to create storage");

    (storage, temp_dir)
}

fn ctx() -> CallContext {
    CallContext::background()
}

// =============================================================================
// 使用计数
// =============================================================================

#[tokio::test]
async fn test_resolve_counts_exactly_once() {
    let (storage, _dir) = create_temp_storage().await;
    let record = storage
        .create(&ctx(), "https://example.com/page", "ex1")
        .await
        .unwrap();
    let id = record.id.to_string();

    assert_eq!(
        storage.resolve(&ctx(), "EX1").await.unwrap(),
        "https://example.com/page"
    );
    assert_eq!(storage.lookup_by_id(&ctx(), &id).await.unwrap().usage_count, 1);

    let events = storage.usage_events(&ctx(), &id, 10).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].shortcut_id, record.id);

    storage.resolve(&ctx(), "ex1").await.unwrap();
    assert_eq!(storage.lookup_by_id(&ctx(), &id).await.unwrap().usage_count, 2);
    assert_eq!(storage.usage_events(&ctx(), &id, 10).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_resolve_unknown_short() {
    let (storage, _dir) = create_temp_storage().await;
    assert!(matches!(
        storage.resolve(&ctx(), "missing").await,
        Err(ShortcutError::ShortNotFound(_))
    ));
}

#[tokio::test]
async fn test_increment_and_log_are_independent() {
    let (storage, _dir) = create_temp_storage().await;
    let record = storage
        .create(&ctx(), "https://example.com", "inc")
        .await
        .unwrap();
    let id = record.id.to_string();

    storage.increment_usage(&ctx(), &id).await.unwrap();
    storage.increment_usage(&ctx(), &id).await.unwrap();
    assert_eq!(storage.lookup_by_id(&ctx(), &id).await.unwrap().usage_count, 2);
    assert!(storage.usage_events(&ctx(), &id, 10).await.unwrap().is_empty());

    storage.log_usage(&ctx(), &id).await.unwrap();
    assert_eq!(storage.lookup_by_id(&ctx(), &id).await.unwrap().usage_count, 2);
    assert_eq!(storage.usage_events(&ctx(), &id, 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_usage_errors() {
    let (storage, _dir) = create_temp_storage().await;
    let missing = uuid::Uuid::new_v4().to_string();

    assert!(matches!(
        storage.increment_usage(&ctx(), &missing).await,
        Err(ShortcutError::IdNotFound(_))
    ));
    assert!(matches!(
        storage.log_usage(&ctx(), &missing).await,
        Err(ShortcutError::IdNotFound(_))
    ));
    assert!(matches!(
        storage.record_usage(&ctx(), &missing).await,
        Err(ShortcutError::IdNotFound(_))
    ));
    assert!(matches!(
        storage.increment_usage(&ctx(), "nope").await,
        Err(ShortcutError::InvalidId(_))
    ));
    assert!(matches!(
        storage.usage_events(&ctx(), "nope", 5).await,
        Err(ShortcutError::InvalidId(_))
    ));
}

#[tokio::test]
async fn test_record_usage_on_deleted_record_leaves_nothing() {
    let (storage, _dir) = create_temp_storage().await;
    let record = storage
        .create(&ctx(), "https://example.com", "gone")
        .await
        .unwrap();
    let id = record.id.to_string();
    storage.soft_delete(&ctx(), &id).await.unwrap();

    assert!(matches!(
        storage.record_usage(&ctx(), &id).await,
        Err(ShortcutError::IdNotFound(_))
    ));
    assert!(storage.usage_events(&ctx(), &id, 10).await.unwrap().is_empty());
    assert_eq!(storage.details(&ctx(), &id).await.unwrap().usage_count, 0);
}

#[tokio::test]
async fn test_usage_events_newest_first_with_limit() {
    let (storage, _dir) = create_temp_storage().await;
    let record = storage
        .create(&ctx(), "https://example.com", "many")
        .await
        .unwrap();
    let id = record.id.to_string();

    for _ in 0..5 {
        storage.record_usage(&ctx(), &id).await.unwrap();
    }

    let events = storage.usage_events(&ctx(), &id, 3).await.unwrap();
    assert_eq!(events.len(), 3);
    for pair in events.windows(2) {
        assert!(pair[0].occurred_at >= pair[1].occurred_at);
        assert!(pair[0].id > pair[1].id);
    }
    assert_eq!(storage.lookup_by_id(&ctx(), &id).await.unwrap().usage_count, 5);
}

// =============================================================================
// 错误日志
// =============================================================================

#[tokio::test]
async fn test_error_log_round_trip() {
    let (storage, _dir) = create_temp_storage().await;
    assert!(storage.recent_errors(&ctx(), 10).await.unwrap().is_empty());

    storage
        .log_error(&ctx(), &ShortcutError::database_operation("first failure"))
        .await;
    storage
        .log_error(&ctx(), &ShortcutError::hashing("second failure"))
        .await;

    let entries = storage.recent_errors(&ctx(), 10).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].message, "Hashing Error: second failure");
    assert_eq!(
        entries[1].message,
        "Database Operation Error: first failure"
    );

    let limited = storage.recent_errors(&ctx(), 1).await.unwrap();
    assert_eq!(limited.len(), 1);
}

#[tokio::test]
async fn test_error_log_failure_is_swallowed() {
    let (storage, _dir) = create_temp_storage().await;
    let cancelled = CallContext::background();
    cancelled.cancel();

    // 写入失败不会向调用方返回错误
    storage
        .log_error(&cancelled, &ShortcutError::database_operation("lost"))
        .await;
    assert!(storage.recent_errors(&ctx(), 10).await.unwrap().is_empty());
}
