//! Integration tests for the `bot` repository and [`PgRecordStore`].
//!
//! These need a Postgres server (`DATABASE_URL`); run them with
//! `cargo test -p videohint-db -- --ignored`.

use sqlx::PgPool;
use videohint_core::records::{RecordStore, RecordStoreError};
use videohint_db::repositories::BotRecordRepo;
use videohint_db::PgRecordStore;

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn find_by_file_matches_exactly_and_orders_by_id(pool: PgPool) {
    let first = BotRecordRepo::create(&pool, "video_annotation_input/abc", Some("PENDING"))
        .await
        .unwrap();
    let second = BotRecordRepo::create(&pool, "video_annotation_input/abc", None)
        .await
        .unwrap();
    BotRecordRepo::create(&pool, "video_annotation_input/abcd", None)
        .await
        .unwrap();

    let found = BotRecordRepo::find_by_file(&pool, "video_annotation_input/abc")
        .await
        .unwrap();

    let ids: Vec<i64> = found.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn set_prompt_overwrites_input_and_clears_status(pool: PgPool) {
    let record = BotRecordRepo::create(&pool, "video_annotation_input/abc", Some("PENDING"))
        .await
        .unwrap();
    let other = BotRecordRepo::create(&pool, "video_annotation_input/other", Some("PENDING"))
        .await
        .unwrap();

    let store = PgRecordStore::new(pool.clone());
    store.set_prompt(record.id, "describe this").await.unwrap();

    let updated = BotRecordRepo::find_by_id(&pool, record.id).await.unwrap().unwrap();
    assert_eq!(updated.input.as_deref(), Some("describe this"));
    assert!(updated.status.is_none());

    let untouched = BotRecordRepo::find_by_id(&pool, other.id).await.unwrap().unwrap();
    assert!(untouched.input.is_none());
    assert_eq!(untouched.status.as_deref(), Some("PENDING"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn set_prompt_on_missing_record_is_not_found(pool: PgPool) {
    let store = PgRecordStore::new(pool);
    let result = store.set_prompt(9_999, "prompt").await;
    assert!(matches!(result, Err(RecordStoreError::NotFound { id: 9_999 })));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn store_lookup_returns_source_records(pool: PgPool) {
    let record = BotRecordRepo::create(&pool, "video_annotation_input/xyz", Some("PROCESSING"))
        .await
        .unwrap();

    let store = PgRecordStore::new(pool);
    let found = store.find_by_file("video_annotation_input/xyz").await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, record.id);
    assert_eq!(found[0].status.as_deref(), Some("PROCESSING"));
    assert!(store.find_by_file("video_annotation_input/none").await.unwrap().is_empty());
}
