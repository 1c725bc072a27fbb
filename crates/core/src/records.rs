//! Source record seam: the `bot` collection the pipeline writes prompts into.

use async_trait::async_trait;

use crate::types::DbId;

/// Collection (table) that holds one record per uploaded source video.
pub const BOT_COLLECTION: &str = "bot";

/// The part of a `bot` record the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    pub id: DbId,
    pub file: String,
    pub status: Option<String>,
}

/// Failure while querying or updating source records.
#[derive(Debug, thiserror::Error)]
pub enum RecordStoreError {
    #[error("Record {id} no longer exists")]
    NotFound { id: DbId },

    #[error("Record store error: {0}")]
    Backend(String),
}

/// Lookup and update access to the `bot` collection.
///
/// No transactions or version checks: concurrent updates to one record are
/// last-writer-wins.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records whose `file` equals `file`, oldest first.
    async fn find_by_file(&self, file: &str) -> Result<Vec<SourceRecord>, RecordStoreError>;

    /// Overwrite `input` with `prompt` and set `status` to null.
    async fn set_prompt(&self, id: DbId, prompt: &str) -> Result<(), RecordStoreError>;
}
