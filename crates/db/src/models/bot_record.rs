//! `bot` table entity model.

use serde::Serialize;
use sqlx::FromRow;
use videohint_core::records::SourceRecord;
use videohint_core::types::{DbId, Timestamp};

/// A row from the `bot` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BotRecord {
    pub id: DbId,
    /// Storage path of the uploaded source video.
    pub file: String,
    /// Prompt handed to the text-generation consumer.
    pub input: Option<String>,
    /// Text written back by the consumer.
    pub output: Option<String>,
    pub status: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<BotRecord> for SourceRecord {
    fn from(record: BotRecord) -> Self {
        Self {
            id: record.id,
            file: record.file,
            status: record.status,
        }
    }
}
