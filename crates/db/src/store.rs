//! [`RecordStore`] backed by the `bot` table.

use async_trait::async_trait;
use videohint_core::records::{RecordStore, RecordStoreError, SourceRecord};
use videohint_core::types::DbId;

use crate::repositories::BotRecordRepo;
use crate::DbPool;

/// Postgres implementation of the pipeline's record store.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: DbPool,
}

impl PgRecordStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn backend(err: sqlx::Error) -> RecordStoreError {
    RecordStoreError::Backend(err.to_string())
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn find_by_file(&self, file: &str) -> Result<Vec<SourceRecord>, RecordStoreError> {
        let records = BotRecordRepo::find_by_file(&self.pool, file)
            .await
            .map_err(backend)?;
        Ok(records.into_iter().map(SourceRecord::from).collect())
    }

    async fn set_prompt(&self, id: DbId, prompt: &str) -> Result<(), RecordStoreError> {
        let updated = BotRecordRepo::set_input_and_clear_status(&self.pool, id, prompt)
            .await
            .map_err(backend)?;
        if updated {
            tracing::debug!(record_id = id, "Cleared bot record status");
            Ok(())
        } else {
            Err(RecordStoreError::NotFound { id })
        }
    }
}
