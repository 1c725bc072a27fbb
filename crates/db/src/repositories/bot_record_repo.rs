//! Repository for the `bot` table.

use sqlx::PgPool;
use videohint_core::types::DbId;

use crate::models::bot_record::BotRecord;

/// Column list for `bot` queries.
const COLUMNS: &str = "id, file, input, output, status, created_at, updated_at";

/// Provides read/write operations for `bot` records.
pub struct BotRecordRepo;

impl BotRecordRepo {
    /// Insert a record for an uploaded file, returning it.
    ///
    /// The upload step owns record creation; the pipeline itself never
    /// calls this.
    pub async fn create(
        pool: &PgPool,
        file: &str,
        status: Option<&str>,
    ) -> Result<BotRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO bot (file, status) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BotRecord>(&query)
            .bind(file)
            .bind(status)
            .fetch_one(pool)
            .await
    }

    /// Find a record by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BotRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bot WHERE id = $1");
        sqlx::query_as::<_, BotRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All records whose `file` equals `file`, oldest (lowest id) first.
    pub async fn find_by_file(pool: &PgPool, file: &str) -> Result<Vec<BotRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bot WHERE file = $1 ORDER BY id");
        sqlx::query_as::<_, BotRecord>(&query)
            .bind(file)
            .fetch_all(pool)
            .await
    }

    /// Overwrite `input` and reset `status` to NULL.
    ///
    /// Returns `true` if a row was updated.
    pub async fn set_input_and_clear_status(
        pool: &PgPool,
        id: DbId,
        input: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE bot SET input = $2, status = NULL, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(input)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
