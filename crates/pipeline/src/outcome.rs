//! Explicit results of one pipeline invocation.

use videohint_core::records::RecordStoreError;
use videohint_core::storage::StorageError;
use videohint_core::types::DbId;

/// Why an invocation finished without writing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The finalized object is not a `.json` label file.
    NotLabelFile,
    /// The JSON has no annotation results or does not fit the label schema.
    Malformed { reason: String },
    /// No `bot` record has the derived source path.
    NoMatchingRecord { source_path: String },
}

/// A completed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The prompt was written and the record's status cleared.
    Updated {
        record_id: DbId,
        source_path: String,
        /// Records that matched the source path; only the oldest is updated.
        matches: usize,
    },
    Skipped(SkipReason),
}

impl Outcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}

/// An I/O failure that stopped the invocation.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Could not download label file {bucket}/{name}: {source}")]
    Download {
        bucket: String,
        name: String,
        #[source]
        source: StorageError,
    },

    #[error("Label file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Record lookup for '{file}' failed: {source}")]
    Lookup {
        file: String,
        #[source]
        source: RecordStoreError,
    },

    #[error("Updating record {id} failed: {source}")]
    Update {
        id: DbId,
        #[source]
        source: RecordStoreError,
    },
}
