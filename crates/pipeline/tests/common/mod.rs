//! In-memory collaborators and log capture for pipeline tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::Dispatch;
use videohint_core::records::{RecordStore, RecordStoreError, SourceRecord};
use videohint_core::storage::{ObjectStorage, StorageError};
use videohint_core::types::DbId;

// ---------------------------------------------------------------------------
// Object storage
// ---------------------------------------------------------------------------

/// Objects keyed by `(bucket, name)`; counts every download attempt.
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    reads: AtomicUsize,
}

impl MemoryStorage {
    pub fn with_object(self, bucket: &str, name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), name.to_string()), bytes.into());
        self
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn download(&self, bucket: &str, name: &str) -> Result<Vec<u8>, StorageError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                bucket: bucket.to_string(),
                name: name.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Record store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: DbId,
    pub file: String,
    pub input: Option<String>,
    pub status: Option<String>,
}

/// `bot` records in insertion order; counts queries and updates.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<Vec<StoredRecord>>,
    queries: AtomicUsize,
    updates: AtomicUsize,
    fail_updates: bool,
}

impl MemoryRecordStore {
    /// A store whose every `set_prompt` fails with a backend error.
    pub fn failing_updates() -> Self {
        Self {
            fail_updates: true,
            ..Self::default()
        }
    }

    pub fn insert(&self, file: &str, status: Option<&str>) -> DbId {
        let mut records = self.records.lock().unwrap();
        let id = records.len() as DbId + 1;
        records.push(StoredRecord {
            id,
            file: file.to_string(),
            input: None,
            status: status.map(str::to_string),
        });
        id
    }

    pub fn get(&self, id: DbId) -> StoredRecord {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .expect("record should exist")
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn find_by_file(&self, file: &str) -> Result<Vec<SourceRecord>, RecordStoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.file == file)
            .map(|r| SourceRecord {
                id: r.id,
                file: r.file.clone(),
                status: r.status.clone(),
            })
            .collect())
    }

    async fn set_prompt(&self, id: DbId, prompt: &str) -> Result<(), RecordStoreError> {
        if self.fail_updates {
            return Err(RecordStoreError::Backend("connection reset".into()));
        }
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(RecordStoreError::NotFound { id })?;
        record.input = Some(prompt.to_string());
        record.status = None;
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Log capture
// ---------------------------------------------------------------------------

/// Collects formatted log lines written through [`LogCapture::dispatch`].
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn dispatch(&self) -> Dispatch {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        Dispatch::new(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }

    /// Lines at `level` (e.g. `"ERROR"`).
    pub fn lines_at(&self, level: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.trim_start().starts_with(level))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub const BUCKET: &str = "video-hint.appspot.com";

/// A label document with one annotation per `(label, start, end)` entry,
/// all inside a single annotation result.
pub fn label_json(entries: &[(&str, u64, u64)]) -> Vec<u8> {
    let annotations: Vec<serde_json::Value> = entries
        .iter()
        .map(|(label, start, end)| {
            serde_json::json!({
                "entity": { "description": label },
                "segments": [{
                    "segment": {
                        "start_time_offset": { "seconds": start },
                        "end_time_offset": { "seconds": end }
                    }
                }]
            })
        })
        .collect();

    serde_json::to_vec(&serde_json::json!({
        "annotation_results": [{ "shot_label_annotations": annotations }]
    }))
    .unwrap()
}
