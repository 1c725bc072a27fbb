//! Label-detection result -> prompt -> `bot` record.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument::WithSubscriber;
use tracing::{Dispatch, Instrument};
use videohint_core::labels::{LabelDetection, LabelError};
use videohint_core::paths::{is_label_file, source_path_for};
use videohint_core::prompt::video_labels_prompt;
use videohint_core::records::{RecordStore, BOT_COLLECTION};
use videohint_core::storage::ObjectStorage;
use videohint_events::{ObjectFinalized, ObjectFinalizedHandler};

use crate::outcome::{Outcome, PipelineError, SkipReason};

/// Turns finalized label-detection results into prompts on `bot` records.
///
/// Every step is a guard: an irrelevant, malformed or unmatched input ends
/// the invocation with [`Outcome::Skipped`], an I/O failure with
/// [`PipelineError`]. Nothing is retried and nothing is propagated to the
/// dispatcher.
///
/// Logs go to the [`Dispatch`] captured at construction (or supplied via
/// [`with_log`](Self::with_log)), not to whatever subscriber happens to be
/// current when an invocation runs.
pub struct LabelPromptHandler {
    storage: Arc<dyn ObjectStorage>,
    records: Arc<dyn RecordStore>,
    log: Dispatch,
}

impl LabelPromptHandler {
    pub fn new(storage: Arc<dyn ObjectStorage>, records: Arc<dyn RecordStore>) -> Self {
        Self {
            storage,
            records,
            log: tracing::dispatcher::get_default(Dispatch::clone),
        }
    }

    /// Route this handler's logs to `log`.
    pub fn with_log(mut self, log: Dispatch) -> Self {
        self.log = log;
        self
    }

    /// Run one invocation and return its outcome.
    pub async fn process(&self, event: &ObjectFinalized) -> Result<Outcome, PipelineError> {
        // The span must belong to the injected dispatcher, not the ambient one.
        let span = tracing::dispatcher::with_default(&self.log, || {
            tracing::info_span!(
                "handle_video_labels",
                bucket = %event.bucket,
                object = %event.name,
            )
        });
        self.run(event)
            .instrument(span)
            .with_subscriber(self.log.clone())
            .await
    }

    async fn run(&self, event: &ObjectFinalized) -> Result<Outcome, PipelineError> {
        tracing::info!("Starting");
        let file_path = event.name.as_str();

        if !is_label_file(file_path) {
            tracing::info!("Video labels file is not a json file, skipping");
            return Ok(Outcome::Skipped(SkipReason::NotLabelFile));
        }

        tracing::info!("Processing file");

        let bytes = self
            .storage
            .download(&event.bucket, file_path)
            .await
            .map_err(|source| {
                tracing::error!(error = %source, "Could not download the video labels JSON file");
                PipelineError::Download {
                    bucket: event.bucket.clone(),
                    name: event.name.clone(),
                    source,
                }
            })?;

        let json: serde_json::Value = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!(error = %e, "Could not parse the video labels JSON file");
            PipelineError::Parse(e)
        })?;

        let csv = match LabelDetection::from_value(json).and_then(|labels| labels.to_csv()) {
            Ok(csv) => csv,
            Err(e) => {
                match &e {
                    LabelError::MissingResults => {
                        tracing::error!("No annotation_results found in JSON, skipping");
                    }
                    LabelError::Schema(_) => {
                        tracing::error!(error = %e, "Video labels JSON has an unexpected shape, skipping");
                    }
                }
                return Ok(Outcome::Skipped(SkipReason::Malformed {
                    reason: e.to_string(),
                }));
            }
        };

        let prompt = video_labels_prompt(&csv);
        let source_path = source_path_for(file_path);

        let matches = self
            .records
            .find_by_file(&source_path)
            .await
            .map_err(|source| {
                tracing::error!(error = %source, source_path = %source_path, "Record lookup failed");
                PipelineError::Lookup {
                    file: source_path.clone(),
                    source,
                }
            })?;

        let Some(record) = matches.first() else {
            tracing::info!(
                collection = BOT_COLLECTION,
                source_path = %source_path,
                "No record found for file"
            );
            return Ok(Outcome::Skipped(SkipReason::NoMatchingRecord { source_path }));
        };

        if matches.len() > 1 {
            tracing::warn!(
                collection = BOT_COLLECTION,
                source_path = %source_path,
                matches = matches.len(),
                record_id = record.id,
                "Several records share this file, updating the oldest"
            );
        }

        self.records
            .set_prompt(record.id, &prompt)
            .await
            .map_err(|source| {
                tracing::error!(error = %source, record_id = record.id, "Record update failed");
                PipelineError::Update {
                    id: record.id,
                    source,
                }
            })?;

        tracing::info!(
            record_id = record.id,
            segments = csv.lines().count() - 1,
            "Finished: prompt generated and saved"
        );

        Ok(Outcome::Updated {
            record_id: record.id,
            source_path,
            matches: matches.len(),
        })
    }
}

#[async_trait]
impl ObjectFinalizedHandler for LabelPromptHandler {
    fn name(&self) -> &str {
        "handle-video-labels"
    }

    async fn handle(&self, event: &ObjectFinalized) {
        // `process` has already logged whichever way the invocation ended.
        let _ = self.process(event).await;
    }
}
