//! Label-detection result schema and its CSV flattening.
//!
//! The schema mirrors the snake_case JSON written by the video label
//! detection service. Only the fields the CSV needs are modelled; everything
//! else in the document is ignored during deserialization.

use std::fmt;

use serde::Deserialize;

/// Header line of every label CSV.
pub const CSV_HEADER: &str = "start_seconds,end_seconds,detected_label";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a parsed JSON document could not be turned into a label CSV.
#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    #[error("No annotation_results found in label document")]
    MissingResults,

    #[error("Label document does not match the annotation schema: {0}")]
    Schema(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Root of a label-detection result file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabelDetection {
    /// `None` when the key is absent or `null`.
    #[serde(default)]
    pub annotation_results: Option<Vec<AnnotationResult>>,
}

/// Annotations produced for one analysed input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnnotationResult {
    #[serde(default)]
    pub shot_label_annotations: Vec<ShotLabelAnnotation>,
}

/// One detected concept and every time range where it appears.
#[derive(Debug, Clone, Deserialize)]
pub struct ShotLabelAnnotation {
    pub entity: Entity,
    #[serde(default)]
    pub segments: Vec<LabelSegment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Entity {
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelSegment {
    pub segment: TimeRange,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TimeRange {
    #[serde(default)]
    pub start_time_offset: TimeOffset,
    #[serde(default)]
    pub end_time_offset: TimeOffset,
}

/// A protobuf `Duration` as it appears in the label JSON.
///
/// Only whole seconds are rendered. The service omits `seconds` when it is
/// zero, so an absent value prints as `0`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TimeOffset {
    #[serde(default)]
    pub seconds: Option<Seconds>,
}

/// Seconds are normally a JSON number; int64 fields may also arrive as
/// decimal strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Seconds {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Whole floats (`5.0`, `1e2`) print like integers; `-0.0` prints as `0`.
            Self::Number(n) => match n.as_f64() {
                Some(value) if n.is_f64() && value.fract() == 0.0 => {
                    write!(f, "{}", if value == 0.0 { 0.0 } else { value })
                }
                _ => write!(f, "{n}"),
            },
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl fmt::Display for TimeOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.seconds {
            Some(seconds) => write!(f, "{seconds}"),
            None => f.write_str("0"),
        }
    }
}

// ---------------------------------------------------------------------------
// Flattening
// ---------------------------------------------------------------------------

/// One CSV row borrowed from a [`LabelDetection`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelRow<'a> {
    pub start: &'a TimeOffset,
    pub end: &'a TimeOffset,
    pub label: &'a str,
}

impl fmt::Display for LabelRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.start, self.end, self.label)
    }
}

impl LabelDetection {
    /// Deserialize from an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, LabelError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Whether the document has at least one annotation result.
    pub fn has_results(&self) -> bool {
        self.annotation_results
            .as_ref()
            .is_some_and(|results| !results.is_empty())
    }

    /// All segments in document order: results, then annotations, then
    /// segments. Nothing is re-sorted.
    pub fn rows(&self) -> impl Iterator<Item = LabelRow<'_>> {
        self.annotation_results
            .iter()
            .flatten()
            .flat_map(|result| &result.shot_label_annotations)
            .flat_map(|annotation| {
                annotation.segments.iter().map(move |segment| LabelRow {
                    start: &segment.segment.start_time_offset,
                    end: &segment.segment.end_time_offset,
                    label: &annotation.entity.description,
                })
            })
    }

    /// Render the CSV: the header, then one line per segment, joined by `\n`
    /// with no trailing newline.
    ///
    /// Fields are written verbatim; labels are not quoted or escaped.
    pub fn to_csv(&self) -> Result<String, LabelError> {
        if !self.has_results() {
            return Err(LabelError::MissingResults);
        }

        let lines: Vec<String> = std::iter::once(CSV_HEADER.to_string())
            .chain(self.rows().map(|row| row.to_string()))
            .collect();

        Ok(lines.join("\n"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
