//! Prompt synthesis for the downstream text-generation consumer.

/// Text placed before the opening `"""` marker.
const PROMPT_PREAMBLE: &str = "Here are the label detection results for a video. \
The results are in CSV. Based on the labels, describe to me at a high-level, \
what the video might show in sequential order. \
Keep your response to three short sentences: ";

/// Text placed after the closing `"""` marker.
const PROMPT_INSTRUCTION: &str =
    "Don't tell me what the video is about, just say What you think can be seen in the video:";

/// Marker that fences the CSV inside the prompt.
pub const CSV_FENCE: &str = "\"\"\"";

/// Wrap a label CSV in the fixed video-description prompt.
///
/// The CSV is embedded verbatim between two `"""` lines.
pub fn video_labels_prompt(csv: &str) -> String {
    format!("{PROMPT_PREAMBLE}\n{CSV_FENCE}\n{csv}\n{CSV_FENCE}\n{PROMPT_INSTRUCTION}")
}
