//! Object path conventions shared by the label-detection output and the
//! original upload.

/// Suffix of every label-detection result object.
pub const LABEL_FILE_EXTENSION: &str = ".json";

/// Directory token under which label-detection results are written.
pub const OUTPUT_DIR_TOKEN: &str = "video_annotation_output";

/// Directory token under which the source videos were uploaded.
pub const INPUT_DIR_TOKEN: &str = "video_annotation_input";

/// Whether `object_name` looks like a label-detection result.
pub fn is_label_file(object_name: &str) -> bool {
    object_name.ends_with(LABEL_FILE_EXTENSION)
}

/// Derive the source record path from a label-detection result path.
///
/// Strips the trailing `.json`, then replaces the first occurrence of
/// [`OUTPUT_DIR_TOKEN`] with [`INPUT_DIR_TOKEN`]. A path without the
/// suffix is only token-substituted.
pub fn source_path_for(label_path: &str) -> String {
    let stem = label_path
        .strip_suffix(LABEL_FILE_EXTENSION)
        .unwrap_or(label_path);
    stem.replacen(OUTPUT_DIR_TOKEN, INPUT_DIR_TOKEN, 1)
}
