/// File stem of the trimmed left clip inside the output directory.
pub const LEFT_OUTPUT_STEM: &str = "left_trimmed";

/// File stem of the trimmed right clip inside the output directory.
pub const RIGHT_OUTPUT_STEM: &str = "right_trimmed";

/// Container extensions accepted as input, compared case-insensitively.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "m4v", "mkv", "avi"];

/// Check if an extension names a supported video container
pub fn is_video_extension(ext: &str) -> bool {
    VIDEO_EXTENSIONS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(ext))
}
