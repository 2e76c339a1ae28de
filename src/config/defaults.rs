//! Built-in values returned for keys absent from the document.

use serde_json::{json, Value};

use super::keys::SettingKey;

pub const DEFAULT_PARALLEL_TASKS: i64 = 1;
pub const DEFAULT_PREVIEW_SEGMENTS: i64 = 12;
pub const DEFAULT_PREVIEW_SEGMENT_DURATION: f64 = 0.75;
pub const DEFAULT_MAX_SESSION_AGE: i64 = 60 * 60;
pub const DEFAULT_DLNA_PORT: i64 = 1338;
pub const DEFAULT_LOG_LEVEL: &str = "Info";
pub const DEFAULT_GALLERY_COVER_REGEX: &str = r"(poster|cover|folder|board)\.[^\.]+$";

const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &[
    "m4v", "mp4", "mov", "wmv", "avi", "mpg", "mpeg", "rmvb", "rm", "flv", "asf", "mkv", "webm",
];
const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];
const DEFAULT_GALLERY_EXTENSIONS: &[&str] = &["zip", "cbz"];

/// Returns the built-in value for a key, or `None` when the zero value applies.
pub fn default_value(key: SettingKey) -> Option<Value> {
    let value = match key {
        SettingKey::ParallelTasks => json!(DEFAULT_PARALLEL_TASKS),
        SettingKey::PreviewSegments => json!(DEFAULT_PREVIEW_SEGMENTS),
        SettingKey::PreviewSegmentDuration => json!(DEFAULT_PREVIEW_SEGMENT_DURATION),
        SettingKey::PreviewExcludeStart | SettingKey::PreviewExcludeEnd => json!("0"),
        SettingKey::PreviewPreset => json!("slow"),
        SettingKey::PreviewAudio => json!(true),
        SettingKey::VideoFileNamingAlgorithm => json!("OSHASH"),
        SettingKey::BlobsStorage => json!("DATABASE"),
        SettingKey::MaxTranscodeSize | SettingKey::MaxStreamingTranscodeSize => json!("ORIGINAL"),
        SettingKey::MaxSessionAge => json!(DEFAULT_MAX_SESSION_AGE),
        SettingKey::LogLevel => json!(DEFAULT_LOG_LEVEL),
        SettingKey::LogOut | SettingKey::LogAccess => json!(true),
        SettingKey::GalleryCoverRegex => json!(DEFAULT_GALLERY_COVER_REGEX),
        SettingKey::VideoExtensions => json!(DEFAULT_VIDEO_EXTENSIONS),
        SettingKey::ImageExtensions => json!(DEFAULT_IMAGE_EXTENSIONS),
        SettingKey::GalleryExtensions => json!(DEFAULT_GALLERY_EXTENSIONS),
        SettingKey::WallPlayback => json!("video"),
        SettingKey::MaximumLoopDuration => json!(0),
        SettingKey::SoundOnPreview => json!(false),
        SettingKey::WallShowTitle | SettingKey::ShowScrubber => json!(true),
        SettingKey::NotificationsEnabled => json!(true),
        SettingKey::Language => json!("en-GB"),
        SettingKey::ImageLightboxSlideshowDelay => json!(5000),
        SettingKey::ImageLightboxDisplayMode => json!("FIT_XY"),
        SettingKey::ImageLightboxScrollMode => json!("ZOOM"),
        SettingKey::ImageLightboxScaleUp | SettingKey::ImageLightboxResetZoomOnNav => json!(true),
        SettingKey::ImageLightboxScrollAttemptsBeforeChange => json!(1),
        SettingKey::DlnaPort => json!(DEFAULT_DLNA_PORT),
        SettingKey::DlnaVideoSortOrder => json!("title"),
        SettingKey::ScraperCertCheck => json!(true),
        SettingKey::WriteImageThumbnails => json!(true),
        _ => return None,
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cover_regex_compiles() {
        assert!(regex::Regex::new(DEFAULT_GALLERY_COVER_REGEX).is_ok());
    }

    #[test]
    fn unset_keys_have_no_default() {
        assert!(default_value(SettingKey::Generated).is_none());
        assert_eq!(default_value(SettingKey::DlnaPort), Some(json!(1338)));
    }
}
