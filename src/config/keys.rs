//! Stable identifiers for every persisted setting.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

macro_rules! setting_keys {
    ($($variant:ident => $id:literal),+ $(,)?) => {
        /// Closed set of configuration keys, each mapped to its persisted identifier.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum SettingKey {
            $($variant),+
        }

        impl SettingKey {
            /// Every known key, in declaration order.
            pub const ALL: &'static [SettingKey] = &[$(SettingKey::$variant),+];

            /// Returns the identifier used in the persisted document.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(SettingKey::$variant => $id),+
                }
            }
        }
    };
}

setting_keys! {
    // Library and storage
    Stash => "stash",
    Database => "database",
    BackupDirectoryPath => "backup_directory_path",
    Generated => "generated",
    Metadata => "metadata",
    ScrapersPath => "scrapers_path",
    PluginsPath => "plugins_path",
    Cache => "cache",
    BlobsPath => "blobs_path",
    BlobsStorage => "blobs_storage",

    // Transcoding and hashing
    FfmpegPath => "ffmpeg_path",
    FfprobePath => "ffprobe_path",
    CalculateMd5 => "calculate_md5",
    VideoFileNamingAlgorithm => "video_file_naming_algorithm",
    ParallelTasks => "parallel_tasks",
    PreviewAudio => "preview_audio",
    PreviewSegments => "preview_segments",
    PreviewSegmentDuration => "preview_segment_duration",
    PreviewExcludeStart => "preview_exclude_start",
    PreviewExcludeEnd => "preview_exclude_end",
    PreviewPreset => "preview_preset",
    TranscodeHardwareAcceleration => "ffmpeg.hardware_acceleration",
    MaxTranscodeSize => "max_transcode_size",
    MaxStreamingTranscodeSize => "max_streaming_transcode_size",
    TranscodeInputArgs => "ffmpeg.transcode.input_args",
    TranscodeOutputArgs => "ffmpeg.transcode.output_args",
    LiveTranscodeInputArgs => "ffmpeg.live_transcode.input_args",
    LiveTranscodeOutputArgs => "ffmpeg.live_transcode.output_args",
    WriteImageThumbnails => "write_image_thumbnails",
    CreateImageClipsFromVideos => "create_image_clip_from_videos",
    GalleryCoverRegex => "gallery_cover_regex",

    // Credentials
    Username => "username",
    Password => "password",
    MaxSessionAge => "max_session_age",
    ApiKey => "api_key",
    JwtSecretKey => "jwt_secret_key",

    // Logging
    LogFile => "logfile",
    LogOut => "logout",
    LogAccess => "logaccess",
    LogLevel => "loglevel",

    // Library filtering
    Exclude => "exclude",
    ImageExclude => "image_exclude",
    VideoExtensions => "video_extensions",
    ImageExtensions => "image_extensions",
    GalleryExtensions => "gallery_extensions",
    CreateGalleriesFromFolders => "create_galleries_from_folders",

    // Integrations
    CustomPerformerImageLocation => "custom_performer_image_location",
    StashBoxes => "stash_boxes",
    PythonPath => "python_path",
    DrawFunscriptHeatmapRange => "draw_funscript_heatmap_range",
    ScraperPackageSources => "scraper_package_sources",
    PluginPackageSources => "plugin_package_sources",

    // Interface
    MenuItems => "menu_items",
    SoundOnPreview => "sound_on_preview",
    WallShowTitle => "wall_show_title",
    NoBrowser => "nobrowser",
    NotificationsEnabled => "notifications_enabled",
    ShowScrubber => "show_scrubber",
    WallPlayback => "wall_playback",
    MaximumLoopDuration => "maximum_loop_duration",
    AutostartVideo => "autostart_video",
    ShowStudioAsText => "show_studio_as_text",
    AutostartVideoOnPlaySelected => "autostart_video_on_play_selected",
    ContinuePlaylistDefault => "continue_playlist_default",
    Language => "language",
    ImageLightboxSlideshowDelay => "image_lightbox.slideshow_delay",
    ImageLightboxDisplayMode => "image_lightbox.display_mode",
    ImageLightboxScaleUp => "image_lightbox.scale_up",
    ImageLightboxResetZoomOnNav => "image_lightbox.reset_zoom_on_nav",
    ImageLightboxScrollMode => "image_lightbox.scroll_mode",
    ImageLightboxScrollAttemptsBeforeChange => "image_lightbox.scroll_attempts_before_change",
    Css => "css",
    CssEnabled => "cssenabled",
    Javascript => "javascript",
    JavascriptEnabled => "javascriptenabled",
    CustomLocales => "custom_locales",
    CustomLocalesEnabled => "customlocalesenabled",
    DisableDropdownCreatePerformer => "disable_dropdown_create.performer",
    DisableDropdownCreateStudio => "disable_dropdown_create.studio",
    DisableDropdownCreateTag => "disable_dropdown_create.tag",
    DisableDropdownCreateMovie => "disable_dropdown_create.movie",
    HandyKey => "handy_key",
    FunscriptOffset => "funscript_offset",
    UseStashHostedFunscript => "use_stash_hosted_funscript",

    // DLNA
    DlnaServerName => "dlna.server_name",
    DlnaDefaultEnabled => "dlna.default_enabled",
    DlnaPort => "dlna.port",
    DlnaDefaultIpWhitelist => "dlna.default_whitelist",
    DlnaInterfaces => "dlna.interfaces",
    DlnaVideoSortOrder => "dlna.video_sort_order",

    // Scraping
    ScraperUserAgent => "scraper_user_agent",
    ScraperCdpPath => "scraper_cdp_path",
    ScraperCertCheck => "scraper_cert_check",
    ScraperExcludeTagPatterns => "scraper_exclude_tag_patterns",

    // Task defaults
    DefaultIdentifySettings => "defaults.identify_task",
    DefaultScanSettings => "defaults.scan_task",
    DefaultAutoTagSettings => "defaults.auto_tag_task",
    DefaultGenerateSettings => "defaults.generate_task",
    DeleteFileDefault => "defaults.delete_file",
    DeleteGeneratedDefault => "defaults.delete_generated",

    // Free-form blobs
    Ui => "ui",
    PluginSettings => "plugins.settings",
}

impl SettingKey {
    /// Keys whose value lives in a side file next to the document instead of in it.
    pub fn asset_file_name(&self) -> Option<&'static str> {
        match self {
            Self::Css => Some("custom.css"),
            Self::Javascript => Some("custom.js"),
            Self::CustomLocales => Some("custom-locales.json"),
            _ => None,
        }
    }

    /// Settings group the key is configured through.
    pub fn group(&self) -> &'static str {
        use SettingKey::*;

        match self {
            MenuItems | SoundOnPreview | WallShowTitle | NoBrowser | NotificationsEnabled
            | ShowScrubber | WallPlayback | MaximumLoopDuration | AutostartVideo
            | ShowStudioAsText | AutostartVideoOnPlaySelected | ContinuePlaylistDefault
            | Language | ImageLightboxSlideshowDelay | ImageLightboxDisplayMode
            | ImageLightboxScaleUp | ImageLightboxResetZoomOnNav | ImageLightboxScrollMode
            | ImageLightboxScrollAttemptsBeforeChange | Css | CssEnabled | Javascript
            | JavascriptEnabled | CustomLocales | CustomLocalesEnabled
            | DisableDropdownCreatePerformer | DisableDropdownCreateStudio
            | DisableDropdownCreateTag | DisableDropdownCreateMovie | HandyKey
            | FunscriptOffset | UseStashHostedFunscript => "interface",
            DlnaServerName | DlnaDefaultEnabled | DlnaPort | DlnaDefaultIpWhitelist
            | DlnaInterfaces | DlnaVideoSortOrder => "dlna",
            ScraperUserAgent | ScraperCdpPath | ScraperCertCheck
            | ScraperExcludeTagPatterns => "scraping",
            DefaultIdentifySettings | DefaultScanSettings | DefaultAutoTagSettings
            | DefaultGenerateSettings | DeleteFileDefault | DeleteGeneratedDefault => "defaults",
            Ui => "ui",
            PluginSettings => "plugins",
            _ => "general",
        }
    }

    /// Name of the environment variable that overrides this key.
    ///
    /// `ffmpeg.hardware_acceleration` becomes `MEDIA_FFMPEG_HARDWARE_ACCELERATION`.
    pub fn env_var(&self) -> String {
        format!(
            "{}{}",
            super::loader::ENV_PREFIX,
            self.as_str().replace('.', "_").to_uppercase()
        )
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|key| key.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown setting key '{}'", s))
    }
}

impl Serialize for SettingKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for key in SettingKey::ALL {
            assert!(seen.insert(key.as_str()), "duplicate identifier {}", key);
        }
    }

    #[test]
    fn parses_identifiers_back() {
        assert_eq!("dlna.port".parse::<SettingKey>().unwrap(), SettingKey::DlnaPort);
        assert!("no_such_key".parse::<SettingKey>().is_err());
    }

    #[test]
    fn keys_belong_to_their_settings_group() {
        assert_eq!(SettingKey::Generated.group(), "general");
        assert_eq!(SettingKey::ImageLightboxScaleUp.group(), "interface");
        assert_eq!(SettingKey::DlnaPort.group(), "dlna");
        assert_eq!(SettingKey::ScraperCertCheck.group(), "scraping");
        assert_eq!(SettingKey::DeleteFileDefault.group(), "defaults");
        assert_eq!(SettingKey::PluginSettings.group(), "plugins");
    }

    #[test]
    fn env_var_names() {
        assert_eq!(
            SettingKey::TranscodeHardwareAcceleration.env_var(),
            "MEDIA_FFMPEG_HARDWARE_ACCELERATION"
        );
        assert_eq!(SettingKey::Generated.env_var(), "MEDIA_GENERATED");
    }
}
