//! Library, storage, transcoding, credentials and logging settings.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::hash_password;
use crate::config::model::{
    BlobStorageType, HashAlgorithm, PackageSource, PreviewPreset, StashBox, StashPath,
    StreamingResolution,
};
use crate::config::{ConfigService, ConfigStore, SettingKey, SettingValue};
use crate::error::{MutationError, MutationFailure};
use crate::validation::{
    binary::validate_binary, paths, patterns, policy, semantic, BinaryKind, BinaryProbe,
    MediaCatalog,
};

use super::plan::{as_list, as_str, Plan};

/// Partial update of the general settings group. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralInput {
    pub stashes: Option<Vec<StashPath>>,
    pub database_path: Option<String>,
    pub backup_directory_path: Option<String>,
    pub generated_path: Option<String>,
    pub scrapers_path: Option<String>,
    pub plugins_path: Option<String>,
    pub metadata_path: Option<String>,
    pub cache_path: Option<String>,
    pub blobs_path: Option<String>,
    pub blobs_storage: Option<BlobStorageType>,
    pub ffmpeg_path: Option<String>,
    pub ffprobe_path: Option<String>,
    pub calculate_md5: Option<bool>,
    pub video_file_naming_algorithm: Option<HashAlgorithm>,
    pub parallel_tasks: Option<i64>,
    pub preview_audio: Option<bool>,
    pub preview_segments: Option<i64>,
    pub preview_segment_duration: Option<f64>,
    pub preview_exclude_start: Option<String>,
    pub preview_exclude_end: Option<String>,
    pub preview_preset: Option<PreviewPreset>,
    pub transcode_hardware_acceleration: Option<bool>,
    pub max_transcode_size: Option<StreamingResolution>,
    pub max_streaming_transcode_size: Option<StreamingResolution>,
    pub write_image_thumbnails: Option<bool>,
    pub create_image_clips_from_videos: Option<bool>,
    pub gallery_cover_regex: Option<String>,
    pub username: Option<String>,
    /// Plaintext password, or the stored hash to leave it unchanged.
    pub password: Option<String>,
    pub max_session_age: Option<i64>,
    pub log_file: Option<String>,
    pub log_out: Option<bool>,
    pub log_access: Option<bool>,
    pub log_level: Option<String>,
    pub excludes: Option<Vec<String>>,
    pub image_excludes: Option<Vec<String>>,
    pub video_extensions: Option<Vec<String>>,
    pub image_extensions: Option<Vec<String>>,
    pub gallery_extensions: Option<Vec<String>>,
    pub create_galleries_from_folders: Option<bool>,
    pub custom_performer_image_location: Option<String>,
    pub stash_boxes: Option<Vec<StashBox>>,
    pub python_path: Option<String>,
    pub transcode_input_args: Option<Vec<String>>,
    pub transcode_output_args: Option<Vec<String>>,
    pub live_transcode_input_args: Option<Vec<String>>,
    pub live_transcode_output_args: Option<Vec<String>>,
    pub draw_funscript_heatmap_range: Option<bool>,
    pub scraper_package_sources: Option<Vec<PackageSource>>,
    pub plugin_package_sources: Option<Vec<PackageSource>>,
}

/// Materialized general settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneralView {
    pub stashes: Vec<StashPath>,
    pub database_path: String,
    pub backup_directory_path: String,
    pub generated_path: String,
    pub metadata_path: String,
    pub config_file_path: String,
    pub scrapers_path: String,
    pub plugins_path: String,
    pub cache_path: String,
    pub blobs_path: String,
    pub blobs_storage: String,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub calculate_md5: bool,
    pub video_file_naming_algorithm: String,
    pub parallel_tasks: i64,
    pub preview_audio: bool,
    pub preview_segments: i64,
    pub preview_segment_duration: f64,
    pub preview_exclude_start: String,
    pub preview_exclude_end: String,
    pub preview_preset: String,
    pub transcode_hardware_acceleration: bool,
    pub max_transcode_size: String,
    pub max_streaming_transcode_size: String,
    pub write_image_thumbnails: bool,
    pub create_image_clips_from_videos: bool,
    pub gallery_cover_regex: String,
    pub api_key: String,
    pub username: String,
    pub password: String,
    pub max_session_age: i64,
    pub log_file: String,
    pub log_out: bool,
    pub log_access: bool,
    pub log_level: String,
    pub excludes: Vec<String>,
    pub image_excludes: Vec<String>,
    pub video_extensions: Vec<String>,
    pub image_extensions: Vec<String>,
    pub gallery_extensions: Vec<String>,
    pub create_galleries_from_folders: bool,
    pub custom_performer_image_location: String,
    pub stash_boxes: Vec<StashBox>,
    pub python_path: String,
    pub transcode_input_args: Vec<String>,
    pub transcode_output_args: Vec<String>,
    pub live_transcode_input_args: Vec<String>,
    pub live_transcode_output_args: Vec<String>,
    pub draw_funscript_heatmap_range: bool,
    pub scraper_package_sources: Vec<PackageSource>,
    pub plugin_package_sources: Vec<PackageSource>,
}

impl GeneralView {
    pub fn from_store(store: &ConfigStore) -> Self {
        use SettingKey as K;

        Self {
            stashes: store.get_stash_paths(),
            database_path: store.get_string(K::Database),
            backup_directory_path: store.get_string(K::BackupDirectoryPath),
            generated_path: store.get_string(K::Generated),
            metadata_path: store.get_string(K::Metadata),
            config_file_path: store.path().display().to_string(),
            scrapers_path: store.get_string(K::ScrapersPath),
            plugins_path: store.get_string(K::PluginsPath),
            cache_path: store.get_string(K::Cache),
            blobs_path: store.get_string(K::BlobsPath),
            blobs_storage: store.get_string(K::BlobsStorage),
            ffmpeg_path: store.get_string(K::FfmpegPath),
            ffprobe_path: store.get_string(K::FfprobePath),
            calculate_md5: store.get_bool(K::CalculateMd5),
            video_file_naming_algorithm: store.get_string(K::VideoFileNamingAlgorithm),
            parallel_tasks: store.get_int(K::ParallelTasks),
            preview_audio: store.get_bool(K::PreviewAudio),
            preview_segments: store.get_int(K::PreviewSegments),
            preview_segment_duration: store.get_float(K::PreviewSegmentDuration),
            preview_exclude_start: store.get_string(K::PreviewExcludeStart),
            preview_exclude_end: store.get_string(K::PreviewExcludeEnd),
            preview_preset: store.get_string(K::PreviewPreset),
            transcode_hardware_acceleration: store.get_bool(K::TranscodeHardwareAcceleration),
            max_transcode_size: store.get_string(K::MaxTranscodeSize),
            max_streaming_transcode_size: store.get_string(K::MaxStreamingTranscodeSize),
            write_image_thumbnails: store.get_bool(K::WriteImageThumbnails),
            create_image_clips_from_videos: store.get_bool(K::CreateImageClipsFromVideos),
            gallery_cover_regex: store.get_string(K::GalleryCoverRegex),
            api_key: store.get_string(K::ApiKey),
            username: store.get_string(K::Username),
            password: store.get_string(K::Password),
            max_session_age: store.get_int(K::MaxSessionAge),
            log_file: store.get_string(K::LogFile),
            log_out: store.get_bool(K::LogOut),
            log_access: store.get_bool(K::LogAccess),
            log_level: store.get_string(K::LogLevel),
            excludes: store.get_string_list(K::Exclude),
            image_excludes: store.get_string_list(K::ImageExclude),
            video_extensions: store.get_string_list(K::VideoExtensions),
            image_extensions: store.get_string_list(K::ImageExtensions),
            gallery_extensions: store.get_string_list(K::GalleryExtensions),
            create_galleries_from_folders: store.get_bool(K::CreateGalleriesFromFolders),
            custom_performer_image_location: store.get_string(K::CustomPerformerImageLocation),
            stash_boxes: store.get_stash_boxes(),
            python_path: store.get_string(K::PythonPath),
            transcode_input_args: store.get_string_list(K::TranscodeInputArgs),
            transcode_output_args: store.get_string_list(K::TranscodeOutputArgs),
            live_transcode_input_args: store.get_string_list(K::LiveTranscodeInputArgs),
            live_transcode_output_args: store.get_string_list(K::LiveTranscodeOutputArgs),
            draw_funscript_heatmap_range: store.get_bool(K::DrawFunscriptHeatmapRange),
            scraper_package_sources: store.get_package_sources(K::ScraperPackageSources),
            plugin_package_sources: store.get_package_sources(K::PluginPackageSources),
        }
    }
}

impl ConfigService {
    /// Applies a partial update of the general settings.
    pub async fn configure_general(
        &self,
        input: GeneralInput,
    ) -> Result<GeneralView, MutationFailure<GeneralView>> {
        let probe = self.probe.as_ref();
        let catalog = self.catalog.as_ref();

        self.mutate(
            "general",
            |plan| plan_general(plan, input, probe, catalog),
            GeneralView::from_store,
        )
        .await
    }

    pub async fn general_view(&self) -> GeneralView {
        GeneralView::from_store(&*self.read().await)
    }
}

/// Stages the general settings in their documented order.
///
/// Calculate-MD5 is staged before the naming algorithm so the algorithm policy
/// sees the value from the same update.
fn plan_general(
    plan: &mut Plan<'_>,
    input: GeneralInput,
    probe: &dyn BinaryProbe,
    catalog: &dyn MediaCatalog,
) -> Result<(), MutationError> {
    use SettingKey as K;

    let existing_stashes = plan.store().get_stash_paths();
    plan.set_checked(K::Stash, input.stashes, |value| match value {
        SettingValue::Stashes(candidate) => paths::validate_stash_paths(&existing_stashes, candidate),
        _ => Ok(()),
    })?;

    plan.set_checked(K::Database, input.database_path, |v| {
        paths::validate_database_path(as_str(v))
    })?;
    plan.set_directory(K::BackupDirectoryPath, input.backup_directory_path, true)?;
    plan.set_directory(K::Generated, input.generated_path, false)?;

    if plan.set_directory(K::ScrapersPath, input.scrapers_path, false)? {
        plan.refresh(|f| {
            f.scraper_cache = true;
            f.scraper_sources = true;
        });
    }
    if plan.set_directory(K::PluginsPath, input.plugins_path, false)? {
        plan.refresh(|f| {
            f.plugin_cache = true;
            f.plugin_sources = true;
        });
    }

    plan.set_directory(K::Metadata, input.metadata_path, true)?;
    if plan.set_directory(K::Cache, input.cache_path, true)? {
        plan.refresh(|f| f.stream_manager = true);
    }
    if plan.set_directory(K::BlobsPath, input.blobs_path, true)? {
        plan.refresh(|f| f.blob_storage = true);
    }

    if let Some(storage) = input.blobs_storage {
        let blobs_path = plan.resolved_string(K::BlobsPath);
        if plan.set_checked(K::BlobsStorage, Some(storage.as_str()), |_| {
            policy::validate_blob_storage(storage, &blobs_path)
        })? {
            plan.refresh(|f| f.blob_storage = true);
        }
    }

    if plan.set_checked(K::FfmpegPath, input.ffmpeg_path, |v| {
        validate_binary(probe, BinaryKind::Ffmpeg, as_str(v))
    })? {
        plan.refresh(|f| f.transcoder = true);
    }
    if plan.set_checked(K::FfprobePath, input.ffprobe_path, |v| {
        validate_binary(probe, BinaryKind::Ffprobe, as_str(v))
    })? {
        plan.refresh(|f| f.transcoder = true);
    }

    plan.set(K::CalculateMd5, input.calculate_md5)?;
    if let Some(algorithm) = input.video_file_naming_algorithm {
        let calculate_md5 = plan.resolved_bool(K::CalculateMd5);
        plan.set_checked(K::VideoFileNamingAlgorithm, Some(algorithm.as_str()), |_| {
            policy::validate_naming_algorithm(algorithm, calculate_md5, catalog)
        })?;
    }
    // unchanged fields skip their validators, so recheck the combined result
    policy::require_md5_calculation(
        HashAlgorithm::parse(&plan.resolved_string(K::VideoFileNamingAlgorithm)),
        plan.resolved_bool(K::CalculateMd5),
    )?;

    plan.set_checked(K::ParallelTasks, input.parallel_tasks, |v| match v {
        SettingValue::Int(n) => semantic::validate_range(K::ParallelTasks, *n, 0, 128),
        _ => Ok(()),
    })?;
    plan.set(K::PreviewAudio, input.preview_audio)?;
    plan.set_checked(K::PreviewSegments, input.preview_segments, |v| match v {
        SettingValue::Int(n) => semantic::validate_range(K::PreviewSegments, *n, 1, 100),
        _ => Ok(()),
    })?;
    plan.set_checked(K::PreviewSegmentDuration, input.preview_segment_duration, |v| {
        match v {
            SettingValue::Float(d) => semantic::validate_non_negative(K::PreviewSegmentDuration, *d),
            _ => Ok(()),
        }
    })?;
    plan.set(K::PreviewExcludeStart, input.preview_exclude_start)?;
    plan.set(K::PreviewExcludeEnd, input.preview_exclude_end)?;
    plan.set(K::PreviewPreset, input.preview_preset.map(|p| p.as_str()))?;

    plan.set(K::TranscodeHardwareAcceleration, input.transcode_hardware_acceleration)?;
    plan.set(K::MaxTranscodeSize, input.max_transcode_size.map(|r| r.as_str()))?;
    plan.set(
        K::MaxStreamingTranscodeSize,
        input.max_streaming_transcode_size.map(|r| r.as_str()),
    )?;
    plan.set(K::WriteImageThumbnails, input.write_image_thumbnails)?;
    plan.set(K::CreateImageClipsFromVideos, input.create_image_clips_from_videos)?;
    plan.set_checked(K::GalleryCoverRegex, input.gallery_cover_regex, |v| {
        patterns::validate_pattern("gallery cover regex", as_str(v))
    })?;

    plan_credentials(plan, input.username, input.password)?;
    plan.set(K::MaxSessionAge, input.max_session_age)?;

    let mut logging = plan.set(K::LogFile, input.log_file)?;
    logging |= plan.set(K::LogOut, input.log_out)?;
    logging |= plan.set(K::LogAccess, input.log_access)?;
    logging |= plan.set_checked(K::LogLevel, input.log_level, |v| {
        semantic::validate_choice(K::LogLevel, as_str(v), semantic::LOG_LEVELS)
    })?;
    if logging {
        plan.refresh(|f| f.logging = true);
    }

    plan.set_checked(K::Exclude, input.excludes, |v| {
        patterns::validate_patterns("video exclusion pattern", as_list(v))
    })?;
    plan.set_checked(K::ImageExclude, input.image_excludes, |v| {
        patterns::validate_patterns("image/gallery exclusion pattern", as_list(v))
    })?;
    plan.set(K::VideoExtensions, input.video_extensions)?;
    plan.set(K::ImageExtensions, input.image_extensions)?;
    plan.set(K::GalleryExtensions, input.gallery_extensions)?;
    plan.set(K::CreateGalleriesFromFolders, input.create_galleries_from_folders)?;

    if plan.set(K::CustomPerformerImageLocation, input.custom_performer_image_location)? {
        plan.refresh(|f| f.performer_images = true);
    }

    plan.set_checked(K::StashBoxes, input.stash_boxes, |value| match value {
        SettingValue::StashBoxes(boxes) => policy::validate_stash_boxes(boxes),
        _ => Ok(()),
    })?;
    plan.set(K::PythonPath, input.python_path)?;

    plan.set(K::TranscodeInputArgs, input.transcode_input_args)?;
    plan.set(K::TranscodeOutputArgs, input.transcode_output_args)?;
    plan.set(K::LiveTranscodeInputArgs, input.live_transcode_input_args)?;
    plan.set(K::LiveTranscodeOutputArgs, input.live_transcode_output_args)?;
    plan.set(K::DrawFunscriptHeatmapRange, input.draw_funscript_heatmap_range)?;

    if plan.set(K::ScraperPackageSources, input.scraper_package_sources)? {
        plan.refresh(|f| f.scraper_sources = true);
    }
    if plan.set(K::PluginPackageSources, input.plugin_package_sources)? {
        plan.refresh(|f| f.plugin_sources = true);
    }

    plan.refresh(|f| f.config = true);
    Ok(())
}

/// Stages username and password.
///
/// The password is compared against the stored hash, so echoing the hash back
/// leaves it untouched. A differing value is hashed before it is staged.
fn plan_credentials(
    plan: &mut Plan<'_>,
    username: Option<String>,
    password: Option<String>,
) -> Result<(), MutationError> {
    if let Some(username) = username {
        let cleared = username.is_empty();
        if plan.set(SettingKey::Username, Some(username))? {
            if cleared {
                info!("Username cleared");
            } else {
                info!("Username changed");
            }
        }
    }

    if let Some(password) = password {
        let stored = plan.store().get_string(SettingKey::Password);
        if password != stored {
            plan.ensure_mutable(SettingKey::Password)?;
            if password.is_empty() {
                info!("Password cleared");
            } else {
                info!("Password changed");
            }
            plan.record(SettingKey::Password, SettingValue::Str(hash_password(&password)));
        }
    }

    Ok(())
}
