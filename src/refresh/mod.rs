//! Post-commit invalidation of subsystems that cache configuration.

pub mod hooks;

use std::sync::Arc;

use tracing::debug;

pub use hooks::TracingHooks;

/// Refresh entry points of the subsystems that read configuration.
///
/// Hooks are side-effect only. Failures are the subsystem's concern and never
/// unwind a committed change. A hook must not start another settings mutation.
#[cfg_attr(test, mockall::automock)]
pub trait RefreshHooks: Send + Sync {
    /// Re-reads derived configuration state after any general change.
    fn reload_config(&self);
    fn refresh_scraper_cache(&self);
    fn refresh_plugin_cache(&self);
    /// Re-resolves the transcoder and probe binaries.
    fn refresh_transcoder(&self);
    fn refresh_stream_manager(&self);
    fn refresh_blob_storage(&self);
    fn refresh_scraper_sources(&self);
    fn refresh_plugin_sources(&self);
    fn refresh_dlna(&self);
    /// Applies log level, file and output settings.
    fn refresh_logging(&self);
    fn refresh_performer_images(&self);
}

/// Subsystems that must reload after the current mutation commits.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RefreshFlags {
    pub config: bool,
    pub scraper_cache: bool,
    pub plugin_cache: bool,
    pub transcoder: bool,
    pub stream_manager: bool,
    pub blob_storage: bool,
    pub scraper_sources: bool,
    pub plugin_sources: bool,
    pub dlna: bool,
    pub logging: bool,
    pub performer_images: bool,
}

impl RefreshFlags {
    /// Returns true if any subsystem needs a refresh.
    pub fn any(&self) -> bool {
        *self != Self::default()
    }
}

/// Invokes flagged refresh hooks in dependency order.
#[derive(Clone)]
pub struct RefreshDispatcher {
    hooks: Arc<dyn RefreshHooks>,
}

impl RefreshDispatcher {
    pub fn new(hooks: Arc<dyn RefreshHooks>) -> Self {
        Self { hooks }
    }

    /// Fires every flagged hook.
    ///
    /// The stream manager resolves transcoder binaries, so a transcoder refresh
    /// always runs first and always triggers a stream manager refresh.
    pub fn dispatch(&self, flags: &RefreshFlags) {
        let hooks = self.hooks.as_ref();
        debug!(?flags, "Dispatching configuration refresh");

        if flags.config {
            hooks.reload_config();
        }
        if flags.scraper_cache {
            hooks.refresh_scraper_cache();
        }
        if flags.plugin_cache {
            hooks.refresh_plugin_cache();
        }
        if flags.transcoder {
            hooks.refresh_transcoder();
        }
        if flags.transcoder || flags.stream_manager {
            hooks.refresh_stream_manager();
        }
        if flags.blob_storage {
            hooks.refresh_blob_storage();
        }
        if flags.scraper_sources {
            hooks.refresh_scraper_sources();
        }
        if flags.plugin_sources {
            hooks.refresh_plugin_sources();
        }
        if flags.dlna {
            hooks.refresh_dlna();
        }
        if flags.logging {
            hooks.refresh_logging();
        }
        if flags.performer_images {
            hooks.refresh_performer_images();
        }
    }
}

impl std::fmt::Debug for RefreshDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshDispatcher").finish_non_exhaustive()
    }
}
