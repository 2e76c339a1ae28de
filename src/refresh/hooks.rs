//! Refresh hooks for a standalone gateway process.

use tracing::info;

use super::RefreshHooks;

/// Records each refresh request in the log.
///
/// Used when the gateway runs without the media service attached; the service
/// itself will pick up the committed document on its next start.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHooks;

impl TracingHooks {
    fn requested(&self, subsystem: &'static str) {
        info!(subsystem, "Refresh requested");
    }
}

impl RefreshHooks for TracingHooks {
    fn reload_config(&self) {
        self.requested("config");
    }

    fn refresh_scraper_cache(&self) {
        self.requested("scraper_cache");
    }

    fn refresh_plugin_cache(&self) {
        self.requested("plugin_cache");
    }

    fn refresh_transcoder(&self) {
        self.requested("transcoder");
    }

    fn refresh_stream_manager(&self) {
        self.requested("stream_manager");
    }

    fn refresh_blob_storage(&self) {
        self.requested("blob_storage");
    }

    fn refresh_scraper_sources(&self) {
        self.requested("scraper_sources");
    }

    fn refresh_plugin_sources(&self) {
        self.requested("plugin_sources");
    }

    fn refresh_dlna(&self) {
        self.requested("dlna");
    }

    fn refresh_logging(&self) {
        self.requested("logging");
    }

    fn refresh_performer_images(&self) {
        self.requested("performer_images");
    }
}
