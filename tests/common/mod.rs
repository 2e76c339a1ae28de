#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use media_config::config::{ConfigService, ConfigStore};
use media_config::refresh::RefreshHooks;
use media_config::validation::{BinaryKind, BinaryProbe};
use tempfile::TempDir;

/// Records refreshed subsystems in call order.
#[derive(Debug, Default)]
pub struct RecordingHooks {
    calls: Mutex<Vec<&'static str>>,
}

impl RecordingHooks {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }
}

impl RefreshHooks for RecordingHooks {
    fn reload_config(&self) {
        self.push("config");
    }
    fn refresh_scraper_cache(&self) {
        self.push("scraper_cache");
    }
    fn refresh_plugin_cache(&self) {
        self.push("plugin_cache");
    }
    fn refresh_transcoder(&self) {
        self.push("transcoder");
    }
    fn refresh_stream_manager(&self) {
        self.push("stream_manager");
    }
    fn refresh_blob_storage(&self) {
        self.push("blob_storage");
    }
    fn refresh_scraper_sources(&self) {
        self.push("scraper_sources");
    }
    fn refresh_plugin_sources(&self) {
        self.push("plugin_sources");
    }
    fn refresh_dlna(&self) {
        self.push("dlna");
    }
    fn refresh_logging(&self) {
        self.push("logging");
    }
    fn refresh_performer_images(&self) {
        self.push("performer_images");
    }
}

/// Accepts every binary path without running it.
#[derive(Debug, Default)]
pub struct AcceptingProbe;

impl BinaryProbe for AcceptingProbe {
    fn probe(&self, _kind: BinaryKind, _path: &Path) -> Result<(), String> {
        Ok(())
    }
}

pub fn config_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("config.yml")
}

/// Wraps a store in a service with recording hooks and an accepting probe.
pub fn service(store: ConfigStore) -> (ConfigService, Arc<RecordingHooks>) {
    let hooks = Arc::new(RecordingHooks::default());
    let service = ConfigService::new(store, hooks.clone()).with_probe(Arc::new(AcceptingProbe));
    (service, hooks)
}
