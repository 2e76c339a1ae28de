//! Configuration document, override resolution, and the shared service handle.

pub mod defaults;
pub mod keys;
pub mod loader;
pub mod model;
pub mod store;

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard};

use crate::refresh::{RefreshDispatcher, RefreshHooks};
use crate::validation::{BinaryProbe, EmptyCatalog, MediaCatalog, ProcessProbe};
pub use keys::SettingKey;
pub use model::SettingValue;
pub use store::ConfigStore;

/// Owns the configuration store and the collaborators mutations depend on.
///
/// Constructed once by the host and shared by reference. Every mutation holds
/// the store's write lock from validation through commit, so concurrent calls
/// are serialized.
pub struct ConfigService {
    pub(crate) store: Arc<RwLock<ConfigStore>>,
    pub(crate) dispatcher: RefreshDispatcher,
    pub(crate) probe: Arc<dyn BinaryProbe>,
    pub(crate) catalog: Arc<dyn MediaCatalog>,
}

impl ConfigService {
    /// Creates a service probing binaries as processes and with an empty catalog.
    pub fn new(store: ConfigStore, hooks: Arc<dyn RefreshHooks>) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            dispatcher: RefreshDispatcher::new(hooks),
            probe: Arc::new(ProcessProbe),
            catalog: Arc::new(EmptyCatalog),
        }
    }

    /// Replaces the binary probe used for transcoder path changes.
    pub fn with_probe(mut self, probe: Arc<dyn BinaryProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Replaces the catalog consulted on naming-algorithm changes.
    pub fn with_catalog(mut self, catalog: Arc<dyn MediaCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Acquires shared read access to the store.
    pub async fn read(&self) -> RwLockReadGuard<'_, ConfigStore> {
        self.store.read().await
    }
}
