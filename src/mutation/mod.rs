//! Mutation handlers, one per settings group.
//!
//! Every handler follows the same pipeline: plan the changes against the
//! current store, apply them only if the whole record validated, commit the
//! document, then fire the refresh hooks the plan flagged.

pub mod api_key;
pub mod changeset;
pub mod defaults;
pub mod dlna;
pub mod general;
pub mod interface;
pub mod plan;
pub mod plugin;
pub mod scraping;
pub mod ui;

use std::fmt::Debug;

use tracing::{info, warn};

use crate::config::{ConfigService, ConfigStore};
use crate::error::{MutationError, MutationFailure};
use crate::validation::paths;

pub use changeset::ChangeSet;
pub use defaults::{DefaultsInput, DefaultsView};
pub use dlna::{DlnaInput, DlnaView};
pub use general::{GeneralInput, GeneralView};
pub use interface::{
    DisableDropdownCreateInput, ImageLightboxInput, InterfaceInput, InterfaceView,
};
pub use plan::Plan;
pub use scraping::{ScrapingInput, ScrapingView};
pub use ui::merge_maps;

impl ConfigService {
    /// Runs one mutation through plan, apply, commit and refresh.
    ///
    /// `plan_fn` stages and validates the changes; `view_fn` materializes the
    /// group's view, which is returned on success and attached to any failure.
    /// Directories named by the plan are created only once the whole record
    /// has validated.
    pub(crate) async fn mutate<V, P, F>(
        &self,
        group: &'static str,
        plan_fn: P,
        view_fn: F,
    ) -> Result<V, MutationFailure<V>>
    where
        V: Debug,
        P: FnOnce(&mut Plan<'_>) -> Result<(), MutationError>,
        F: Fn(&ConfigStore) -> V,
    {
        let (view, flags) = {
            let mut store = self.store.write().await;

            let mut plan = Plan::new(&store);
            if let Err(error) = plan_fn(&mut plan) {
                warn!(group, error = %error, "Configuration update rejected");
                return Err(MutationFailure::new(view_fn(&store), error));
            }
            let (changes, flags, directories) = plan.into_parts();

            for dir in &directories {
                if let Err(error) = paths::ensure_directory(dir) {
                    warn!(group, error = %error, "Configuration update rejected");
                    return Err(MutationFailure::new(view_fn(&store), error.into()));
                }
            }

            for (key, value) in changes.iter() {
                if let Err(e) = store.set(key, value) {
                    return Err(MutationFailure::new(
                        view_fn(&store),
                        MutationError::Persistence(e),
                    ));
                }
            }

            if let Err(source) = store.commit() {
                let error = if store.allow_read_only() {
                    warn!(
                        group,
                        error = %source,
                        changes = changes.len(),
                        "Configuration file is read-only, returning attempted changes"
                    );
                    MutationError::PersistenceTolerated { changes, source }
                } else {
                    warn!(group, error = %source, "Failed to commit configuration");
                    MutationError::Persistence(source)
                };
                return Err(MutationFailure::new(view_fn(&store), error));
            }

            info!(
                group,
                keys = ?changes.keys().collect::<Vec<_>>(),
                "Configuration updated"
            );
            (view_fn(&store), flags)
        };

        if flags.any() {
            self.dispatcher.dispatch(&flags);
        }
        Ok(view)
    }
}
