//! DLNA server options.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigService, ConfigStore, SettingKey, SettingValue};
use crate::error::{MutationError, MutationFailure};
use crate::validation::semantic;

use super::plan::{as_str, Plan};

/// Partial update of the DLNA settings group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DlnaInput {
    pub server_name: Option<String>,
    pub enabled: Option<bool>,
    pub port: Option<i64>,
    pub whitelisted_ips: Option<Vec<String>>,
    pub interfaces: Option<Vec<String>>,
    pub video_sort_order: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DlnaView {
    pub server_name: String,
    pub enabled: bool,
    pub port: i64,
    pub whitelisted_ips: Vec<String>,
    pub interfaces: Vec<String>,
    pub video_sort_order: String,
}

impl DlnaView {
    pub fn from_store(store: &ConfigStore) -> Self {
        Self {
            server_name: store.get_string(SettingKey::DlnaServerName),
            enabled: store.get_bool(SettingKey::DlnaDefaultEnabled),
            port: store.get_int(SettingKey::DlnaPort),
            whitelisted_ips: store.get_string_list(SettingKey::DlnaDefaultIpWhitelist),
            interfaces: store.get_string_list(SettingKey::DlnaInterfaces),
            video_sort_order: store.get_string(SettingKey::DlnaVideoSortOrder),
        }
    }
}

impl ConfigService {
    /// Applies a partial update of the DLNA settings.
    ///
    /// The DLNA server is refreshed whenever the enabled flag is present, even
    /// if it matches the stored value; other options take effect on its next
    /// start.
    pub async fn configure_dlna(
        &self,
        input: DlnaInput,
    ) -> Result<DlnaView, MutationFailure<DlnaView>> {
        self.mutate("dlna", |plan| plan_dlna(plan, input), DlnaView::from_store)
            .await
    }

    pub async fn dlna_view(&self) -> DlnaView {
        DlnaView::from_store(&*self.read().await)
    }
}

fn plan_dlna(plan: &mut Plan<'_>, input: DlnaInput) -> Result<(), MutationError> {
    plan.set(SettingKey::DlnaServerName, input.server_name)?;
    plan.set(SettingKey::DlnaDefaultIpWhitelist, input.whitelisted_ips)?;
    plan.set_checked(SettingKey::DlnaVideoSortOrder, input.video_sort_order, |v| {
        semantic::validate_choice(
            SettingKey::DlnaVideoSortOrder,
            as_str(v),
            semantic::DLNA_SORT_ORDERS,
        )
    })?;
    plan.set_checked(SettingKey::DlnaPort, input.port, |v| match v {
        SettingValue::Int(port) => semantic::validate_range(SettingKey::DlnaPort, *port, 1, 65535),
        _ => Ok(()),
    })?;

    // a present flag re-syncs the server even when unchanged
    if input.enabled.is_some() {
        plan.refresh(|f| f.dlna = true);
    }
    plan.set(SettingKey::DlnaDefaultEnabled, input.enabled)?;
    plan.set(SettingKey::DlnaInterfaces, input.interfaces)?;

    Ok(())
}
