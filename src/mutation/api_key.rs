//! API key regeneration.

use tracing::info;

use crate::auth::{generate_secret, issue_api_key};
use crate::config::{ConfigService, SettingKey, SettingValue};
use crate::error::{MutationError, MutationFailure};

use super::plan::Plan;

impl ConfigService {
    /// Issues a new API key bound to the configured username, or clears it.
    ///
    /// Without a username the key is cleared rather than rejected. The signing
    /// secret is generated and stored on first use.
    pub async fn generate_api_key(&self, clear: bool) -> Result<String, MutationFailure<String>> {
        self.mutate(
            "api_key",
            |plan| plan_api_key(plan, clear),
            |store| store.get_string(SettingKey::ApiKey),
        )
        .await
    }
}

fn plan_api_key(plan: &mut Plan<'_>, clear: bool) -> Result<(), MutationError> {
    let mut api_key = String::new();

    if !clear {
        let username = plan.store().get_string(SettingKey::Username);
        if username.is_empty() {
            info!("No username configured, clearing API key");
        } else {
            let mut secret = plan.store().get_string(SettingKey::JwtSecretKey);
            if secret.is_empty() {
                plan.ensure_mutable(SettingKey::JwtSecretKey)?;
                secret = generate_secret();
                plan.record(SettingKey::JwtSecretKey, SettingValue::Str(secret.clone()));
            }
            api_key = issue_api_key(&username, &secret)?;
        }
    }

    plan.set(SettingKey::ApiKey, Some(api_key))?;
    Ok(())
}
