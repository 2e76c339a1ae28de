//! Scraper behaviour settings.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigService, ConfigStore, SettingKey};
use crate::error::{MutationError, MutationFailure};
use crate::validation::patterns;

use super::plan::{as_list, Plan};

/// Partial update of the scraping settings group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapingInput {
    pub scraper_user_agent: Option<String>,
    pub scraper_cdp_path: Option<String>,
    pub scraper_cert_check: Option<bool>,
    pub exclude_tag_patterns: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapingView {
    pub scraper_user_agent: String,
    pub scraper_cdp_path: String,
    pub scraper_cert_check: bool,
    pub exclude_tag_patterns: Vec<String>,
}

impl ScrapingView {
    pub fn from_store(store: &ConfigStore) -> Self {
        Self {
            scraper_user_agent: store.get_string(SettingKey::ScraperUserAgent),
            scraper_cdp_path: store.get_string(SettingKey::ScraperCdpPath),
            scraper_cert_check: store.get_bool(SettingKey::ScraperCertCheck),
            exclude_tag_patterns: store.get_string_list(SettingKey::ScraperExcludeTagPatterns),
        }
    }
}

impl ConfigService {
    /// Applies a partial update of the scraping settings.
    pub async fn configure_scraping(
        &self,
        input: ScrapingInput,
    ) -> Result<ScrapingView, MutationFailure<ScrapingView>> {
        self.mutate(
            "scraping",
            |plan| plan_scraping(plan, input),
            ScrapingView::from_store,
        )
        .await
    }

    pub async fn scraping_view(&self) -> ScrapingView {
        ScrapingView::from_store(&*self.read().await)
    }
}

fn plan_scraping(plan: &mut Plan<'_>, input: ScrapingInput) -> Result<(), MutationError> {
    let mut scraper_cache = plan.set(SettingKey::ScraperUserAgent, input.scraper_user_agent)?;
    scraper_cache |= plan.set(SettingKey::ScraperCdpPath, input.scraper_cdp_path)?;
    if scraper_cache {
        plan.refresh(|f| f.scraper_cache = true);
    }

    plan.set_checked(
        SettingKey::ScraperExcludeTagPatterns,
        input.exclude_tag_patterns,
        |v| patterns::validate_patterns("tag exclusion pattern", as_list(v)),
    )?;
    plan.set(SettingKey::ScraperCertCheck, input.scraper_cert_check)?;

    Ok(())
}
