//! Web interface display options.

use serde::{Deserialize, Serialize};

use crate::config::model::{LightboxDisplayMode, LightboxScrollMode};
use crate::config::{ConfigService, ConfigStore, SettingKey};
use crate::error::{MutationError, MutationFailure};
use crate::validation::semantic;

use super::plan::{as_str, Plan};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageLightboxInput {
    pub slideshow_delay: Option<i64>,
    pub display_mode: Option<LightboxDisplayMode>,
    pub scale_up: Option<bool>,
    pub reset_zoom_on_nav: Option<bool>,
    pub scroll_mode: Option<LightboxScrollMode>,
    pub scroll_attempts_before_change: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisableDropdownCreateInput {
    pub performer: Option<bool>,
    pub studio: Option<bool>,
    pub tag: Option<bool>,
    pub movie: Option<bool>,
}

/// Partial update of the interface settings group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InterfaceInput {
    pub menu_items: Option<Vec<String>>,
    pub sound_on_preview: Option<bool>,
    pub wall_show_title: Option<bool>,
    pub no_browser: Option<bool>,
    pub notifications_enabled: Option<bool>,
    pub show_scrubber: Option<bool>,
    pub wall_playback: Option<String>,
    pub maximum_loop_duration: Option<i64>,
    pub autostart_video: Option<bool>,
    pub show_studio_as_text: Option<bool>,
    pub autostart_video_on_play_selected: Option<bool>,
    pub continue_playlist_default: Option<bool>,
    pub language: Option<String>,
    pub image_lightbox: Option<ImageLightboxInput>,
    pub css: Option<String>,
    pub css_enabled: Option<bool>,
    pub javascript: Option<String>,
    pub javascript_enabled: Option<bool>,
    pub custom_locales: Option<String>,
    pub custom_locales_enabled: Option<bool>,
    pub disable_dropdown_create: Option<DisableDropdownCreateInput>,
    pub handy_key: Option<String>,
    pub funscript_offset: Option<i64>,
    pub use_stash_hosted_funscript: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageLightboxView {
    pub slideshow_delay: i64,
    pub display_mode: String,
    pub scale_up: bool,
    pub reset_zoom_on_nav: bool,
    pub scroll_mode: String,
    pub scroll_attempts_before_change: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisableDropdownCreateView {
    pub performer: bool,
    pub studio: bool,
    pub tag: bool,
    pub movie: bool,
}

/// Materialized interface settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceView {
    pub menu_items: Vec<String>,
    pub sound_on_preview: bool,
    pub wall_show_title: bool,
    pub no_browser: bool,
    pub notifications_enabled: bool,
    pub show_scrubber: bool,
    pub wall_playback: String,
    pub maximum_loop_duration: i64,
    pub autostart_video: bool,
    pub show_studio_as_text: bool,
    pub autostart_video_on_play_selected: bool,
    pub continue_playlist_default: bool,
    pub language: String,
    pub image_lightbox: ImageLightboxView,
    pub css: String,
    pub css_enabled: bool,
    pub javascript: String,
    pub javascript_enabled: bool,
    pub custom_locales: String,
    pub custom_locales_enabled: bool,
    pub disable_dropdown_create: DisableDropdownCreateView,
    pub handy_key: String,
    pub funscript_offset: i64,
    pub use_stash_hosted_funscript: bool,
}

impl InterfaceView {
    pub fn from_store(store: &ConfigStore) -> Self {
        use SettingKey as K;

        Self {
            menu_items: store.get_string_list(K::MenuItems),
            sound_on_preview: store.get_bool(K::SoundOnPreview),
            wall_show_title: store.get_bool(K::WallShowTitle),
            no_browser: store.get_bool(K::NoBrowser),
            notifications_enabled: store.get_bool(K::NotificationsEnabled),
            show_scrubber: store.get_bool(K::ShowScrubber),
            wall_playback: store.get_string(K::WallPlayback),
            maximum_loop_duration: store.get_int(K::MaximumLoopDuration),
            autostart_video: store.get_bool(K::AutostartVideo),
            show_studio_as_text: store.get_bool(K::ShowStudioAsText),
            autostart_video_on_play_selected: store.get_bool(K::AutostartVideoOnPlaySelected),
            continue_playlist_default: store.get_bool(K::ContinuePlaylistDefault),
            language: store.get_string(K::Language),
            image_lightbox: ImageLightboxView {
                slideshow_delay: store.get_int(K::ImageLightboxSlideshowDelay),
                display_mode: store.get_string(K::ImageLightboxDisplayMode),
                scale_up: store.get_bool(K::ImageLightboxScaleUp),
                reset_zoom_on_nav: store.get_bool(K::ImageLightboxResetZoomOnNav),
                scroll_mode: store.get_string(K::ImageLightboxScrollMode),
                scroll_attempts_before_change: store
                    .get_int(K::ImageLightboxScrollAttemptsBeforeChange),
            },
            css: store.get_string(K::Css),
            css_enabled: store.get_bool(K::CssEnabled),
            javascript: store.get_string(K::Javascript),
            javascript_enabled: store.get_bool(K::JavascriptEnabled),
            custom_locales: store.get_string(K::CustomLocales),
            custom_locales_enabled: store.get_bool(K::CustomLocalesEnabled),
            disable_dropdown_create: DisableDropdownCreateView {
                performer: store.get_bool(K::DisableDropdownCreatePerformer),
                studio: store.get_bool(K::DisableDropdownCreateStudio),
                tag: store.get_bool(K::DisableDropdownCreateTag),
                movie: store.get_bool(K::DisableDropdownCreateMovie),
            },
            handy_key: store.get_string(K::HandyKey),
            funscript_offset: store.get_int(K::FunscriptOffset),
            use_stash_hosted_funscript: store.get_bool(K::UseStashHostedFunscript),
        }
    }
}

impl ConfigService {
    /// Applies a partial update of the interface settings.
    pub async fn configure_interface(
        &self,
        input: InterfaceInput,
    ) -> Result<InterfaceView, MutationFailure<InterfaceView>> {
        self.mutate(
            "interface",
            |plan| plan_interface(plan, input),
            InterfaceView::from_store,
        )
        .await
    }

    pub async fn interface_view(&self) -> InterfaceView {
        InterfaceView::from_store(&*self.read().await)
    }
}

fn plan_interface(plan: &mut Plan<'_>, input: InterfaceInput) -> Result<(), MutationError> {
    use SettingKey as K;

    plan.set(K::MenuItems, input.menu_items)?;
    plan.set(K::SoundOnPreview, input.sound_on_preview)?;
    plan.set(K::WallShowTitle, input.wall_show_title)?;
    plan.set(K::NoBrowser, input.no_browser)?;
    plan.set(K::NotificationsEnabled, input.notifications_enabled)?;
    plan.set(K::ShowScrubber, input.show_scrubber)?;
    plan.set_checked(K::WallPlayback, input.wall_playback, |v| {
        semantic::validate_choice(K::WallPlayback, as_str(v), semantic::WALL_PLAYBACK_MODES)
    })?;
    plan.set(K::MaximumLoopDuration, input.maximum_loop_duration)?;
    plan.set(K::AutostartVideo, input.autostart_video)?;
    plan.set(K::ShowStudioAsText, input.show_studio_as_text)?;
    plan.set(K::AutostartVideoOnPlaySelected, input.autostart_video_on_play_selected)?;
    plan.set(K::ContinuePlaylistDefault, input.continue_playlist_default)?;
    plan.set(K::Language, input.language)?;

    if let Some(lightbox) = input.image_lightbox {
        plan.set(K::ImageLightboxSlideshowDelay, lightbox.slideshow_delay)?;
        plan.set(K::ImageLightboxDisplayMode, lightbox.display_mode.map(|m| m.as_str()))?;
        plan.set(K::ImageLightboxScaleUp, lightbox.scale_up)?;
        plan.set(K::ImageLightboxResetZoomOnNav, lightbox.reset_zoom_on_nav)?;
        plan.set(K::ImageLightboxScrollMode, lightbox.scroll_mode.map(|m| m.as_str()))?;
        plan.set(
            K::ImageLightboxScrollAttemptsBeforeChange,
            lightbox.scroll_attempts_before_change,
        )?;
    }

    plan.set(K::Css, input.css)?;
    plan.set(K::CssEnabled, input.css_enabled)?;
    plan.set(K::Javascript, input.javascript)?;
    plan.set(K::JavascriptEnabled, input.javascript_enabled)?;
    plan.set(K::CustomLocales, input.custom_locales)?;
    plan.set(K::CustomLocalesEnabled, input.custom_locales_enabled)?;

    if let Some(ddc) = input.disable_dropdown_create {
        plan.set(K::DisableDropdownCreatePerformer, ddc.performer)?;
        plan.set(K::DisableDropdownCreateStudio, ddc.studio)?;
        plan.set(K::DisableDropdownCreateTag, ddc.tag)?;
        plan.set(K::DisableDropdownCreateMovie, ddc.movie)?;
    }

    plan.set(K::HandyKey, input.handy_key)?;
    plan.set(K::FunscriptOffset, input.funscript_offset)?;
    plan.set(K::UseStashHostedFunscript, input.use_stash_hosted_funscript)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::test_support::service_in;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn custom_css_lands_in_side_file() {
        let dir = TempDir::new().unwrap();
        let (service, hooks) = service_in(&dir, |store| store);

        let view = service
            .configure_interface(InterfaceInput {
                css: Some(".scene-card { display: none; }".into()),
                css_enabled: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(view.css_enabled);
        assert_eq!(
            fs::read_to_string(dir.path().join("custom.css")).unwrap(),
            ".scene-card { display: none; }"
        );
        let document = fs::read_to_string(dir.path().join("config.yml")).unwrap();
        assert!(document.contains("cssenabled: true"));
        assert!(!document.contains("scene-card"));
        assert!(hooks.calls().is_empty());
    }

    #[tokio::test]
    async fn nested_options_are_flattened_into_keys() {
        let dir = TempDir::new().unwrap();
        let (service, _hooks) = service_in(&dir, |store| store);

        let view = service
            .configure_interface(InterfaceInput {
                image_lightbox: Some(ImageLightboxInput {
                    display_mode: Some(LightboxDisplayMode::Original),
                    slideshow_delay: Some(2500),
                    ..Default::default()
                }),
                disable_dropdown_create: Some(DisableDropdownCreateInput {
                    tag: Some(true),
                    ..Default::default()
                }),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(view.image_lightbox.display_mode, "ORIGINAL");
        assert_eq!(view.image_lightbox.slideshow_delay, 2500);
        assert_eq!(view.image_lightbox.scroll_mode, "ZOOM");
        assert!(view.disable_dropdown_create.tag);
        assert!(!view.disable_dropdown_create.studio);
    }

    #[tokio::test]
    async fn unknown_wall_playback_is_rejected() {
        let dir = TempDir::new().unwrap();
        let (service, _hooks) = service_in(&dir, |store| store);

        let failure = service
            .configure_interface(InterfaceInput {
                wall_playback: Some("animations".into()),
                sound_on_preview: Some(true),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(failure.error.to_string().contains("did you mean 'animation'?"));
        assert!(!failure.view.sound_on_preview);
        assert!(!dir.path().join("config.yml").exists());
    }
}
