use log::Level;
use serde::Deserialize;
use web_sys::Document;

use crate::error::BehaviorError;

/// Id of the optional `<script type="application/json">` block that overrides defaults.
pub const CONFIG_ELEMENT_ID: &str = "page-config";

#[cfg(debug_assertions)]
pub fn default_log_level() -> Level {
    Level::Debug // Verbose while developing locally
}

#[cfg(not(debug_assertions))]
pub fn default_log_level() -> Level {
    Level::Info
}

/// Selectors, thresholds and timings for every page behavior.
///
/// All fields have defaults matching the shipped markup, so a page only needs
/// to list what it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub log_level: Option<String>,

    pub splash_id: String,
    pub splash_delay_ms: u32,

    pub header_id: String,
    pub nav_toggle_id: String,
    pub nav_menu_id: String,
    pub nav_link_selector: String,
    pub header_scroll_threshold: f64,

    pub hero_visual_selector: String,
    pub parallax_rate: f64,
    pub scroll_indicator_selector: String,
    pub scroll_indicator_base: f64,

    pub reveal_selector: String,
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,
    pub reveal_grid_selector: String,
    pub reveal_stagger_ms: u32,

    pub hero_cta_selector: String,
    pub hero_scroll_selector: String,
    pub hero_scroll_target: String,

    pub video_selector: String,
    pub video_threshold: f64,

    pub lazy_image_selector: String,
    pub lazy_image_threshold: f64,

    pub card_selector: String,
    pub underline_selector: String,
    pub button_selector: String,
    pub ripple_duration_ms: u32,

    pub focusable_selector: String,
    pub focus_outline: String,
    pub section_selector: String,
    pub section_threshold: f64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            log_level: None,

            splash_id: "splash-screen".to_string(),
            splash_delay_ms: 4500,

            header_id: "header".to_string(),
            nav_toggle_id: "nav-toggle".to_string(),
            nav_menu_id: "nav-menu".to_string(),
            nav_link_selector: ".nav-link".to_string(),
            header_scroll_threshold: 100.0,

            hero_visual_selector: ".hero-video".to_string(),
            parallax_rate: -0.5,
            scroll_indicator_selector: ".scroll-indicator".to_string(),
            scroll_indicator_base: 30.0,

            reveal_selector: "[data-reveal]".to_string(),
            reveal_threshold: 0.1,
            reveal_root_margin: "0px 0px -50px 0px".to_string(),
            reveal_grid_selector: ".artists-grid".to_string(),
            reveal_stagger_ms: 150,

            hero_cta_selector: ".hero-cta a[href^=\"#\"]".to_string(),
            hero_scroll_selector: ".hero-scroll".to_string(),
            hero_scroll_target: "#artistas".to_string(),

            video_selector: ".hero-video video".to_string(),
            video_threshold: 0.1,

            lazy_image_selector: "img[data-src]".to_string(),
            lazy_image_threshold: 0.0,

            card_selector: ".artist-card".to_string(),
            underline_selector: ".artist-underline".to_string(),
            button_selector: ".btn".to_string(),
            ripple_duration_ms: 600,

            focusable_selector: "a, button, input, [tabindex]:not([tabindex=\"-1\"])".to_string(),
            focus_outline: "2px solid var(--gold-primary)".to_string(),
            section_selector: "section[id]".to_string(),
            section_threshold: 0.5,
        }
    }
}

impl PageConfig {
    pub fn from_json(raw: &str) -> Result<Self, BehaviorError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads the override block from the document, falling back to defaults
    /// when it is absent or malformed.
    pub fn load(document: &Document) -> Self {
        let Some(raw) = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content())
        else {
            return Self::default();
        };

        match Self::from_json(&raw) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring page config: {}", e);
                Self::default()
            }
        }
    }

    pub fn level(&self) -> Level {
        self.log_level
            .as_deref()
            .and_then(|level| level.parse().ok())
            .unwrap_or_else(default_log_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_override_keeps_defaults() {
        let config = PageConfig::from_json("{}").unwrap();
        assert_eq!(config, PageConfig::default());
    }

    #[test]
    fn partial_override_only_touches_named_fields() {
        let config =
            PageConfig::from_json(r#"{"splash_delay_ms": 1000, "reveal_stagger_ms": 80}"#).unwrap();
        assert_eq!(config.splash_delay_ms, 1000);
        assert_eq!(config.reveal_stagger_ms, 80);
        assert_eq!(config.header_scroll_threshold, 100.0);
        assert_eq!(config.reveal_root_margin, "0px 0px -50px 0px");
    }

    #[test]
    fn every_observer_threshold_is_configurable() {
        let defaults = PageConfig::default();
        assert_eq!(defaults.reveal_threshold, 0.1);
        assert_eq!(defaults.video_threshold, 0.1);
        assert_eq!(defaults.lazy_image_threshold, 0.0);
        assert_eq!(defaults.section_threshold, 0.5);

        let config = PageConfig::from_json(r#"{"lazy_image_threshold": 0.25}"#).unwrap();
        assert_eq!(config.lazy_image_threshold, 0.25);
    }

    #[test]
    fn malformed_override_is_a_config_error() {
        let err = PageConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, BehaviorError::Config(_)));
    }

    #[test]
    fn log_level_parses_or_falls_back() {
        let mut config = PageConfig::default();
        config.log_level = Some("warn".to_string());
        assert_eq!(config.level(), Level::Warn);

        config.log_level = Some("loud".to_string());
        assert_eq!(config.level(), default_log_level());
    }
}
