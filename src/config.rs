//! Runtime options for locating, rendering, exporting and driving the browser.
//!
//! Every field has a default matching the behavior of the browser extension,
//! so a partial JSON file only needs the values it wants to change.

use crate::browser::LaunchOptions;
use crate::error::{CustomizerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomizerOptions {
    /// Substring that identifies a profile page URL
    pub profile_url_pattern: String,

    pub locator: LocatorOptions,
    pub images: ImageOptions,
    pub export: ExportOptions,
    pub browser: LaunchOptions,
}

impl Default for CustomizerOptions {
    fn default() -> Self {
        Self {
            profile_url_pattern: "linkedin.com/in/".to_string(),
            locator: LocatorOptions::default(),
            images: ImageOptions::default(),
            export: ExportOptions::default(),
            browser: LaunchOptions::default(),
        }
    }
}

impl CustomizerOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CustomizerError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| CustomizerError::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Builder method: set the profile URL pattern
    pub fn profile_url_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.profile_url_pattern = pattern.into();
        self
    }

    /// Builder method: set the font used for exported text
    pub fn font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.export.font_path = Some(path.into());
        self
    }

    /// Builder method: set the locator retry policy
    pub fn retry(mut self, interval_ms: u64, max_attempts: u32) -> Self {
        self.locator.retry_interval_ms = interval_ms;
        self.locator.max_attempts = max_attempts;
        self
    }

    /// Builder method: set how the browser is launched
    pub fn browser(mut self, browser: LaunchOptions) -> Self {
        self.browser = browser;
        self
    }

    /// Whether `url` points at a profile page
    pub fn is_profile_url(&self, url: &str) -> bool {
        url.contains(&self.profile_url_pattern)
    }
}

/// Selectors, thresholds and retry policy for finding page targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorOptions {
    /// Known banner container selectors, tried in order
    pub banner_selectors: Vec<String>,

    /// Attribute selectors that hint at a banner during the heuristic scan
    pub banner_hint_selectors: Vec<String>,

    /// Known profile picture selectors, tried in order
    pub profile_picture_selectors: Vec<String>,

    /// Minimum (exclusive) width for heuristic candidates, in CSS pixels
    pub min_width: f64,

    /// Minimum (exclusive) height for heuristic candidates, in CSS pixels
    pub min_height: f64,

    /// Candidates for the last-resort scan must start above this offset
    pub top_region: f64,

    /// Delay between locate attempts
    pub retry_interval_ms: u64,

    /// Attempts before giving up
    pub max_attempts: u32,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            banner_selectors: vec![
                ".profile-background-image".to_string(),
                ".profile-topcard-background-image-edit".to_string(),
                ".profile-background-image--default".to_string(),
                ".artdeco-card.ember-view.pv-top-card".to_string(),
                ".pv-profile-section-pager".to_string(),
            ],
            banner_hint_selectors: vec![
                "[data-test-id*=\"cover\"], [data-test-id*=\"banner\"], [data-test-id*=\"background\"]".to_string(),
                "[class*=\"background\"], [class*=\"banner\"], [class*=\"cover\"], [class*=\"header-image\"]".to_string(),
            ],
            profile_picture_selectors: vec![
                ".pv-top-card-profile-picture__image".to_string(),
                ".pv-top-card__photo-wrapper img".to_string(),
                "img.profile-photo-edit__preview".to_string(),
            ],
            min_width: 500.0,
            min_height: 100.0,
            top_region: 200.0,
            retry_interval_ms: 1000,
            max_attempts: 10,
        }
    }
}

/// Limits applied to uploaded images
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    /// Avatars are scaled to fit this square before cropping
    pub avatar_max_size: u32,

    /// Banner uploads wider than this are scaled down
    pub banner_max_width: u32,

    /// JPEG quality for processed uploads (1-100)
    pub jpeg_quality: u8,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            avatar_max_size: 1024,
            banner_max_width: 1200,
            jpeg_quality: 90,
        }
    }
}

/// Banner export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub width: u32,
    pub height: u32,

    /// Multiplier from template font sizes to exported pixels
    pub text_scale: f32,

    /// TrueType font for text; text is skipped when unset
    pub font_path: Option<PathBuf>,

    /// Prefix for generated file names
    pub filename_prefix: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            width: 1584,
            height: 396,
            text_scale: 2.0,
            font_path: None,
            filename_prefix: "profile_banner".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = CustomizerOptions::default();

        assert_eq!(opts.locator.min_width, 500.0);
        assert_eq!(opts.locator.min_height, 100.0);
        assert_eq!(opts.locator.top_region, 200.0);
        assert_eq!(opts.images.avatar_max_size, 1024);
        assert_eq!(opts.export.width, 1584);
        assert_eq!(opts.export.height, 396);
        assert_eq!(opts.locator.banner_selectors[0], ".profile-background-image");
    }

    #[test]
    fn test_builder() {
        let opts = CustomizerOptions::new()
            .profile_url_pattern("example.com/u/")
            .retry(50, 3)
            .font_path("/fonts/Inter.ttf");

        assert!(opts.is_profile_url("https://example.com/u/ada"));
        assert!(!opts.is_profile_url("https://www.linkedin.com/in/ada"));
        assert_eq!(opts.locator.retry_interval_ms, 50);
        assert_eq!(opts.locator.max_attempts, 3);
        assert_eq!(opts.export.font_path, Some(PathBuf::from("/fonts/Inter.ttf")));
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{ "locator": { "min_width": 320.0 }, "export": { "text_scale": 1.5 } }"#;
        let opts: CustomizerOptions = serde_json::from_str(json).unwrap();

        assert_eq!(opts.locator.min_width, 320.0);
        assert_eq!(opts.locator.min_height, 100.0);
        assert_eq!(opts.export.text_scale, 1.5);
        assert_eq!(opts.profile_url_pattern, "linkedin.com/in/");
        assert!(opts.browser.headless);
    }

    #[test]
    fn test_load_missing_file() {
        let err = CustomizerOptions::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, CustomizerError::Config(_)));
    }
}
