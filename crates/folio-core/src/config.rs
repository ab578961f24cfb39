#![forbid(unsafe_code)]

//! Page behavior configuration.
//!
//! Every field has a default matching the stock portfolio page, so an empty
//! JSON object (or no configuration at all) yields the standard behavior.
//! Hosts may embed overrides as JSON, e.g. in a
//! `<script type="application/json" id="folio-config">` block.

use std::fmt;

use serde::Deserialize;

/// Errors produced while loading a [`PageConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The JSON text could not be decoded.
    Parse(String),
    /// A value decoded but is out of range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// How a card's category string is compared against the active filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryMatch {
    /// The category contains the filter value anywhere (`"web design"` matches `"design"`
    /// and also `"sign"`).
    #[default]
    Substring,
    /// The category, split on whitespace and commas, contains the filter value as a token.
    Token,
}

/// Scroll-driven thresholds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Navbar gets `scrolled` strictly above this offset.
    pub navbar_threshold: f64,
    /// Scroll-top control gets `visible` strictly above this offset.
    pub scroll_top_threshold: f64,
    /// A section becomes current this many pixels before its top reaches the viewport top.
    pub section_lead: f64,
    /// Mark the first navigation link active when no section is current yet.
    pub first_link_fallback: bool,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            navbar_threshold: 50.0,
            scroll_top_threshold: 300.0,
            section_lead: 200.0,
            first_link_fallback: false,
        }
    }
}

/// Reveal-on-scroll animation settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub selectors: String,
    /// Visible fraction needed before an element is revealed.
    pub threshold: f64,
    /// CSS margin applied to the observer root.
    pub root_margin: String,
    /// Initial downward offset of hidden elements, in pixels.
    pub offset_px: f64,
    pub transition: String,
    /// Visible fraction of `#skills` needed to fill the skill bars.
    pub skills_threshold: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selectors: ".skill-category, .project-card, .cert-card, .timeline-item".into(),
            threshold: 0.1,
            root_margin: "0px 0px -100px 0px".into(),
            offset_px: 30.0,
            transition: "opacity 0.6s ease, transform 0.6s ease".into(),
            skills_threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub match_policy: CategoryMatch,
    /// CSS `animation` value applied to every card that is shown.
    pub entrance_animation: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            match_policy: CategoryMatch::Substring,
            entrance_animation: "fadeInUp 0.5s ease".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
    pub enabled: bool,
    pub content_rate: f64,
    pub image_rate: f64,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            content_rate: 0.3,
            image_rate: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TypewriterConfig {
    pub enabled: bool,
    /// Delay between characters.
    pub interval_ms: u32,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_ms: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub enabled: bool,
    pub username: String,
    pub api_base: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            username: "oshen03".into(),
            api_base: "https://api.github.com".into(),
        }
    }
}

/// Top-level configuration for [`PageController`](crate::controller::PageController).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Local storage key holding the theme preference.
    pub theme_storage_key: String,
    pub scroll: ScrollConfig,
    pub reveal: RevealConfig,
    pub filter: FilterConfig,
    /// Pointer offset is divided by this to get degrees of tilt.
    pub tilt_divisor: f64,
    /// Loaded when the browser lacks native `loading="lazy"`.
    pub lazy_polyfill_url: String,
    pub parallax: ParallaxConfig,
    pub typewriter: TypewriterConfig,
    pub github: GithubConfig,
    /// Log the greeting banner on start.
    pub greeting: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            theme_storage_key: "theme".into(),
            scroll: ScrollConfig::default(),
            reveal: RevealConfig::default(),
            filter: FilterConfig::default(),
            tilt_divisor: 20.0,
            lazy_polyfill_url:
                "https://cdnjs.cloudflare.com/ajax/libs/lazysizes/5.3.2/lazysizes.min.js".into(),
            parallax: ParallaxConfig::default(),
            typewriter: TypewriterConfig::default(),
            github: GithubConfig::default(),
            greeting: true,
        }
    }
}

impl PageConfig {
    /// Decode and validate a JSON override document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make a feature misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.theme_storage_key.is_empty() {
            return Err(ConfigError::Invalid("theme_storage_key is empty".into()));
        }
        if !self.tilt_divisor.is_finite() || self.tilt_divisor == 0.0 {
            return Err(ConfigError::Invalid(format!(
                "tilt_divisor must be finite and non-zero, got {}",
                self.tilt_divisor
            )));
        }
        for (name, value) in [
            ("reveal.threshold", self.reveal.threshold),
            ("reveal.skills_threshold", self.reveal.skills_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within 0..=1, got {value}"
                )));
            }
        }
        for (name, value) in [
            ("scroll.navbar_threshold", self.scroll.navbar_threshold),
            ("scroll.scroll_top_threshold", self.scroll.scroll_top_threshold),
            ("scroll.section_lead", self.scroll.section_lead),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} must be finite")));
            }
        }
        if self.typewriter.enabled && self.typewriter.interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "typewriter.interval_ms must be positive".into(),
            ));
        }
        if self.github.enabled && self.github.username.trim().is_empty() {
            return Err(ConfigError::Invalid("github.username is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(PageConfig::from_json("{}").unwrap(), PageConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = PageConfig::from_json(
            r#"{ "scroll": { "first_link_fallback": true }, "filter": { "match_policy": "token" } }"#,
        )
        .unwrap();
        assert!(config.scroll.first_link_fallback);
        assert_eq!(config.scroll.navbar_threshold, 50.0);
        assert_eq!(config.filter.match_policy, CategoryMatch::Token);
        assert_eq!(config.filter.entrance_animation, "fadeInUp 0.5s ease");
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            PageConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn zero_divisor_is_invalid() {
        let err = PageConfig::from_json(r#"{ "tilt_divisor": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn out_of_range_threshold_is_invalid() {
        let err = PageConfig::from_json(r#"{ "reveal": { "threshold": 1.5 } }"#).unwrap_err();
        assert!(err.to_string().contains("reveal.threshold"));
    }

    #[test]
    fn enabled_github_needs_username() {
        let err =
            PageConfig::from_json(r#"{ "github": { "enabled": true, "username": " " } }"#)
                .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("github.username is empty".into()));
    }
}
