//! Configuration types for unfurl timeline compilation.
//!
//! This module provides the configuration structures that control duration
//! estimation, layout, frame conversion, and display styling. All types
//! implement [`serde::Deserialize`] so they can be loaded from TOML; every
//! section and field falls back to its default when missing.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`TimingConfig`] - Duration estimator tunables.
//! - [`LayoutConfig`] - Scene padding and the requested base track.
//! - [`FrameRate`] - Frame rate used for seconds-to-frame conversion.
//! - [`StyleConfig`] - Display hints applied to materialized segments.
//!
//! # Example
//!
//! ```
//! # use unfurl::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().requested_base_track(), 0);
//! assert_eq!(config.render().fps(), 24);
//! assert!(config.validate().is_ok());
//! ```

use serde::Deserialize;

pub use unfurl_core::{frame::FrameRate, timing::TimingConfig};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Duration estimator section.
    #[serde(default)]
    timing: TimingConfig,

    /// Layout section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Frame rate section.
    #[serde(default)]
    render: FrameRate,

    /// Display style section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    ///
    /// # Arguments
    ///
    /// * `timing` - Duration estimator tunables.
    /// * `layout` - Scene padding and base track settings.
    /// * `render` - Frame rate for seconds-to-frame conversion.
    /// * `style` - Display hints for materialized segments.
    pub fn new(
        timing: TimingConfig,
        layout: LayoutConfig,
        render: FrameRate,
        style: StyleConfig,
    ) -> Self {
        Self {
            timing,
            layout,
            render,
            style,
        }
    }

    /// Returns the duration estimator tunables.
    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the frame rate.
    pub fn render(&self) -> &FrameRate {
        &self.render
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Overrides the requested base track.
    pub fn set_requested_base_track(&mut self, track: u32) {
        self.layout.requested_base_track = track;
    }

    /// Overrides the frame rate.
    pub fn set_frame_rate(&mut self, rate: FrameRate) {
        self.render = rate;
    }

    /// Checks every section for values the compiler cannot work with.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value found.
    pub fn validate(&self) -> Result<(), String> {
        self.timing.validate()?;
        self.layout.validate()?;
        self.style.validate()
    }
}

/// Layout settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Seconds of padding before the first and after the last clip of every
    /// scene.
    scene_padding_seconds: f64,

    /// `0` appends above existing output; anything else pins output to the
    /// three tracks starting there, replacing what they hold.
    requested_base_track: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scene_padding_seconds: 1.0,
            requested_base_track: 0,
        }
    }
}

impl LayoutConfig {
    /// Creates a new [`LayoutConfig`].
    ///
    /// # Arguments
    ///
    /// * `scene_padding_seconds` - Padding on each end of a scene.
    /// * `requested_base_track` - Pinned base track, or `0` for auto.
    pub fn new(scene_padding_seconds: f64, requested_base_track: u32) -> Self {
        Self {
            scene_padding_seconds,
            requested_base_track,
        }
    }

    /// Returns the padding on each end of a scene, in seconds.
    pub fn scene_padding_seconds(&self) -> f64 {
        self.scene_padding_seconds
    }

    /// Returns the requested base track.
    pub fn requested_base_track(&self) -> u32 {
        self.requested_base_track
    }

    fn validate(&self) -> Result<(), String> {
        if !(self.scene_padding_seconds.is_finite() && self.scene_padding_seconds > 0.0) {
            return Err(format!(
                "scene_padding_seconds must be positive, got {}",
                self.scene_padding_seconds
            ));
        }
        Ok(())
    }
}

/// Display styling for materialized segments.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Vertical resolution of the output; the font size derives from it.
    resolution_y: u32,

    /// Wrap width as a fraction of the frame width.
    wrap_width: f64,

    /// Whether labels are drawn with a drop shadow.
    shadow: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            resolution_y: 1080,
            wrap_width: 0.85,
            shadow: true,
        }
    }
}

impl StyleConfig {
    /// Creates a new [`StyleConfig`].
    pub fn new(resolution_y: u32, wrap_width: f64, shadow: bool) -> Self {
        Self {
            resolution_y,
            wrap_width,
            shadow,
        }
    }

    /// Returns the vertical resolution.
    pub fn resolution_y(&self) -> u32 {
        self.resolution_y
    }

    /// Returns the font size, one eighteenth of the vertical resolution.
    pub fn font_size(&self) -> u32 {
        self.resolution_y / 18
    }

    /// Returns the wrap width.
    pub fn wrap_width(&self) -> f64 {
        self.wrap_width
    }

    /// Returns whether labels are shadowed.
    pub fn shadow(&self) -> bool {
        self.shadow
    }

    fn validate(&self) -> Result<(), String> {
        if !(self.wrap_width > 0.0 && self.wrap_width <= 1.0) {
            return Err(format!(
                "wrap_width must be within (0, 1], got {}",
                self.wrap_width
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_approx_eq!(f64, config.timing().words_per_second(), 3.75);
        assert_approx_eq!(f64, config.layout().scene_padding_seconds(), 1.0);
        assert_eq!(config.layout().requested_base_track(), 0);
        assert_eq!(config.render().fps(), 24);
        assert_eq!(config.style().font_size(), 60);
        assert!(config.style().shadow());
    }

    #[test]
    fn test_overrides() {
        let mut config = AppConfig::default();
        config.set_requested_base_track(3);
        config.set_frame_rate(FrameRate::new(30, 1.001).unwrap());

        assert_eq!(config.layout().requested_base_track(), 3);
        assert_eq!(config.render().fps(), 30);
    }

    #[test]
    fn test_validate_rejects_bad_padding() {
        let config = AppConfig::new(
            TimingConfig::default(),
            LayoutConfig::new(0.0, 0),
            FrameRate::default(),
            StyleConfig::default(),
        );

        let err = config.validate().unwrap_err();
        assert!(err.contains("scene_padding_seconds"));
    }

    #[test]
    fn test_validate_rejects_bad_timing() {
        let config = AppConfig::new(
            TimingConfig::new(0.0, 1.2, 1.5, 0.3),
            LayoutConfig::default(),
            FrameRate::default(),
            StyleConfig::default(),
        );

        assert!(config.validate().unwrap_err().contains("words_per_second"));
    }

    #[test]
    fn test_validate_rejects_bad_wrap_width() {
        let config = AppConfig::new(
            TimingConfig::default(),
            LayoutConfig::default(),
            FrameRate::default(),
            StyleConfig::new(1080, 1.5, true),
        );

        assert!(config.validate().unwrap_err().contains("wrap_width"));
    }
}
