//! Frame-rate handling and seconds-to-frame conversion.
//!
//! A [`FrameRate`] is the rational `fps / fps_base` used by video editors
//! (`24 / 1.0`, `30000 / 1001` expressed as `30 / 1.001`, ...). Conversions
//! always round up so that sub-frame durations never collapse to zero-length
//! segments.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Errors raised when constructing an invalid [`FrameRate`].
#[derive(Debug, Error, PartialEq)]
pub enum FrameRateError {
    #[error("frame rate numerator must be greater than zero")]
    ZeroFps,

    #[error("frame rate base must be positive and finite, got {0}")]
    InvalidBase(f64),
}

/// Frames-per-second expressed as `fps / fps_base`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "RawFrameRate")]
pub struct FrameRate {
    fps: u32,
    fps_base: f64,
}

#[derive(Deserialize)]
struct RawFrameRate {
    #[serde(default = "default_fps")]
    fps: u32,
    #[serde(default = "default_fps_base")]
    fps_base: f64,
}

fn default_fps() -> u32 {
    24
}

fn default_fps_base() -> f64 {
    1.0
}

impl TryFrom<RawFrameRate> for FrameRate {
    type Error = FrameRateError;

    fn try_from(raw: RawFrameRate) -> Result<Self, Self::Error> {
        Self::new(raw.fps, raw.fps_base)
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            fps_base: default_fps_base(),
        }
    }
}

impl FrameRate {
    /// Create a validated frame rate.
    ///
    /// # Errors
    ///
    /// Returns [`FrameRateError`] if `fps` is zero or `fps_base` is not a
    /// positive finite number.
    pub fn new(fps: u32, fps_base: f64) -> Result<Self, FrameRateError> {
        if fps == 0 {
            return Err(FrameRateError::ZeroFps);
        }
        if !(fps_base.is_finite() && fps_base > 0.0) {
            return Err(FrameRateError::InvalidBase(fps_base));
        }
        Ok(Self { fps, fps_base })
    }

    /// Returns the numerator.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Returns the denominator.
    pub fn fps_base(&self) -> f64 {
        self.fps_base
    }

    /// Frames per second as a float.
    pub fn as_f64(&self) -> f64 {
        f64::from(self.fps) / self.fps_base
    }

    /// Convert seconds to a frame number, rounding up.
    ///
    /// `ceil(fps / fps_base * seconds)`.
    pub fn seconds_to_frames(&self, seconds: f64) -> i64 {
        (self.as_f64() * seconds).ceil() as i64
    }

    /// Convert a frame number back to seconds.
    pub fn frames_to_seconds(&self, frames: i64) -> f64 {
        frames as f64 / self.as_f64()
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fps_base == 1.0 {
            write!(f, "{} fps", self.fps)
        } else {
            write!(f, "{}/{} fps", self.fps, self.fps_base)
        }
    }
}
