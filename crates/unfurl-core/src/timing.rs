//! Heuristic duration estimation for screenplay text.
//!
//! The estimator turns a block of text into an approximate reading or
//! performance time. It is a pure function of the text and a
//! [`TimingConfig`]; the tunables are exposed so that a project can match its
//! own pacing.
//!
//! # Example
//!
//! ```
//! # use unfurl_core::timing::TimingConfig;
//! let timing = TimingConfig::default();
//!
//! // Two words: 2 / 3.75 = 0.53s, floored to 1.5s, then scaled for dialogue.
//! let seconds = timing.estimate("Hi there", true);
//! assert!((seconds - 1.8).abs() < 1e-9);
//! ```

use serde::Deserialize;

/// Tunables for the duration estimator.
///
/// All fields fall back to their defaults when missing from a configuration
/// file.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Reading speed in words per second.
    words_per_second: f64,

    /// Multiplier applied to dialogue after flooring.
    text_speed_factor: f64,

    /// Minimum duration of any text unit, in seconds.
    min_text_length: f64,

    /// Extra seconds added for each line break.
    line_break_seconds: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            words_per_second: 3.75,
            text_speed_factor: 1.2,
            min_text_length: 1.5,
            line_break_seconds: 0.3,
        }
    }
}

impl TimingConfig {
    /// Creates a new [`TimingConfig`] from explicit tunables.
    ///
    /// # Arguments
    ///
    /// * `words_per_second` - Reading speed.
    /// * `text_speed_factor` - Dialogue multiplier.
    /// * `min_text_length` - Duration floor in seconds.
    /// * `line_break_seconds` - Penalty per line break in seconds.
    pub fn new(
        words_per_second: f64,
        text_speed_factor: f64,
        min_text_length: f64,
        line_break_seconds: f64,
    ) -> Self {
        Self {
            words_per_second,
            text_speed_factor,
            min_text_length,
            line_break_seconds,
        }
    }

    /// Returns the reading speed in words per second.
    pub fn words_per_second(&self) -> f64 {
        self.words_per_second
    }

    /// Returns the dialogue multiplier.
    pub fn text_speed_factor(&self) -> f64 {
        self.text_speed_factor
    }

    /// Returns the duration floor in seconds.
    pub fn min_text_length(&self) -> f64 {
        self.min_text_length
    }

    /// Returns the penalty per line break in seconds.
    pub fn line_break_seconds(&self) -> f64 {
        self.line_break_seconds
    }

    /// Checks that the tunables describe a usable timing model.
    ///
    /// # Errors
    ///
    /// Returns a description of the first offending tunable. Reading speed
    /// and the dialogue factor must be positive and finite; the floor and the
    /// line-break penalty must be finite and non-negative.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.words_per_second.is_finite() && self.words_per_second > 0.0) {
            return Err(format!(
                "words_per_second must be positive, got {}",
                self.words_per_second
            ));
        }
        if !(self.text_speed_factor.is_finite() && self.text_speed_factor > 0.0) {
            return Err(format!(
                "text_speed_factor must be positive, got {}",
                self.text_speed_factor
            ));
        }
        if !(self.min_text_length.is_finite() && self.min_text_length >= 0.0) {
            return Err(format!(
                "min_text_length must not be negative, got {}",
                self.min_text_length
            ));
        }
        if !(self.line_break_seconds.is_finite() && self.line_break_seconds >= 0.0) {
            return Err(format!(
                "line_break_seconds must not be negative, got {}",
                self.line_break_seconds
            ));
        }
        Ok(())
    }

    /// Estimates how long `text` takes to read, or to perform when
    /// `is_dialogue` is set.
    ///
    /// The raw estimate is `words / words_per_second` plus
    /// `line_break_seconds` per newline, rounded to two decimals and then
    /// floored at `min_text_length`. Dialogue is scaled by
    /// `text_speed_factor` after the floor is applied, so even a one-word
    /// line lasts `min_text_length * text_speed_factor`.
    pub fn estimate(&self, text: &str, is_dialogue: bool) -> f64 {
        let words = word_count(text) as f64;
        let line_breaks = text.matches('\n').count() as f64;

        let raw = words / self.words_per_second + self.line_break_seconds * line_breaks;
        let seconds = round_to_hundredths(raw).max(self.min_text_length);

        if is_dialogue {
            seconds * self.text_speed_factor
        } else {
            seconds
        }
    }
}

/// Counts the pieces produced by splitting on runs of whitespace.
///
/// Every run of whitespace is a separator, so the count is the number of runs
/// plus one. An empty string counts as one word, and leading or trailing
/// whitespace contributes an empty piece.
fn word_count(text: &str) -> usize {
    let mut runs = 0;
    let mut in_whitespace = false;
    for ch in text.chars() {
        let is_whitespace = ch.is_whitespace();
        if is_whitespace && !in_whitespace {
            runs += 1;
        }
        in_whitespace = is_whitespace;
    }
    runs + 1
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
