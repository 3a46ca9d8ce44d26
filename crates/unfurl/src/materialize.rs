//! Writing placed segments into a timeline store.
//!
//! Layout is pure; this is the only stage that mutates the store besides the
//! pinned-mode clear. Each segment is created and then given display hints
//! chosen by its [`Lane`]. The first failing store call aborts the run and
//! the segments created before it stay in the store.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use unfurl_core::segment::{Lane, PlacedSegment};

use crate::{
    config::StyleConfig,
    store::{SegmentHandle, StoreError, TimelineStore},
};

/// Vertical text alignment within the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAnchor {
    Top,
    Center,
    Bottom,
}

/// Renderer display attributes for one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayHints {
    anchor: VerticalAnchor,
    location_y: f64,
    font_size: u32,
    wrap_width: f64,
    shadow: bool,
}

impl DisplayHints {
    /// Hints for a segment on `lane`.
    ///
    /// Scene labels sit at the top of the frame, dialogue at the bottom like
    /// subtitles, and action in the middle.
    pub fn for_lane(lane: Lane, style: &StyleConfig) -> Self {
        let (anchor, location_y) = match lane {
            Lane::Scene => (VerticalAnchor::Top, 0.9),
            Lane::Dialogue => (VerticalAnchor::Bottom, 0.1),
            Lane::Action => (VerticalAnchor::Center, 0.5),
        };

        Self {
            anchor,
            location_y,
            font_size: style.font_size(),
            wrap_width: style.wrap_width(),
            shadow: style.shadow(),
        }
    }

    pub fn anchor(&self) -> VerticalAnchor {
        self.anchor
    }

    /// Vertical position as a fraction of the frame height.
    pub fn location_y(&self) -> f64 {
        self.location_y
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn wrap_width(&self) -> f64 {
        self.wrap_width
    }

    pub fn shadow(&self) -> bool {
        self.shadow
    }
}

/// Creates every segment in `segments`, in order, and applies its display
/// hints.
///
/// # Errors
///
/// Returns the first [`StoreError`] raised. No rollback is attempted.
pub fn materialize<S: TimelineStore>(
    segments: &[PlacedSegment],
    style: &StyleConfig,
    store: &mut S,
) -> Result<(), StoreError> {
    info!(segments = segments.len(); "Materializing segments");

    for segment in segments {
        let hints = DisplayHints::for_lane(segment.lane(), style);
        let mut handle = store.create_segment(
            segment.track(),
            segment.start_frame(),
            segment.end_frame(),
            segment.label(),
        )?;
        handle.apply_display(&hints)?;
    }

    debug!("Segments materialized");
    Ok(())
}
