//! Timeline markers at segment boundaries.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use unfurl_core::segment::PlacedSegment;

/// A named frame on the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    name: String,
    frame: i64,
}

impl Marker {
    /// A marker at `frame`, named `F_{frame}`.
    pub fn at_frame(frame: i64) -> Self {
        Self {
            name: format!("F_{frame}"),
            frame,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frame(&self) -> i64 {
        self.frame
    }
}

/// One marker per distinct segment start frame, in ascending frame order.
pub fn markers_from_segments<'a>(
    segments: impl IntoIterator<Item = &'a PlacedSegment>,
) -> Vec<Marker> {
    segments
        .into_iter()
        .map(PlacedSegment::start_frame)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(Marker::at_frame)
        .collect()
}
