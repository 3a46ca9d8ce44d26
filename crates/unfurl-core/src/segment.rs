//! Track-placed output units.
//!
//! A [`PlacedSegment`] is the layout engine's output: a labelled, frame-bounded
//! span on one track. Segments carry no reference back to the clip they came
//! from; once materialized, the timeline store owns the timing data.

use std::{fmt, ops::RangeInclusive};

use serde::{Deserialize, Serialize};

/// The logical lane a segment belongs to, relative to the allocated base
/// track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    /// Scene label spans, on `base`.
    Scene,
    /// Dialogue clips, on `base + 1`.
    Dialogue,
    /// Action clips, on `base + 2`.
    Action,
}

impl Lane {
    /// Number of tracks a layout occupies.
    pub const COUNT: u32 = 3;

    /// Offset of this lane from the base track.
    pub fn offset(self) -> u32 {
        match self {
            Lane::Scene => 0,
            Lane::Dialogue => 1,
            Lane::Action => 2,
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lane::Scene => write!(f, "scene"),
            Lane::Dialogue => write!(f, "dialogue"),
            Lane::Action => write!(f, "action"),
        }
    }
}

/// An inclusive range of track numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackRange {
    first: u32,
    last: u32,
}

impl TrackRange {
    /// Create a range covering `first..=last`.
    ///
    /// The bounds are swapped if given in reverse.
    pub fn new(first: u32, last: u32) -> Self {
        Self {
            first: first.min(last),
            last: first.max(last),
        }
    }

    /// The block of [`Lane::COUNT`] tracks starting at `base`, or `None` if it
    /// would overflow the track numbering.
    pub fn lanes_from(base: u32) -> Option<Self> {
        base.checked_add(Lane::COUNT - 1)
            .map(|last| Self::new(base, last))
    }

    /// First track in the range.
    pub fn first(&self) -> u32 {
        self.first
    }

    /// Last track in the range.
    pub fn last(&self) -> u32 {
        self.last
    }

    /// Returns `true` if `track` falls inside the range.
    pub fn contains(&self, track: u32) -> bool {
        self.first <= track && track <= self.last
    }
}

impl From<TrackRange> for RangeInclusive<u32> {
    fn from(range: TrackRange) -> Self {
        range.first..=range.last
    }
}

impl fmt::Display for TrackRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.last)
    }
}

/// A materialized, frame-bounded, labelled output unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedSegment {
    track: u32,
    lane: Lane,
    start_frame: i64,
    end_frame: i64,
    label: String,
}

impl PlacedSegment {
    /// Create a placed segment.
    pub fn new(
        track: u32,
        lane: Lane,
        start_frame: i64,
        end_frame: i64,
        label: impl Into<String>,
    ) -> Self {
        Self {
            track,
            lane,
            start_frame,
            end_frame,
            label: label.into(),
        }
    }

    /// Absolute track number.
    pub fn track(&self) -> u32 {
        self.track
    }

    /// The lane the segment was laid out on.
    pub fn lane(&self) -> Lane {
        self.lane
    }

    /// First frame of the segment.
    pub fn start_frame(&self) -> i64 {
        self.start_frame
    }

    /// Frame at which the segment ends.
    pub fn end_frame(&self) -> i64 {
        self.end_frame
    }

    /// Length in frames.
    pub fn len_frames(&self) -> i64 {
        self.end_frame - self.start_frame
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns `true` if `other`'s frame span lies within this one's.
    pub fn contains(&self, other: &PlacedSegment) -> bool {
        self.start_frame <= other.start_frame && other.end_frame <= self.end_frame
    }

    /// Returns `true` if the two frame spans share at least one frame.
    pub fn overlaps(&self, other: &PlacedSegment) -> bool {
        self.start_frame < other.end_frame && other.start_frame < self.end_frame
    }
}
