//! The timeline store seam.
//!
//! The compiler never owns rendered output. It asks a [`TimelineStore`] which
//! tracks are occupied, clears a track range when regenerating in place, and
//! creates one segment per [`PlacedSegment`](unfurl_core::segment::PlacedSegment).
//! Display attributes are applied to the returned handle as a separate step.
//!
//! [`MemoryStore`] is an in-process implementation that can be serialized,
//! which the command-line front end uses as its timeline file.

use std::collections::BTreeSet;

use log::trace;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use unfurl_core::segment::TrackRange;

use crate::{markers::Marker, materialize::DisplayHints};

/// Failures reported by a timeline store.
///
/// Store errors are propagated as-is and never retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("{operation} was rejected: {reason}")]
    Rejected {
        operation: &'static str,
        reason: String,
    },

    #[error("backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create a `Rejected` error for `operation`.
    pub fn rejected(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Rejected {
            operation,
            reason: reason.into(),
        }
    }
}

/// A segment freshly created in a store, ready for display attributes.
pub trait SegmentHandle {
    /// Applies renderer display attributes to the segment.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store refuses the change.
    fn apply_display(&mut self, hints: &DisplayHints) -> Result<(), StoreError>;
}

/// External storage for laid-out segments.
///
/// The compiler assumes exclusive, synchronous access to the store for the
/// duration of one run.
pub trait TimelineStore {
    /// Handle returned by [`create_segment`](Self::create_segment).
    type Handle<'a>: SegmentHandle
    where
        Self: 'a;

    /// Every track number that currently holds at least one item.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    fn list_track_numbers(&self) -> Result<BTreeSet<u32>, StoreError>;

    /// Removes every item on a track inside `range`, returning how many were
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store refuses the removal.
    fn remove_items(&mut self, range: TrackRange) -> Result<usize, StoreError>;

    /// Creates a labelled segment spanning `[start_frame, end_frame]` on
    /// `track`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store refuses the creation.
    fn create_segment(
        &mut self,
        track: u32,
        start_frame: i64,
        end_frame: i64,
        label: &str,
    ) -> Result<Self::Handle<'_>, StoreError>;
}

/// A segment as held by a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoredSegment {
    name: String,
    track: u32,
    start_frame: i64,
    end_frame: i64,
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display: Option<DisplayHints>,
}

impl StoredSegment {
    /// Item name: the label with `.` replaced by `_`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn track(&self) -> u32 {
        self.track
    }

    pub fn start_frame(&self) -> i64 {
        self.start_frame
    }

    pub fn end_frame(&self) -> i64 {
        self.end_frame
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Display attributes, once applied.
    pub fn display(&self) -> Option<&DisplayHints> {
        self.display.as_ref()
    }
}

/// Derives a store item name from a label.
fn item_name(label: &str) -> String {
    label.replace('.', "_")
}

/// An in-process timeline store.
///
/// Segments are kept in creation order. Markers are held alongside but are
/// never touched by layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryStore {
    #[serde(default)]
    segments: Vec<StoredSegment>,

    #[serde(default)]
    markers: Vec<Marker>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Segments in creation order.
    pub fn segments(&self) -> &[StoredSegment] {
        &self.segments
    }

    /// Segments on `track`, in creation order.
    pub fn segments_on(&self, track: u32) -> impl Iterator<Item = &StoredSegment> {
        self.segments.iter().filter(move |s| s.track == track)
    }

    /// Timeline markers, ordered by frame.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Adds markers, skipping frames that already carry one.
    pub fn add_markers(&mut self, markers: impl IntoIterator<Item = Marker>) {
        for marker in markers {
            if !self.markers.iter().any(|m| m.frame() == marker.frame()) {
                self.markers.push(marker);
            }
        }
        self.markers.sort_by_key(Marker::frame);
    }

    /// Removes every marker, returning how many there were.
    pub fn clear_markers(&mut self) -> usize {
        let count = self.markers.len();
        self.markers.clear();
        count
    }
}

/// Handle to a segment inside a [`MemoryStore`].
#[derive(Debug)]
pub struct MemoryHandle<'a> {
    segment: &'a mut StoredSegment,
}

impl SegmentHandle for MemoryHandle<'_> {
    fn apply_display(&mut self, hints: &DisplayHints) -> Result<(), StoreError> {
        self.segment.display = Some(hints.clone());
        Ok(())
    }
}

impl TimelineStore for MemoryStore {
    type Handle<'a> = MemoryHandle<'a>;

    fn list_track_numbers(&self) -> Result<BTreeSet<u32>, StoreError> {
        Ok(self.segments.iter().map(StoredSegment::track).collect())
    }

    fn remove_items(&mut self, range: TrackRange) -> Result<usize, StoreError> {
        let before = self.segments.len();
        self.segments.retain(|s| !range.contains(s.track));
        Ok(before - self.segments.len())
    }

    fn create_segment(
        &mut self,
        track: u32,
        start_frame: i64,
        end_frame: i64,
        label: &str,
    ) -> Result<Self::Handle<'_>, StoreError> {
        if end_frame < start_frame {
            return Err(StoreError::rejected(
                "create_segment",
                format!("end frame {end_frame} precedes start frame {start_frame}"),
            ));
        }

        trace!(track, start_frame, end_frame; "Creating segment");
        self.segments.push(StoredSegment {
            name: item_name(label),
            track,
            start_frame,
            end_frame,
            label: label.to_string(),
            display: None,
        });

        let segment = self
            .segments
            .last_mut()
            .ok_or_else(|| StoreError::Backend("segment vanished after insert".to_string()))?;
        Ok(MemoryHandle { segment })
    }
}
