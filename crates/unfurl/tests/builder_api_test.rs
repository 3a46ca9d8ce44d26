//! Integration tests for the TimelineBuilder API
//!
//! These tests drive the whole pipeline against in-memory stores.

use std::collections::BTreeSet;

use float_cmp::assert_approx_eq;
use proptest::prelude::*;

use unfurl::{
    TimelineBuilder, UnfurlError,
    config::{AppConfig, FrameRate, LayoutConfig, StyleConfig, TimingConfig},
    materialize::{DisplayHints, VerticalAnchor},
    script::Clip,
    segment::{Lane, TrackRange},
    store::{MemoryStore, SegmentHandle, StoreError, StoredSegment, TimelineStore},
};

const SCRIPT: &str = "\
Title: Integration

INT. ROOM - DAY

# Act One

## Arrival

Bob enters.

BOB
(quietly)
Hi there.

ALICE
Hello, Bob.

EXT. STREET - NIGHT

Rain falls.
";

fn pinned(base: u32) -> TimelineBuilder {
    TimelineBuilder::new(AppConfig::new(
        TimingConfig::default(),
        LayoutConfig::new(1.0, base),
        FrameRate::default(),
        StyleConfig::default(),
    ))
}

#[test]
fn test_builder_api_exists() {
    let _builder = TimelineBuilder::default();
}

#[test]
fn test_minimal_scene_end_to_end() {
    let builder = TimelineBuilder::default();
    let elements = builder
        .parse("INT. ROOM - DAY\n\nBOB\nHi there\n")
        .expect("Failed to parse");

    let scenes = builder.timeline(&elements).expect("Failed to reduce");
    assert_eq!(scenes.len(), 1);
    assert_approx_eq!(f64, scenes[0].clips()[0].seconds(), 1.8);

    let segments = builder.layout(&scenes, 1).expect("Failed to lay out");
    let scene = segments.last().expect("scene segment");
    // [0, 3.8] seconds at 24 fps.
    assert_eq!((scene.start_frame(), scene.end_frame()), (0, 92));
}

#[test]
fn test_unfurl_full_script() {
    let builder = TimelineBuilder::default();
    let mut store = MemoryStore::new();

    let report = builder.unfurl(SCRIPT, &mut store).expect("Failed to unfurl");

    assert_eq!(report.base_track(), 1);
    assert_eq!(report.tracks(), Some(TrackRange::new(1, 3)));

    let scene_labels: Vec<_> = store.segments_on(1).map(StoredSegment::label).collect();
    assert_eq!(scene_labels, ["INT. ROOM - DAY", "EXT. STREET - NIGHT"]);

    let dialogue: Vec<_> = store.segments_on(2).map(StoredSegment::label).collect();
    assert_eq!(dialogue, ["BOB (quietly): Hi there.", "ALICE: Hello, Bob."]);

    let action: Vec<_> = store.segments_on(3).map(StoredSegment::label).collect();
    assert_eq!(action, ["Bob enters.", "Rain falls."]);

    let first = store.segments_on(1).next().expect("scene segment");
    assert_eq!(first.name(), "INT_ ROOM - DAY");
    let hints = first.display().expect("hints applied");
    assert_eq!(hints.anchor(), VerticalAnchor::Top);
}

#[test]
fn test_outline() {
    let builder = TimelineBuilder::default();
    let elements = builder.parse(SCRIPT).expect("Failed to parse");

    let outline = builder.outline(&elements).expect("Failed to outline");

    assert_eq!(outline.len(), 2);
    let beats = outline[0].beats();
    assert_eq!(beats.len(), 1);
    assert_eq!(beats[0].name(), "Arrival");
    assert!(beats[0].lines().contains(&"Hello, Bob.".to_string()));
    assert!(outline[1].beats()[0].is_preamble());
}

#[test]
fn test_empty_input() {
    let builder = TimelineBuilder::default();
    let mut store = MemoryStore::new();

    let err = builder.unfurl("  \n\t\n", &mut store).unwrap_err();

    assert!(matches!(err, UnfurlError::EmptyInput));
    assert!(store.segments().is_empty());
}

#[test]
fn test_no_scenes_leaves_store_untouched() {
    let mut store = MemoryStore::new();
    store.create_segment(1, 0, 24, "keep me").unwrap();
    let before = store.clone();

    let err = pinned(1)
        .unfurl("Just some action.\n\nNo headings here.\n", &mut store)
        .unwrap_err();

    assert!(matches!(err, UnfurlError::NoScenes));
    assert_eq!(store, before);
}

#[test]
fn test_parse_error_keeps_source() {
    let source = "INT. ROOM\n\n/* never closed";
    let err = TimelineBuilder::default().parse(source).unwrap_err();

    match err {
        UnfurlError::Parse { err, src } => {
            assert_eq!(src, source);
            assert_eq!(err.diagnostics().len(), 1);
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_invalid_config() {
    let builder = TimelineBuilder::new(AppConfig::new(
        TimingConfig::new(-1.0, 1.2, 1.5, 0.3),
        LayoutConfig::default(),
        FrameRate::default(),
        StyleConfig::default(),
    ));

    let err = builder.unfurl(SCRIPT, &mut MemoryStore::new()).unwrap_err();
    assert!(matches!(err, UnfurlError::InvalidConfig(_)));
}

#[test]
fn test_auto_mode_appends_new_pass() {
    let builder = TimelineBuilder::default();
    let mut store = MemoryStore::new();

    let first = builder.unfurl(SCRIPT, &mut store).unwrap();
    let second = builder.unfurl(SCRIPT, &mut store).unwrap();

    assert_eq!(first.base_track(), 1);
    assert_eq!(second.base_track(), 4);
    assert_eq!(store.segments().len(), 2 * first.segments().len());
}

#[test]
fn test_pinned_mode_regenerates_in_place() {
    let builder = pinned(3);
    let mut store = MemoryStore::new();
    store.create_segment(2, 0, 10, "below").unwrap();
    store.create_segment(4, 0, 10, "stale").unwrap();
    store.create_segment(6, 0, 10, "above").unwrap();

    builder.unfurl(SCRIPT, &mut store).unwrap();
    let once = store.clone();
    builder.unfurl(SCRIPT, &mut store).unwrap();

    assert_eq!(store, once);
    assert!(store.segments().iter().all(|s| s.label() != "stale"));
    assert!(store.segments().iter().any(|s| s.label() == "below"));
    assert!(store.segments().iter().any(|s| s.label() == "above"));
}

#[test]
fn test_dialogue_clip_is_labelled_with_parenthetical() {
    let builder = TimelineBuilder::default();
    let elements = builder.parse(SCRIPT).unwrap();
    let scenes = builder.timeline(&elements).unwrap();

    let clip = &scenes[0].clips()[1];
    assert!(matches!(clip, Clip::Dialogue { .. }));
    assert_eq!(clip.label(), "BOB (quietly): Hi there.");
}

/// A store that accepts a fixed number of creations and then refuses.
#[derive(Debug, Default)]
struct FlakyStore {
    tracks: BTreeSet<u32>,
    created: Vec<(u32, i64, i64, String)>,
    allow: usize,
}

struct FlakyHandle;

impl SegmentHandle for FlakyHandle {
    fn apply_display(&mut self, _hints: &DisplayHints) -> Result<(), StoreError> {
        Ok(())
    }
}

impl TimelineStore for FlakyStore {
    type Handle<'a> = FlakyHandle;

    fn list_track_numbers(&self) -> Result<BTreeSet<u32>, StoreError> {
        Ok(self.tracks.clone())
    }

    fn remove_items(&mut self, _range: TrackRange) -> Result<usize, StoreError> {
        Err(StoreError::rejected("remove_items", "store is locked"))
    }

    fn create_segment(
        &mut self,
        track: u32,
        start_frame: i64,
        end_frame: i64,
        label: &str,
    ) -> Result<Self::Handle<'_>, StoreError> {
        if self.created.len() >= self.allow {
            return Err(StoreError::Backend("disk full".to_string()));
        }
        self.created
            .push((track, start_frame, end_frame, label.to_string()));
        Ok(FlakyHandle)
    }
}

#[test]
fn test_create_failure_propagates_without_rollback() {
    let mut store = FlakyStore {
        allow: 2,
        ..FlakyStore::default()
    };

    let err = TimelineBuilder::default()
        .unfurl(SCRIPT, &mut store)
        .unwrap_err();

    assert!(matches!(err, UnfurlError::Store(StoreError::Backend(_))));
    assert_eq!(store.created.len(), 2);
}

#[test]
fn test_clear_failure_propagates_before_any_creation() {
    let mut store = FlakyStore {
        allow: usize::MAX,
        ..FlakyStore::default()
    };

    let err = pinned(2).unfurl(SCRIPT, &mut store).unwrap_err();

    assert!(matches!(
        err,
        UnfurlError::Store(StoreError::Rejected {
            operation: "remove_items",
            ..
        })
    ));
    assert!(store.created.is_empty());
}

#[test]
fn test_display_hints_follow_lanes() {
    let mut store = MemoryStore::new();
    let report = TimelineBuilder::default().unfurl(SCRIPT, &mut store).unwrap();

    for (placed, stored) in report.segments().iter().zip(store.segments()) {
        let expected = match placed.lane() {
            Lane::Scene => VerticalAnchor::Top,
            Lane::Dialogue => VerticalAnchor::Bottom,
            Lane::Action => VerticalAnchor::Center,
        };
        assert_eq!(stored.display().map(DisplayHints::anchor), Some(expected));
    }
}

fn check_pinned_runs_are_idempotent(
    base: u32,
    existing: Vec<u32>,
    padding: f64,
) -> Result<(), TestCaseError> {
    let builder = TimelineBuilder::new(AppConfig::new(
        TimingConfig::default(),
        LayoutConfig::new(padding, base),
        FrameRate::default(),
        StyleConfig::default(),
    ));

    let mut store = MemoryStore::new();
    for (idx, track) in existing.into_iter().enumerate() {
        let start = idx as i64 * 24;
        store.create_segment(track, start, start + 24, "existing").unwrap();
    }

    let first = builder.unfurl(SCRIPT, &mut store).unwrap();
    let once = store.clone();
    let second = builder.unfurl(SCRIPT, &mut store).unwrap();

    prop_assert_eq!(first, second);
    prop_assert_eq!(store, once);
    Ok(())
}

proptest! {
    #[test]
    fn pinned_runs_are_idempotent(
        base in 1u32..20,
        existing in prop::collection::vec(1u32..25, 0..12),
        padding in 0.25f64..3.0,
    ) {
        check_pinned_runs_are_idempotent(base, existing, padding)?;
    }
}
