//! Unfurl - Compile Fountain screenplays into laid-out timelines.
//!
//! Parsing, scene reduction, track allocation, frame layout, and
//! materialization into a timeline store. A screenplay becomes a sequence of
//! non-overlapping, frame-bounded segments spread over three tracks: scene
//! labels, dialogue, and action.

pub mod config;
pub mod layout;
pub mod markers;
pub mod materialize;
pub mod reduce;
pub mod store;
pub mod transcript;

mod error;

pub use unfurl_core::{element, frame, script, segment, timing};

pub use error::UnfurlError;

use log::{debug, info, trace};

use config::AppConfig;
use element::Element;
use layout::{ChannelAllocator, LayoutEngine};
use reduce::{OutlineReducer, TimelineReducer};
use script::{OutlineScene, Scene};
use segment::{PlacedSegment, TrackRange};
use store::TimelineStore;

/// The outcome of a full run.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutReport {
    base_track: u32,
    segments: Vec<PlacedSegment>,
}

impl LayoutReport {
    /// The base track the run was written to.
    pub fn base_track(&self) -> u32 {
        self.base_track
    }

    /// The three tracks the run occupies.
    pub fn tracks(&self) -> Option<TrackRange> {
        TrackRange::lanes_from(self.base_track)
    }

    /// Segments in the order they were created.
    pub fn segments(&self) -> &[PlacedSegment] {
        &self.segments
    }

    /// Consumes the report, returning its segments.
    pub fn into_segments(self) -> Vec<PlacedSegment> {
        self.segments
    }
}

/// Builder for compiling screenplays into timelines.
///
/// This provides an API for processing screenplays through the parsing,
/// reduction, allocation, layout, and materialization stages, either one
/// stage at a time or all at once with [`unfurl`](Self::unfurl).
///
/// # Examples
///
/// ```rust
/// use unfurl::{TimelineBuilder, config::AppConfig, store::MemoryStore};
///
/// let source = "INT. ROOM - DAY\n\nBOB\nHi there\n";
///
/// let builder = TimelineBuilder::new(AppConfig::default());
/// let mut store = MemoryStore::new();
///
/// let report = builder.unfurl(source, &mut store)
///     .expect("Failed to unfurl");
///
/// assert_eq!(report.base_track(), 1);
/// assert_eq!(store.segments().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct TimelineBuilder {
    config: AppConfig,
}

impl TimelineBuilder {
    /// Create a new timeline builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Timing, layout, frame rate, and style settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse screenplay source into its element stream.
    ///
    /// # Arguments
    ///
    /// * `source` - Fountain screenplay text
    ///
    /// # Errors
    ///
    /// Returns [`UnfurlError::EmptyInput`] for empty or whitespace-only
    /// source, or [`UnfurlError::Parse`] carrying the source when reading
    /// fails.
    pub fn parse(&self, source: &str) -> Result<Vec<Element>, UnfurlError> {
        if source.trim().is_empty() {
            return Err(UnfurlError::EmptyInput);
        }

        info!("Parsing screenplay");
        let elements = unfurl_parser::parse(source)
            .map_err(|err| UnfurlError::new_parse_error(err, source))?;

        debug!(elements = elements.len(); "Screenplay parsed");
        trace!(elements:?; "Parsed elements");
        Ok(elements)
    }

    /// Reduce an element stream into timed scenes.
    ///
    /// # Errors
    ///
    /// Returns [`UnfurlError::InvalidConfig`] for unusable timing settings,
    /// or [`UnfurlError::NoScenes`] if the stream holds no scene heading.
    pub fn timeline(&self, elements: &[Element]) -> Result<Vec<Scene>, UnfurlError> {
        self.config.validate().map_err(UnfurlError::InvalidConfig)?;

        let scenes = TimelineReducer::new(*self.config.timing()).reduce(elements);
        if scenes.is_empty() {
            return Err(UnfurlError::NoScenes);
        }
        Ok(scenes)
    }

    /// Reduce an element stream into outline scenes of beats.
    ///
    /// # Errors
    ///
    /// Returns [`UnfurlError::NoScenes`] if the stream holds no scene heading.
    pub fn outline(&self, elements: &[Element]) -> Result<Vec<OutlineScene>, UnfurlError> {
        let scenes = OutlineReducer::new().reduce(elements);
        if scenes.is_empty() {
            return Err(UnfurlError::NoScenes);
        }
        Ok(scenes)
    }

    /// Lay out scenes on the block starting at `base`, without touching any
    /// store.
    ///
    /// # Errors
    ///
    /// Returns [`UnfurlError::Layout`] on track overflow.
    pub fn layout(&self, scenes: &[Scene], base: u32) -> Result<Vec<PlacedSegment>, UnfurlError> {
        LayoutEngine::from_config(&self.config).layout(scenes, base)
    }

    /// Run the whole pipeline against `store`.
    ///
    /// Parses, reduces, allocates tracks (clearing them in pinned mode),
    /// lays out, and materializes. The store is not touched until the source
    /// is known to hold at least one scene.
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage. A [`UnfurlError::Store`] error
    /// may leave the segments created before it in the store.
    pub fn unfurl<S: TimelineStore>(
        &self,
        source: &str,
        store: &mut S,
    ) -> Result<LayoutReport, UnfurlError> {
        let elements = self.parse(source)?;
        let scenes = self.timeline(&elements)?;

        let allocator = ChannelAllocator::new(self.config.layout().requested_base_track());
        let base_track = allocator.allocate(store)?;

        let segments = self.layout(&scenes, base_track)?;
        materialize::materialize(&segments, self.config.style(), store)?;

        info!(base_track, segments = segments.len(); "Timeline unfurled");
        Ok(LayoutReport {
            base_track,
            segments,
        })
    }
}
