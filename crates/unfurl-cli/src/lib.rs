//! CLI logic for the unfurl screenplay compiler.
//!
//! This module contains the core CLI logic: it loads configuration, applies
//! command-line overrides, and drives the [`TimelineBuilder`] against a
//! TOML timeline file.

pub mod error_adapter;

mod args;
mod config;
mod timeline_file;

pub use args::Args;

use std::fs;

use log::{debug, info};

use unfurl::{
    TimelineBuilder, UnfurlError,
    config::{AppConfig, FrameRate},
    markers::markers_from_segments,
    transcript::transcript,
};

/// Run the unfurl CLI application
///
/// This function processes the input screenplay through the unfurl pipeline
/// and updates the timeline file, or writes the outline when requested.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `UnfurlError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Empty scripts and scripts without scenes
/// - Parsing errors
/// - Timeline file errors
pub fn run(args: &Args) -> Result<(), UnfurlError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing screenplay"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    apply_overrides(&mut app_config, args)?;
    app_config.validate().map_err(UnfurlError::InvalidConfig)?;

    let source = fs::read_to_string(&args.input)?;
    let builder = TimelineBuilder::new(app_config);

    if let Some(path) = &args.outline {
        let elements = builder.parse(&source)?;
        let outline = builder.outline(&elements)?;
        timeline_file::save_outline(path, &outline)?;

        info!(scenes = outline.len(), outline_file = path; "Outline written");
        return Ok(());
    }

    let mut store = timeline_file::load(&args.output)?;
    let report = builder.unfurl(&source, &mut store)?;

    if args.markers {
        let cleared = store.clear_markers();
        let markers = markers_from_segments(report.segments());
        debug!(cleared, added = markers.len(); "Replacing markers");
        store.add_markers(markers);
    }

    if let Some(path) = &args.transcript {
        fs::write(path, transcript(report.segments(), true))?;
        info!(transcript_file = path; "Transcript written");
    }

    timeline_file::save(&args.output, &store)?;

    info!(
        base_track = report.base_track(),
        segments = report.segments().len(),
        output_file = args.output;
        "Timeline written"
    );

    Ok(())
}

fn apply_overrides(config: &mut AppConfig, args: &Args) -> Result<(), UnfurlError> {
    if let Some(track) = args.base_track {
        config.set_requested_base_track(track);
    }

    if args.fps.is_some() || args.fps_base.is_some() {
        let current = *config.render();
        let rate = FrameRate::new(
            args.fps.unwrap_or(current.fps()),
            args.fps_base.unwrap_or(current.fps_base()),
        )
        .map_err(|err| UnfurlError::InvalidConfig(err.to_string()))?;
        config.set_frame_rate(rate);
    }

    debug!(config:?; "Effective configuration");
    Ok(())
}
