//! Command-line argument definitions for the unfurl CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, per-run overrides, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the unfurl screenplay compiler
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input Fountain file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the timeline file (TOML), updated in place
    #[arg(short, long, default_value = "timeline.toml")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Pin output to three tracks starting here (0 appends above existing output)
    #[arg(long)]
    pub base_track: Option<u32>,

    /// Frame rate numerator
    #[arg(long)]
    pub fps: Option<u32>,

    /// Frame rate denominator
    #[arg(long)]
    pub fps_base: Option<f64>,

    /// Write the beat outline (TOML) to this path instead of updating the timeline
    #[arg(long, value_name = "FILE")]
    pub outline: Option<String>,

    /// Replace the timeline markers with one per segment start
    #[arg(long)]
    pub markers: bool,

    /// Also write a plain-text transcript of the new segments to this path
    #[arg(long)]
    pub transcript: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
