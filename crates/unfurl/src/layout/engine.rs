//! Sequential scene layout.

use log::{debug, info};

use unfurl_core::{
    frame::FrameRate,
    script::{Clip, Scene},
    segment::{Lane, PlacedSegment, TrackRange},
};

use crate::{config::AppConfig, error::UnfurlError};

/// Lays scenes end to end on a three-track block.
///
/// The layout is a single forward sweep. Within a scene, clips follow each
/// other with no overlap even though dialogue and action sit on different
/// tracks; each scene is padded on both ends and its label segment spans the
/// whole scene. Every boundary in seconds is converted to a frame exactly
/// once, so the end frame of one segment is the start frame of the next.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    scene_padding_seconds: f64,
    frame_rate: FrameRate,
}

impl LayoutEngine {
    /// Creates a layout engine.
    ///
    /// # Arguments
    ///
    /// * `scene_padding_seconds` - Padding before the first and after the last clip.
    /// * `frame_rate` - Rate used to convert seconds into frames.
    pub fn new(scene_padding_seconds: f64, frame_rate: FrameRate) -> Self {
        Self {
            scene_padding_seconds,
            frame_rate,
        }
    }

    /// Creates a layout engine from application configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.layout().scene_padding_seconds(), *config.render())
    }

    /// Lays out `scenes` on the block starting at `base`.
    ///
    /// Segments are returned per scene, clips first in source order and the
    /// scene label last.
    ///
    /// # Errors
    ///
    /// Returns [`UnfurlError::Layout`] if `base + 2` is not a valid track.
    pub fn layout(&self, scenes: &[Scene], base: u32) -> Result<Vec<PlacedSegment>, UnfurlError> {
        let block = TrackRange::lanes_from(base)
            .ok_or_else(|| UnfurlError::Layout(format!("tracks starting at {base} overflow")))?;
        info!(scenes = scenes.len(), tracks:% = block; "Laying out scenes");

        let mut segments = Vec::new();
        let mut cursor_seconds = 0.0;
        let mut cursor_frame = self.frame_rate.seconds_to_frames(cursor_seconds);

        for scene in scenes {
            let mut local_total = self.scene_padding_seconds;
            let mut boundary = self.frame_at(cursor_seconds, local_total);

            for clip in scene.clips() {
                let end = local_total + clip.seconds();
                let end_frame = self.frame_at(cursor_seconds, end);

                segments.push(PlacedSegment::new(
                    base + lane_of(clip).offset(),
                    lane_of(clip),
                    boundary,
                    end_frame,
                    clip.label(),
                ));

                local_total = end;
                boundary = end_frame;
            }

            local_total += self.scene_padding_seconds;
            let scene_end = self.frame_at(cursor_seconds, local_total);

            segments.push(PlacedSegment::new(
                base,
                Lane::Scene,
                cursor_frame,
                scene_end,
                scene.name(),
            ));
            debug!(
                scene = scene.name(),
                start_frame = cursor_frame,
                end_frame = scene_end;
                "Scene placed"
            );

            cursor_seconds += local_total;
            cursor_frame = scene_end;
        }

        info!(segments = segments.len(), end_frame = cursor_frame; "Layout complete");
        Ok(segments)
    }

    fn frame_at(&self, cursor_seconds: f64, offset_seconds: f64) -> i64 {
        self.frame_rate
            .seconds_to_frames(cursor_seconds + offset_seconds)
    }
}

fn lane_of(clip: &Clip) -> Lane {
    if clip.is_dialogue() {
        Lane::Dialogue
    } else {
        Lane::Action
    }
}
