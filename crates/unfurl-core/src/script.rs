//! Scene models produced by folding the element stream.
//!
//! Two independent shapes share the same scene segmentation rule (a new
//! scene starts at every scene heading):
//!
//! - The **linear** model: [`Scene`] holding timed [`Clip`]s, consumed by the
//!   layout engine.
//! - The **outline** model: [`OutlineScene`] holding named [`Beat`]s of raw
//!   text lines, with no timing.

use serde::Serialize;

/// A timed unit derived from a dialogue or action element.
#[derive(Debug, Clone, PartialEq)]
pub enum Clip {
    /// A spoken line, attributed to the most recent character cue.
    Dialogue {
        seconds: f64,
        character: String,
        parenthetical: Option<String>,
        text: String,
    },
    /// A block of scene description.
    Action { seconds: f64, text: String },
}

impl Clip {
    /// Estimated duration in seconds.
    pub fn seconds(&self) -> f64 {
        match self {
            Clip::Dialogue { seconds, .. } | Clip::Action { seconds, .. } => *seconds,
        }
    }

    /// The clip's source text.
    pub fn text(&self) -> &str {
        match self {
            Clip::Dialogue { text, .. } | Clip::Action { text, .. } => text,
        }
    }

    /// Returns `true` for dialogue clips.
    pub fn is_dialogue(&self) -> bool {
        matches!(self, Clip::Dialogue { .. })
    }

    /// Formats the label shown on the timeline.
    ///
    /// Dialogue reads `CHARACTER (parenthetical): text`; action is its text.
    pub fn label(&self) -> String {
        match self {
            Clip::Dialogue {
                character,
                parenthetical,
                text,
                ..
            } => match parenthetical {
                Some(parenthetical) => format!("{character} {parenthetical}: {text}"),
                None => format!("{character}: {text}"),
            },
            Clip::Action { text, .. } => text.clone(),
        }
    }
}

/// A scene in the linear model.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    name: String,
    clips: Vec<Clip>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            clips: Vec::new(),
        }
    }

    /// Append a clip, builder style.
    pub fn with_clip(mut self, clip: Clip) -> Self {
        self.clips.push(clip);
        self
    }

    /// Append a clip.
    pub fn push(&mut self, clip: Clip) {
        self.clips.push(clip);
    }

    /// The scene name, taken verbatim from its heading.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Clips in source order.
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    /// Sum of the clip durations, without padding.
    pub fn clip_seconds(&self) -> f64 {
        self.clips.iter().map(Clip::seconds).sum()
    }
}

/// A named grouping of consecutive lines under a sub-heading.
///
/// The name is empty for the preamble beat that collects lines appearing
/// before the scene's first section heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Beat {
    name: String,
    lines: Vec<String>,
}

impl Beat {
    /// Create an empty beat.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: Vec::new(),
        }
    }

    /// Append a line.
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// The beat name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` for the unnamed preamble beat.
    pub fn is_preamble(&self) -> bool {
        self.name.is_empty()
    }

    /// Lines in source order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// A scene in the outline model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineScene {
    name: String,
    beats: Vec<Beat>,
}

impl OutlineScene {
    /// Create an empty outline scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            beats: Vec::new(),
        }
    }

    /// Append a beat.
    pub fn push_beat(&mut self, beat: Beat) {
        self.beats.push(beat);
    }

    /// The last beat, if any.
    pub fn last_beat_mut(&mut self) -> Option<&mut Beat> {
        self.beats.last_mut()
    }

    /// The scene name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Beats in source order.
    pub fn beats(&self) -> &[Beat] {
        &self.beats
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn dialogue(character: &str, parenthetical: Option<&str>, text: &str) -> Clip {
        Clip::Dialogue {
            seconds: 1.8,
            character: character.to_string(),
            parenthetical: parenthetical.map(str::to_string),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_dialogue_label() {
        assert_eq!(dialogue("BOB", None, "Hi there").label(), "BOB: Hi there");
        assert_eq!(
            dialogue("BOB", Some("(whispering)"), "Hi there").label(),
            "BOB (whispering): Hi there"
        );
        assert_eq!(dialogue("", None, "Who said that?").label(), ": Who said that?");
    }

    #[test]
    fn test_action_label_is_text() {
        let clip = Clip::Action {
            seconds: 1.5,
            text: "He sits.".to_string(),
        };
        assert_eq!(clip.label(), "He sits.");
        assert!(!clip.is_dialogue());
    }

    #[test]
    fn test_scene_clip_seconds() {
        let scene = Scene::new("INT. ROOM - DAY")
            .with_clip(dialogue("BOB", None, "Hi there"))
            .with_clip(Clip::Action {
                seconds: 1.5,
                text: "He sits.".to_string(),
            });

        assert_eq!(scene.clips().len(), 2);
        assert_approx_eq!(f64, scene.clip_seconds(), 3.3);
    }

    #[test]
    fn test_outline_scene_beats() {
        let mut scene = OutlineScene::new("INT. ROOM");
        scene.push_beat(Beat::new(""));
        scene
            .last_beat_mut()
            .expect("beat was just pushed")
            .push_line("He sits.");

        assert_eq!(scene.beats().len(), 1);
        assert!(scene.beats()[0].is_preamble());
        assert_eq!(scene.beats()[0].lines(), ["He sits."]);
    }
}
