//! The linear scene model: scenes holding timed dialogue and action clips.

use log::{debug, trace};

use unfurl_core::{
    element::{Element, ElementKind},
    script::{Clip, Scene},
    timing::TimingConfig,
};

/// Folds an element stream into [`Scene`]s of timed [`Clip`]s.
///
/// Character cues and parentheticals are carried state. A parenthetical
/// attaches to the next dialogue only, and is dropped if a new cue or scene
/// comes first. The current character survives across dialogue blocks until
/// the next cue or scene heading.
#[derive(Debug, Clone, Default)]
pub struct TimelineReducer {
    timing: TimingConfig,
}

/// Accumulator threaded through the fold.
#[derive(Debug, Default)]
struct Fold {
    scenes: Vec<Scene>,
    character: String,
    parenthetical: Option<String>,
}

impl TimelineReducer {
    /// Creates a reducer estimating durations with `timing`.
    pub fn new(timing: TimingConfig) -> Self {
        Self { timing }
    }

    /// Reduces `elements` into scenes, in source order.
    pub fn reduce<'a>(&self, elements: impl IntoIterator<Item = &'a Element>) -> Vec<Scene> {
        let fold = elements
            .into_iter()
            .fold(Fold::default(), |fold, element| self.step(fold, element));

        let clips: usize = fold.scenes.iter().map(|scene| scene.clips().len()).sum();
        debug!(scenes = fold.scenes.len(), clips; "Reduced timeline");
        fold.scenes
    }

    fn step(&self, mut fold: Fold, element: &Element) -> Fold {
        if element.kind() == ElementKind::SceneHeading {
            let name = element.original_content().trim();
            trace!(scene = name; "Scene opened");
            fold.scenes.push(Scene::new(name));
            fold.character.clear();
            fold.parenthetical = None;
            return fold;
        }

        let Some(scene) = fold.scenes.last_mut() else {
            return fold;
        };

        match element.kind() {
            ElementKind::Character => {
                fold.character = element.text().to_string();
                fold.parenthetical = None;
            }
            ElementKind::Parenthetical => {
                fold.parenthetical = Some(element.text())
                    .filter(|text| !text.is_empty())
                    .map(str::to_string);
            }
            ElementKind::Dialogue => scene.push(Clip::Dialogue {
                seconds: self.timing.estimate(element.text(), true),
                character: fold.character.clone(),
                parenthetical: fold.parenthetical.take(),
                text: element.text().to_string(),
            }),
            ElementKind::Action => scene.push(Clip::Action {
                seconds: self.timing.estimate(element.text(), false),
                text: element.text().to_string(),
            }),
            _ => {}
        }

        fold
    }
}
