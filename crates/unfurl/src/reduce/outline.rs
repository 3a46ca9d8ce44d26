//! The outline scene model: scenes holding named beats of raw lines.

use log::debug;

use unfurl_core::{
    element::{Element, ElementKind},
    script::{Beat, OutlineScene},
};

/// Section depth from which a heading opens a beat.
const BEAT_DEPTH: usize = 2;

/// Folds an element stream into [`OutlineScene`]s of [`Beat`]s.
///
/// Section headings of depth two or more open a named beat. Shallower
/// headings are ignored and do not close the open beat. Lines that appear
/// before any beat heading are gathered into an unnamed preamble beat, and
/// blank lines are only kept once a beat is open.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineReducer;

impl OutlineReducer {
    /// Creates an outline reducer.
    pub fn new() -> Self {
        Self
    }

    /// Reduces `elements` into outline scenes, in source order.
    pub fn reduce<'a>(
        &self,
        elements: impl IntoIterator<Item = &'a Element>,
    ) -> Vec<OutlineScene> {
        let scenes = elements.into_iter().fold(Vec::new(), step);

        let beats: usize = scenes.iter().map(|scene| scene.beats().len()).sum();
        debug!(scenes = scenes.len(), beats; "Reduced outline");
        scenes
    }
}

fn step(mut scenes: Vec<OutlineScene>, element: &Element) -> Vec<OutlineScene> {
    if element.kind() == ElementKind::SceneHeading {
        scenes.push(OutlineScene::new(element.original_content().trim()));
        return scenes;
    }

    let Some(scene) = scenes.last_mut() else {
        return scenes;
    };

    match element.kind() {
        ElementKind::SectionHeading { depth } if depth >= BEAT_DEPTH => {
            scene.push_beat(Beat::new(element.text()));
        }
        ElementKind::SectionHeading { .. } => {}
        ElementKind::EmptyLine if scene.beats().is_empty() => {}
        _ => {
            if scene.beats().is_empty() {
                scene.push_beat(Beat::new(""));
            }
            if let Some(beat) = scene.last_beat_mut() {
                beat.push_line(element.text());
            }
        }
    }

    scenes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reduce(elements: &[Element]) -> Vec<OutlineScene> {
        OutlineReducer::new().reduce(elements)
    }

    #[test]
    fn test_shallow_heading_does_not_close_beat() {
        let scenes = reduce(&[
            Element::scene_heading("INT. ROOM"),
            Element::section_heading(2, "Setup"),
            Element::action("He sits."),
            Element::section_heading(1, "ignored"),
            Element::action("He waits."),
        ]);

        assert_eq!(scenes.len(), 1);
        let beats = scenes[0].beats();
        assert_eq!(beats.len(), 1);
        assert_eq!(beats[0].name(), "Setup");
        assert_eq!(beats[0].lines(), ["He sits.", "He waits."]);
    }

    #[test]
    fn test_preamble_beat_is_created_lazily() {
        let scenes = reduce(&[
            Element::scene_heading("INT. ROOM"),
            Element::empty_line(),
            Element::action("He sits."),
            Element::empty_line(),
            Element::section_heading(3, "Twist"),
            Element::character("BOB"),
            Element::dialogue("Hi."),
        ]);

        let beats = scenes[0].beats();
        assert_eq!(beats.len(), 2);
        assert!(beats[0].is_preamble());
        // The leading blank is dropped, the one inside the beat is kept.
        assert_eq!(beats[0].lines(), ["He sits.", ""]);
        assert_eq!(beats[1].name(), "Twist");
        assert_eq!(beats[1].lines(), ["BOB", "Hi."]);
    }

    #[test]
    fn test_new_scene_resets_beat() {
        let scenes = reduce(&[
            Element::scene_heading("INT. ROOM"),
            Element::section_heading(2, "Setup"),
            Element::scene_heading("EXT. STREET"),
            Element::empty_line(),
            Element::action("Rain."),
        ]);

        assert_eq!(scenes.len(), 2);
        assert_eq!(scenes[0].beats().len(), 1);
        assert!(scenes[0].beats()[0].lines().is_empty());
        assert_eq!(scenes[1].beats().len(), 1);
        assert!(scenes[1].beats()[0].is_preamble());
        assert_eq!(scenes[1].beats()[0].lines(), ["Rain."]);
    }

    #[test]
    fn test_section_depth_decides_beats() {
        let scenes = reduce(&[
            Element::scene_heading("INT. ROOM"),
            Element::section_heading(1, "Act One"),
            Element::section_heading(2, "Setup"),
            Element::section_heading(4, "Detail"),
            Element::action("He sits."),
        ]);

        let beats = scenes[0].beats();
        assert_eq!(beats.len(), 2);
        assert_eq!(beats[0].name(), "Setup");
        assert!(beats[0].lines().is_empty());
        assert_eq!(beats[1].name(), "Detail");
        assert_eq!(beats[1].lines(), ["He sits."]);
    }

    #[test]
    fn test_elements_before_first_heading_are_discarded() {
        let scenes = reduce(&[
            Element::section_heading(2, "Orphan"),
            Element::action("Lost."),
            Element::scene_heading("INT. ROOM"),
        ]);

        assert_eq!(scenes.len(), 1);
        assert!(scenes[0].beats().is_empty());
    }
}
