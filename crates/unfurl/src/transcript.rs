//! Plain-text transcript of laid-out segments.
//!
//! Concatenates segment labels in timeline order, which is handy for reading
//! a cut back as prose or piping it to a text-to-speech tool.

use unfurl_core::segment::PlacedSegment;

/// Joins segment labels ordered by start frame, then track, with a blank
/// line between them.
///
/// With `split_dialogue`, a label opening with an upper-case speaker
/// followed by `:` is broken onto two lines, speaker first. Labels whose
/// speaker carries a parenthetical are left as they are.
pub fn transcript<'a>(
    segments: impl IntoIterator<Item = &'a PlacedSegment>,
    split_dialogue: bool,
) -> String {
    let mut ordered: Vec<_> = segments.into_iter().collect();
    ordered.sort_by_key(|s| (s.start_frame(), s.track()));

    ordered
        .into_iter()
        .map(|segment| {
            let label = segment.label();
            match speaker_split(label) {
                Some((speaker, line)) if split_dialogue => format!("{speaker}\n{line}"),
                _ => label.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn speaker_split(label: &str) -> Option<(&str, &str)> {
    let (speaker, line) = label.split_once(':')?;
    let is_speaker =
        !speaker.is_empty() && speaker.chars().all(|c| c.is_ascii_uppercase() || c == ' ');
    is_speaker.then(|| (speaker.trim(), line.trim()))
}

#[cfg(test)]
mod tests {
    use unfurl_core::segment::Lane;

    use super::*;

    fn segments() -> Vec<PlacedSegment> {
        vec![
            PlacedSegment::new(2, Lane::Dialogue, 24, 68, "BOB: Hi there"),
            PlacedSegment::new(3, Lane::Action, 68, 104, "He sits: slowly."),
            PlacedSegment::new(2, Lane::Dialogue, 104, 150, "BOB (quietly): Bye"),
            PlacedSegment::new(1, Lane::Scene, 0, 174, "INT. ROOM - DAY"),
        ]
    }

    #[test]
    fn test_ordered_by_start_then_track() {
        let text = transcript(&segments(), false);
        assert_eq!(
            text,
            "INT. ROOM - DAY\n\nBOB: Hi there\n\nHe sits: slowly.\n\nBOB (quietly): Bye"
        );
    }

    #[test]
    fn test_split_dialogue() {
        let text = transcript(&segments(), true);
        assert_eq!(
            text,
            "INT. ROOM - DAY\n\nBOB\nHi there\n\nHe sits: slowly.\n\nBOB (quietly): Bye"
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(transcript(std::iter::empty(), true), "");
    }
}
