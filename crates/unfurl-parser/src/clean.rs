//! Removal of non-printing regions before line classification.
//!
//! Boneyard comments (`/* ... */`) and notes (`[[ ... ]]`) never reach the
//! element stream. They are blanked out in place: every byte inside a region
//! becomes a space, except line breaks, so byte offsets and line numbers of
//! the cleaned text still match the source.

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    span::Span,
};

/// Source text with boneyard and note regions blanked.
#[derive(Debug)]
pub(crate) struct Cleaned {
    text: String,
    /// Byte ranges of the removed regions.
    touched: Vec<Span>,
}

impl Cleaned {
    /// The cleaned text.
    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` if any removed region overlaps `span`.
    pub(crate) fn was_touched(&self, span: Span) -> bool {
        self.touched
            .iter()
            .any(|region| region.start() < span.end() && span.start() < region.end())
    }
}

/// A kind of region that is removed before classification.
#[derive(Debug, Clone, Copy)]
struct RegionKind {
    open: &'static str,
    close: &'static str,
    code: ErrorCode,
    message: &'static str,
    help: &'static str,
}

const BONEYARD: RegionKind = RegionKind {
    open: "/*",
    close: "*/",
    code: ErrorCode::E001,
    message: "unterminated boneyard comment",
    help: "close the comment with `*/`",
};

const NOTE: RegionKind = RegionKind {
    open: "[[",
    close: "]]",
    code: ErrorCode::E002,
    message: "unterminated note",
    help: "close the note with `]]`",
};

/// Blank out boneyard and note regions.
///
/// Unterminated regions are reported to `collector`; the rest of the source
/// from the opening marker is blanked so classification can still proceed.
pub(crate) fn clean(source: &str, collector: &mut DiagnosticCollector) -> Cleaned {
    let mut bytes = source.as_bytes().to_vec();
    let mut touched = Vec::new();
    let mut pos = 0;

    while pos < source.len() {
        let Some((start, kind)) = next_region(source, pos) else {
            break;
        };

        let body_start = start + kind.open.len();
        let end = match source[body_start..].find(kind.close) {
            Some(offset) => body_start + offset + kind.close.len(),
            None => {
                collector.emit(
                    Diagnostic::error(kind.message)
                        .with_code(kind.code)
                        .with_label(Span::new(start..body_start), "opened here")
                        .with_help(kind.help),
                );
                source.len()
            }
        };

        for byte in &mut bytes[start..end] {
            if *byte != b'\n' && *byte != b'\r' {
                *byte = b' ';
            }
        }
        touched.push(Span::new(start..end));
        pos = end;
    }

    // Only ASCII markers were replaced, and whole regions at once, so any
    // multi-byte character is either untouched or entirely blanked.
    let text = String::from_utf8(bytes).unwrap_or_else(|err| {
        String::from_utf8_lossy(err.as_bytes()).into_owned()
    });

    Cleaned { text, touched }
}

/// Finds the earliest region opener at or after `pos`.
fn next_region(source: &str, pos: usize) -> Option<(usize, RegionKind)> {
    let rest = &source[pos..];
    let boneyard = rest.find(BONEYARD.open).map(|idx| (pos + idx, BONEYARD));
    let note = rest.find(NOTE.open).map(|idx| (pos + idx, NOTE));

    match (boneyard, note) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_ok(source: &str) -> Cleaned {
        let mut collector = DiagnosticCollector::new();
        let cleaned = clean(source, &mut collector);
        assert!(collector.finish().is_ok(), "unexpected diagnostics");
        cleaned
    }

    #[test]
    fn test_clean_without_regions_is_identity() {
        let source = "INT. ROOM\n\nHe sits.";
        assert_eq!(clean_ok(source).text(), source);
    }

    #[test]
    fn test_boneyard_blanked_preserving_offsets() {
        let source = "He /* not */ sits.";
        let cleaned = clean_ok(source);

        assert_eq!(cleaned.text(), "He           sits.");
        assert_eq!(cleaned.text().len(), source.len());
    }

    #[test]
    fn test_multiline_boneyard_keeps_line_breaks() {
        let source = "A\n/* one\ntwo */\nB";
        let cleaned = clean_ok(source);

        assert_eq!(cleaned.text().lines().count(), 4);
        assert!(cleaned.was_touched(Span::new(2..8)));
        assert!(!cleaned.was_touched(Span::new(0..1)));
    }

    #[test]
    fn test_note_blanked() {
        let cleaned = clean_ok("He sits. [[fix this]]");
        assert_eq!(cleaned.text().trim_end(), "He sits.");
    }

    #[test]
    fn test_multibyte_inside_region() {
        let cleaned = clean_ok("Café /* naïve */ ok");
        assert_eq!(cleaned.text(), "Café              ok");
    }

    #[test]
    fn test_unterminated_boneyard_reports_error() {
        let mut collector = DiagnosticCollector::new();
        let cleaned = clean("Before\n/* never closed", &mut collector);

        assert_eq!(cleaned.text().trim_end(), "Before");

        let err = collector.finish().unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E001));
        assert_eq!(diag.labels()[0].span(), Span::new(7..9));
    }

    #[test]
    fn test_unterminated_note_reports_error() {
        let mut collector = DiagnosticCollector::new();
        clean("He sits. [[oops", &mut collector);

        let err = collector.finish().unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E002));
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn source_strategy() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                Just("/*".to_string()),
                Just("*/".to_string()),
                Just("[[".to_string()),
                Just("]]".to_string()),
                Just("\n".to_string()),
                Just("\r\n".to_string()),
                "[a-zA-Zé ]{0,6}",
            ],
            0..24,
        )
        .prop_map(|parts| parts.concat())
    }

    fn check_clean_preserves_layout(source: &str) -> Result<(), TestCaseError> {
        let mut collector = DiagnosticCollector::new();
        let cleaned = clean(source, &mut collector);

        prop_assert_eq!(cleaned.text().len(), source.len());
        prop_assert_eq!(
            cleaned.text().matches('\n').count(),
            source.matches('\n').count()
        );
        Ok(())
    }

    fn check_text_outside_regions_is_kept(source: &str) -> Result<(), TestCaseError> {
        let mut collector = DiagnosticCollector::new();
        let cleaned = clean(source, &mut collector);

        for (offset, (original, kept)) in source.bytes().zip(cleaned.text().bytes()).enumerate() {
            if !cleaned.was_touched(Span::new(offset..offset + 1)) {
                prop_assert_eq!(original, kept);
            }
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn clean_preserves_layout(source in source_strategy()) {
            check_clean_preserves_layout(&source)?;
        }

        #[test]
        fn text_outside_regions_is_kept(source in source_strategy()) {
            check_text_outside_regions_is_kept(&source)?;
        }
    }
}
