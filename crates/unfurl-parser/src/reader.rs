//! Line classification for Fountain screenplays.
//!
//! The reader walks the cleaned source line by line and emits one
//! [`Element`] per recognised unit. Fountain is context sensitive: whether a
//! line is a scene heading, character cue, or transition depends on the blank
//! lines around it, so the reader keeps a cursor and looks one line ahead.
//!
//! Small recognisers for the line prefixes are written with `winnow`; block
//! assembly (dialogue blocks, action paragraphs) is driven by [`Reader`].

use log::trace;
use winnow::{
    ModalResult, Parser as _,
    ascii::Caseless,
    combinator::{alt, peek},
    token::{literal, none_of, one_of, take_while},
};

use unfurl_core::element::{Element, ElementKind};

use crate::{
    clean::Cleaned,
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    span::Span,
};

/// Number of `#` markers opening a section heading.
fn section_marker(input: &mut &str) -> ModalResult<usize> {
    take_while(1.., '#').map(str::len).parse_next(input)
}

/// A conventional scene heading prefix followed by `.` or a space.
fn scene_prefix(input: &mut &str) -> ModalResult<()> {
    (
        alt((
            literal(Caseless("INT./EXT")),
            literal(Caseless("INT/EXT")),
            literal(Caseless("I/E")),
            literal(Caseless("INT")),
            literal(Caseless("EXT")),
            literal(Caseless("EST")),
        )),
        one_of(['.', ' ']),
    )
        .void()
        .parse_next(input)
}

/// A forced scene heading: a single leading `.` not followed by another `.`.
fn forced_scene(input: &mut &str) -> ModalResult<()> {
    ('.', peek(none_of(['.']))).void().parse_next(input)
}

/// A title page key such as `Title:` or `Draft date:`.
fn title_key(input: &mut &str) -> ModalResult<()> {
    (
        take_while(1.., |c: char| c.is_alphanumeric() || c == ' ' || c == '_'),
        ':',
    )
        .void()
        .parse_next(input)
}

fn recognizes(mut input: &str, parser: fn(&mut &str) -> ModalResult<()>) -> bool {
    parser(&mut input).is_ok()
}

/// Strips a trailing `#scene-number#` from a heading.
fn strip_scene_number(heading: &str) -> &str {
    let heading = heading.trim_end();
    if let Some(body) = heading.strip_suffix('#') {
        if let Some(idx) = body.rfind('#') {
            return body[..idx].trim_end();
        }
    }
    heading
}

/// Returns `true` if `line` reads as a character cue.
///
/// The name (before any `(V.O.)`-style extension) must contain a letter and
/// no lowercase characters. A trailing `^` marks dual dialogue.
fn is_character_cue(line: &str) -> bool {
    let name = line.trim_end_matches('^').trim();
    let head = name.split('(').next().unwrap_or(name);
    head.chars().any(char::is_alphabetic) && !head.chars().any(char::is_lowercase)
}

fn is_uppercase_line(line: &str) -> bool {
    line.chars().any(char::is_alphabetic) && !line.chars().any(char::is_lowercase)
}

/// A source line after cleaning.
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    text: &'a str,
    span: Span,
    /// The line only held removed regions; it is not a real blank line.
    removed: bool,
}

impl Line<'_> {
    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

fn split_lines(cleaned: &Cleaned) -> Vec<Line<'_>> {
    let text = cleaned.text();
    let mut lines = Vec::new();
    let mut start = 0;

    for piece in text.split('\n') {
        let end = start + piece.len();
        let content = piece.strip_suffix('\r').unwrap_or(piece);
        let span = Span::new(start..end);
        let removed = content.trim().is_empty() && cleaned.was_touched(span);
        lines.push(Line {
            text: content,
            span,
            removed,
        });
        start = end + 1;
    }

    if text.is_empty() || text.ends_with('\n') {
        lines.pop();
    }
    lines
}

/// How a single line was classified.
#[derive(Debug, PartialEq, Eq)]
enum LineKind<'a> {
    Section { depth: usize, title: &'a str },
    SceneHeading { text: &'a str },
    Character { name: &'a str },
    Action { text: &'a str },
    Other { text: &'a str },
}

/// Surrounding context used to classify a line.
#[derive(Debug, Clone, Copy)]
struct Context {
    previous_blank: bool,
    next_blank: bool,
}

fn classify(line: &str, context: Context) -> LineKind<'_> {
    let trimmed = line.trim();

    let mut rest = trimmed;
    if let Ok(depth) = section_marker(&mut rest) {
        return LineKind::Section {
            depth,
            title: rest.trim(),
        };
    }

    if trimmed.len() >= 3 && trimmed.chars().all(|c| c == '=') {
        return LineKind::Other { text: trimmed };
    }
    if let Some(synopsis) = trimmed.strip_prefix('=') {
        return LineKind::Other {
            text: synopsis.trim(),
        };
    }

    if recognizes(trimmed, forced_scene) {
        return LineKind::SceneHeading {
            text: strip_scene_number(&trimmed[1..]),
        };
    }
    if context.previous_blank && recognizes(trimmed, scene_prefix) {
        return LineKind::SceneHeading {
            text: strip_scene_number(trimmed),
        };
    }

    if let Some(forced) = trimmed.strip_prefix('>') {
        let text = forced.strip_suffix('<').unwrap_or(forced);
        return LineKind::Other { text: text.trim() };
    }
    if context.previous_blank
        && context.next_blank
        && trimmed.ends_with("TO:")
        && is_uppercase_line(trimmed)
    {
        return LineKind::Other { text: trimmed };
    }

    if let Some(lyric) = trimmed.strip_prefix('~') {
        return LineKind::Other { text: lyric.trim() };
    }

    if let Some(forced) = trimmed.strip_prefix('!') {
        return LineKind::Action {
            text: forced.trim(),
        };
    }

    if let Some(forced) = trimmed.strip_prefix('@') {
        return LineKind::Character {
            name: forced.trim_end_matches('^').trim(),
        };
    }
    if context.previous_blank && !context.next_blank && is_character_cue(trimmed) {
        return LineKind::Character {
            name: trimmed.trim_end_matches('^').trim(),
        };
    }

    LineKind::Action { text: trimmed }
}

/// Cursor over cleaned lines that assembles elements.
struct Reader<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
    previous_blank: bool,
    elements: Vec<Element>,
}

impl<'a> Reader<'a> {
    fn new(lines: Vec<Line<'a>>) -> Self {
        Self {
            lines,
            pos: 0,
            previous_blank: true,
            elements: Vec::new(),
        }
    }

    /// The next line that was not entirely removed, starting at `from`.
    fn next_real(&self, from: usize) -> Option<(usize, Line<'a>)> {
        self.lines
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, line)| !line.removed)
            .map(|(idx, line)| (idx, *line))
    }

    fn next_is_blank(&self) -> bool {
        self.next_real(self.pos + 1)
            .is_none_or(|(_, line)| line.is_blank())
    }

    /// Skips a `Key: value` title page block at the very start.
    fn skip_title_page(&mut self) {
        let Some((_, first)) = self.next_real(0) else {
            return;
        };
        if !recognizes(first.text.trim_start(), title_key) {
            return;
        }

        while let Some((idx, line)) = self.next_real(self.pos) {
            self.pos = idx + 1;
            if line.is_blank() {
                break;
            }
        }
        trace!(lines = self.pos; "Skipped title page");
    }

    fn read(mut self, collector: &mut DiagnosticCollector) -> Vec<Element> {
        self.skip_title_page();

        while let Some((idx, line)) = self.next_real(self.pos) {
            self.pos = idx;

            if line.is_blank() {
                self.elements
                    .push(Element::new(ElementKind::EmptyLine, line.text));
                self.previous_blank = true;
                self.pos += 1;
                continue;
            }

            let context = Context {
                previous_blank: self.previous_blank,
                next_blank: self.next_is_blank(),
            };
            self.previous_blank = false;

            match classify(line.text, context) {
                LineKind::Section { depth, title } => {
                    if title.is_empty() {
                        collector.emit(
                            Diagnostic::warning("section heading has no title")
                                .with_code(ErrorCode::E101)
                                .with_label(line.span, "untitled section")
                                .with_help("add a title after the `#` markers"),
                        );
                    }
                    self.elements
                        .push(Element::section_heading(depth, title));
                    self.pos += 1;
                }
                LineKind::SceneHeading { text } => {
                    self.elements.push(Element::with_original(
                        ElementKind::SceneHeading,
                        text,
                        line.text,
                    ));
                    self.pos += 1;
                }
                LineKind::Character { name } => {
                    self.elements.push(Element::character(name));
                    self.pos += 1;
                    self.read_dialogue_block();
                }
                LineKind::Action { text } => {
                    self.pos += 1;
                    self.read_action_paragraph(text);
                }
                LineKind::Other { text } => {
                    self.elements.push(Element::new(ElementKind::Other, text));
                    self.pos += 1;
                }
            }
        }

        self.elements
    }

    /// Reads parentheticals and dialogue up to the next blank line.
    ///
    /// Consecutive dialogue lines join into one element separated by `\n`.
    fn read_dialogue_block(&mut self) {
        let mut dialogue: Vec<&str> = Vec::new();

        while let Some((idx, line)) = self.next_real(self.pos) {
            if line.is_blank() {
                break;
            }
            self.pos = idx + 1;

            let trimmed = line.text.trim();
            if trimmed.starts_with('(') && trimmed.ends_with(')') {
                self.flush_dialogue(&mut dialogue);
                self.elements.push(Element::parenthetical(trimmed));
            } else {
                dialogue.push(trimmed);
            }
        }

        self.flush_dialogue(&mut dialogue);
    }

    fn flush_dialogue(&mut self, dialogue: &mut Vec<&str>) {
        if !dialogue.is_empty() {
            self.elements.push(Element::dialogue(dialogue.join("\n")));
            dialogue.clear();
        }
    }

    /// Reads an action paragraph starting with `first`.
    ///
    /// The paragraph ends at a blank line or at a section, synopsis, or page
    /// break line.
    fn read_action_paragraph(&mut self, first: &str) {
        let mut paragraph = vec![first];

        while let Some((idx, line)) = self.next_real(self.pos) {
            let trimmed = line.text.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('=') {
                break;
            }
            self.pos = idx + 1;
            paragraph.push(trimmed.strip_prefix('!').unwrap_or(trimmed).trim());
        }

        self.elements.push(Element::action(paragraph.join("\n")));
    }
}

/// Reads the cleaned source into an element stream.
pub(crate) fn read(cleaned: &Cleaned, collector: &mut DiagnosticCollector) -> Vec<Element> {
    Reader::new(split_lines(cleaned)).read(collector)
}
