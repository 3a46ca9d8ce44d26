//! Typed screenplay elements.
//!
//! An [`Element`] is one parsed unit of screenplay markup. Parsers produce an
//! ordered sequence of elements (the element stream) which the reducers in
//! the `unfurl` crate fold into scene models.

use std::fmt;

/// The kind of a screenplay element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A scene heading such as `INT. KITCHEN - NIGHT`.
    SceneHeading,
    /// A `#`-prefixed section heading. `depth` is the number of `#` markers.
    SectionHeading { depth: usize },
    /// A character cue introducing a dialogue block.
    Character,
    /// A parenthetical inside a dialogue block, e.g. `(quietly)`.
    Parenthetical,
    /// Spoken dialogue.
    Dialogue,
    /// Action (scene description).
    Action,
    /// A blank line.
    EmptyLine,
    /// Anything else: transitions, synopses, page breaks, lyrics, centered text.
    Other,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::SceneHeading => write!(f, "scene heading"),
            ElementKind::SectionHeading { depth } => write!(f, "section heading (depth {depth})"),
            ElementKind::Character => write!(f, "character"),
            ElementKind::Parenthetical => write!(f, "parenthetical"),
            ElementKind::Dialogue => write!(f, "dialogue"),
            ElementKind::Action => write!(f, "action"),
            ElementKind::EmptyLine => write!(f, "empty line"),
            ElementKind::Other => write!(f, "other"),
        }
    }
}

/// One parsed unit of screenplay markup.
///
/// `text` is the whitespace-trimmed body. `original_content` keeps the line
/// exactly as written; scene names are taken from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    kind: ElementKind,
    text: String,
    original_content: String,
}

impl Element {
    /// Create an element whose original content is the given text.
    pub fn new(kind: ElementKind, text: impl Into<String>) -> Self {
        let original_content = text.into();
        Self {
            kind,
            text: original_content.trim().to_string(),
            original_content,
        }
    }

    /// Create an element with a body distinct from its original content.
    pub fn with_original(
        kind: ElementKind,
        text: impl AsRef<str>,
        original_content: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            text: text.as_ref().trim().to_string(),
            original_content: original_content.into(),
        }
    }

    /// Shorthand for a scene heading whose body and original content match.
    pub fn scene_heading(text: impl Into<String>) -> Self {
        Self::new(ElementKind::SceneHeading, text)
    }

    /// Shorthand for a section heading of the given depth.
    pub fn section_heading(depth: usize, text: impl Into<String>) -> Self {
        Self::new(ElementKind::SectionHeading { depth }, text)
    }

    /// Shorthand for a character cue.
    pub fn character(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Character, text)
    }

    /// Shorthand for a parenthetical.
    pub fn parenthetical(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Parenthetical, text)
    }

    /// Shorthand for a dialogue element.
    pub fn dialogue(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Dialogue, text)
    }

    /// Shorthand for an action element.
    pub fn action(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Action, text)
    }

    /// Shorthand for a blank line.
    pub fn empty_line() -> Self {
        Self::new(ElementKind::EmptyLine, "")
    }

    /// Returns the element kind.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Returns the trimmed body text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the untrimmed original content.
    pub fn original_content(&self) -> &str {
        &self.original_content
    }

    /// Returns the section depth, or `None` for non-section elements.
    pub fn depth(&self) -> Option<usize> {
        match self.kind {
            ElementKind::SectionHeading { depth } => Some(depth),
            _ => None,
        }
    }
}
