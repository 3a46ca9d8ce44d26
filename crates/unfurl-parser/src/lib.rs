//! # Unfurl Parser
//!
//! Reads Fountain screenplay source into the typed element stream consumed
//! by the unfurl compiler.
//!
//! ## Usage
//!
//! ```
//! # use unfurl_parser::{parse, error::ParseError};
//! # use unfurl_core::element::ElementKind;
//! fn main() -> Result<(), ParseError> {
//!     let source = "INT. ROOM - DAY\n\nBOB\nHi there\n";
//!
//!     let elements = parse(source)?;
//!     assert_eq!(elements[0].kind(), ElementKind::SceneHeading);
//!     Ok(())
//! }
//! ```

pub mod error;

mod clean;
mod reader;
mod span;

pub use span::Span;

use log::debug;

use unfurl_core::element::Element;

use error::{DiagnosticCollector, ParseError};

/// Read Fountain source text into an ordered element stream.
///
/// The pipeline has two steps:
///
/// 1. **Clean** - Blank out boneyard comments and notes, keeping offsets
/// 2. **Read** - Classify lines and assemble dialogue blocks and action paragraphs
///
/// # Errors
///
/// Returns a [`ParseError`] carrying every error diagnostic found, such as an
/// unterminated boneyard comment. Warnings are logged and do not fail the
/// read.
pub fn parse(source: &str) -> Result<Vec<Element>, ParseError> {
    let mut collector = DiagnosticCollector::new();

    let cleaned = clean::clean(source, &mut collector);
    let elements = reader::read(&cleaned, &mut collector);

    collector.finish()?;

    debug!(elements = elements.len(); "Screenplay read");
    Ok(elements)
}
