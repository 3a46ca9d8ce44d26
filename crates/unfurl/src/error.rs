//! Error types for unfurl operations.
//!
//! This module provides the main error type [`UnfurlError`] which wraps
//! every failure the compiler surfaces to its caller.

use std::io;

use thiserror::Error;

use unfurl_parser::error::ParseError;

use crate::store::StoreError;

/// The main error type for unfurl operations.
///
/// `EmptyInput` and `NoScenes` are raised before anything touches the
/// timeline store. A `Store` error may leave the store holding the segments
/// created before the failing call.
#[derive(Debug, Error)]
pub enum UnfurlError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("No text in script")]
    EmptyInput,

    #[error("No scenes in script, are the scene headings valid?")]
    NoScenes,

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Timeline store error: {0}")]
    Store(#[from] StoreError),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl UnfurlError {
    /// Create a new `Parse` error with the associated source text.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
