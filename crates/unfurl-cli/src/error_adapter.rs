//! Miette reports for failed runs.
//!
//! A failed run becomes one or more [`Report`]s. Reader diagnostics point into
//! the screenplay and keep their own severity; everything else is a single
//! report with an `unfurl::` code and, where the fix is known, a help line.

use std::{error::Error, fmt};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, Severity as MietteSeverity, SourceCode};

use unfurl::{UnfurlError, store::StoreError};
use unfurl_parser::error::{Diagnostic, Severity};

/// One renderable problem from a failed run.
#[derive(Debug)]
pub enum Report<'a> {
    /// A reader diagnostic with the screenplay it refers to.
    Script {
        diagnostic: &'a Diagnostic,
        source: &'a str,
    },
    /// Any other failure.
    Run(&'a UnfurlError),
}

/// Splits `err` into the reports to print, in source order.
///
/// A parse error yields one report per diagnostic. A parse error without
/// diagnostics, and every other error, yields a single report.
pub fn to_reports(err: &UnfurlError) -> Vec<Report<'_>> {
    match err {
        UnfurlError::Parse { err: parse, src } if !parse.diagnostics().is_empty() => parse
            .diagnostics()
            .iter()
            .map(|diagnostic| Report::Script {
                diagnostic,
                source: src,
            })
            .collect(),
        _ => vec![Report::Run(err)],
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Script { diagnostic, .. } => f.write_str(diagnostic.message()),
            Report::Run(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl Error for Report<'_> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Report::Script { .. } => None,
            Report::Run(err) => err.source(),
        }
    }
}

impl MietteDiagnostic for Report<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Report::Script { diagnostic, .. } => diagnostic
                .code()
                .map(|code| Box::new(format!("unfurl::reader::{code}")) as Box<dyn fmt::Display>),
            Report::Run(err) => Some(Box::new(run_code(err))),
        }
    }

    fn severity(&self) -> Option<MietteSeverity> {
        match self {
            Report::Script { diagnostic, .. } => Some(match diagnostic.severity() {
                Severity::Error => MietteSeverity::Error,
                Severity::Warning => MietteSeverity::Warning,
            }),
            Report::Run(_) => Some(MietteSeverity::Error),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Report::Script { diagnostic, .. } => diagnostic
                .help()
                .or_else(|| diagnostic.code().map(|code| code.description()))
                .map(|help| Box::new(help) as Box<dyn fmt::Display>),
            Report::Run(err) => run_help(err).map(|help| Box::new(help) as Box<dyn fmt::Display>),
        }
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        match self {
            Report::Script { source, .. } => Some(source as &dyn SourceCode),
            Report::Run(_) => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let Report::Script { diagnostic, .. } = self else {
            return None;
        };
        if diagnostic.labels().is_empty() {
            return None;
        }

        Some(Box::new(diagnostic.labels().iter().map(|label| {
            let span = (label.span().start(), label.span().len());
            let text = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(text, span)
            } else {
                LabeledSpan::new_with_span(text, span)
            }
        })))
    }
}

fn run_code(err: &UnfurlError) -> &'static str {
    match err {
        UnfurlError::Io(_) => "unfurl::io",
        UnfurlError::EmptyInput => "unfurl::empty_input",
        UnfurlError::NoScenes => "unfurl::no_scenes",
        UnfurlError::Parse { .. } => "unfurl::reader",
        UnfurlError::Store(StoreError::Rejected { .. }) => "unfurl::store::rejected",
        UnfurlError::Store(StoreError::Backend(_)) => "unfurl::store::backend",
        UnfurlError::Layout(_) => "unfurl::layout",
        UnfurlError::InvalidConfig(_) => "unfurl::config",
    }
}

fn run_help(err: &UnfurlError) -> Option<String> {
    let help = match err {
        UnfurlError::Io(_) | UnfurlError::Parse { .. } => return None,
        UnfurlError::EmptyInput => {
            "the input file is empty or only whitespace; check the path".to_string()
        }
        UnfurlError::NoScenes => {
            "scene headings start with INT., EXT., EST., I/E, or a forced `.`".to_string()
        }
        UnfurlError::Store(StoreError::Rejected { operation, .. }) => {
            format!("the timeline keeps whatever was written before {operation} failed")
        }
        UnfurlError::Store(StoreError::Backend(_)) => {
            "timeline files hold only `segments` and `markers`; pick another --output".to_string()
        }
        UnfurlError::Layout(_) => {
            "three tracks are needed from the base track up; use a lower --base-track".to_string()
        }
        UnfurlError::InvalidConfig(_) => {
            "check the [timing], [layout], [render] and [style] tables and the --fps flags"
                .to_string()
        }
    };
    Some(help)
}
