//! Outcome of a processing pass.

use std::fmt::Write;

use crate::error::Error;
use crate::types::NodeId;

/// What a successful pass produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingResult {
    /// Slides (cover included) that made it into the output.
    pub slides_created: usize,
    /// Per-unit errors, in the order they happened.
    pub errors: Vec<String>,
    /// Frame holding the created slides.
    pub container: Option<NodeId>,
}

impl ProcessingResult {
    /// Status line for the user.
    pub fn message(&self) -> String {
        let n = self.slides_created;
        let mut msg = format!("Created {n} slide{}!", plural(n));
        append_errors(&mut msg, &self.errors);
        msg
    }
}

/// What a manual formatting pass produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatReport {
    /// Frames whose text was formatted.
    pub frames_processed: usize,
    /// Per-frame errors.
    pub errors: Vec<String>,
}

impl FormatReport {
    /// Status line for the user.
    pub fn message(&self) -> String {
        let n = self.frames_processed;
        let mut msg = format!("Processed {n} frame{}", plural(n));
        append_errors(&mut msg, &self.errors);
        msg
    }
}

const fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

fn append_errors(msg: &mut String, errors: &[String]) {
    if !errors.is_empty() {
        let n = errors.len();
        let _ = write!(msg, " {n} error{}: {}", plural(n), errors.join("; "));
    }
}

/// Message recorded for a failed unit.
///
/// Validation messages already name their unit.
pub fn describe(unit: &str, error: &Error) -> String {
    match error {
        Error::Validation(msg) => msg.clone(),
        other => format!("{unit}: {other}"),
    }
}
