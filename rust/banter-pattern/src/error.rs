//! Compile-time errors for authored patterns.
//!
//! Every variant names the offending pattern's declared identifier so the
//! configuring layer can report which authored template is broken. There is
//! deliberately no match-time error type: "no match here" is an ordinary
//! outcome, represented as data in the match result.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("pattern '{id}' is empty")]
    EmptyPattern { id: String },

    #[error("pattern '{id}': bracket element '{unit}' is missing its closing ']'")]
    UnterminatedBracket { id: String, unit: String },

    #[error("pattern '{id}': category element '{unit}' has no name")]
    EmptyCategory { id: String, unit: String },

    #[error("pattern '{id}': variable element '{unit}' has no name")]
    EmptyVariable { id: String, unit: String },

    #[error("pattern '{id}': capture in '{unit}' has no name")]
    EmptyCapture { id: String, unit: String },

    #[error("pattern '{id}': style pair '{pair}' has no '='")]
    MalformedStyle { id: String, pair: String },

    #[error("pattern '{id}': adjacent unbounded elements have no deterministic resolution")]
    AdjacentUnbounded { id: String },
}

impl CompileError {
    /// The identifier of the pattern that failed to compile.
    pub fn pattern_id(&self) -> &str {
        match self {
            CompileError::EmptyPattern { id }
            | CompileError::UnterminatedBracket { id, .. }
            | CompileError::EmptyCategory { id, .. }
            | CompileError::EmptyVariable { id, .. }
            | CompileError::EmptyCapture { id, .. }
            | CompileError::MalformedStyle { id, .. }
            | CompileError::AdjacentUnbounded { id } => id,
        }
    }
}
