//! Errors of matching a step text against a [`Collection`].
//!
//! [`Collection`]: super::Collection

use std::fmt;

use derive_more::with_trait::{Display, Error, From};

use super::{location::Location, pattern::Pattern};

/// Error of a step text matching no step definition at all.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub struct UndefinedStep {
    /// Text of the unmatched step.
    #[error(not(source))]
    pub step: String,

    /// Generated registration snippet implementing the step.
    pub snippet: String,
}

impl UndefinedStep {
    /// Creates a new [`UndefinedStep`].
    #[must_use]
    pub fn new(step: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self { step: step.into(), snippet: snippet.into() }
    }
}

impl fmt::Display for UndefinedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Undefined. Implement with the following snippet:\n\n{}",
            self.snippet,
        )
    }
}

/// Error of a step text matching several step definitions at the same
/// (winning) priority.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub struct AmbiguousStep {
    /// Text of the ambiguous step.
    #[error(not(source))]
    pub step: String,

    /// Priority all the candidates tie at.
    pub priority: i32,

    /// Every tied [`Pattern`], along with its registration [`Location`].
    pub candidates: Vec<(Pattern, Location)>,
}

impl fmt::Display for AmbiguousStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Multiple step definitions match `{}` at priority {}:",
            self.step, self.priority,
        )?;
        for (pattern, loc) in &self.candidates {
            writeln!(f, "  - {pattern} --> {loc}")?;
        }
        write!(
            f,
            "Register one of them with a priority above {} to resolve the \
             ambiguity.",
            self.priority,
        )
    }
}

/// Error of [`Collection::find()`].
///
/// [`Collection::find()`]: super::Collection::find
#[derive(Clone, Debug, Display, Error, From)]
pub enum MatchError {
    /// No step definition matched.
    #[display("{_0}")]
    Undefined(UndefinedStep),

    /// Several step definitions matched at the same priority.
    #[display("{_0}")]
    Ambiguous(AmbiguousStep),
}

impl MatchError {
    /// Returns true if no step definition matched.
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined(_))
    }

    /// Returns true if several step definitions matched.
    #[must_use]
    pub const fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous(_))
    }
}
