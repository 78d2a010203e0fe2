//! Source locations of step definitions and hooks.
//!
//! Filled in through `#[track_caller]` on the registration methods, so an
//! ambiguity report can point at the exact registering line.

use std::panic;

use derive_more::with_trait::{Debug, Display};

/// Location of a registration call.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("{path}:{line}:{column}")]
pub struct Location {
    /// Path to the file the registration happened in.
    pub path: &'static str,

    /// Line of the registration.
    pub line: u32,

    /// Column of the registration.
    pub column: u32,
}

impl Location {
    /// Creates a new [`Location`].
    #[must_use]
    pub const fn new(path: &'static str, line: u32, column: u32) -> Self {
        Self { path, line, column }
    }

    /// Returns the [`Location`] of the caller of the invoking
    /// `#[track_caller]` function.
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        let loc = panic::Location::caller();
        Self::new(loc.file(), loc.line(), loc.column())
    }
}
