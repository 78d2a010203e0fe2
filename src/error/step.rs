// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Failures recorded while executing a scenario.

use std::fmt;

use derive_more::with_trait::{Display, Error};

use crate::hook::HookType;

/// Origin of a [`StepFailure`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum FailureKind {
    /// Step handler returned an error or panicked.
    #[display("step")]
    Handler,

    /// No step definition matched.
    #[display("undefined step")]
    Undefined,

    /// Several step definitions matched at the same priority.
    #[display("ambiguous step")]
    Ambiguous,

    /// Hook of the given type failed.
    #[display("{_0} hook")]
    Hook(HookType),
}

/// Single failure, enriched with the text and source line of the step it
/// happened at.
///
/// Displayed as `<step> (#<line>)` followed by the failure message on the
/// next line.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub struct StepFailure {
    /// Text of the step (or the label of the hook) that failed.
    #[error(not(source))]
    step: String,

    /// Source line of the step, if any.
    line: Option<usize>,

    /// Origin of this failure.
    kind: FailureKind,

    /// Human-readable failure message.
    message: String,
}

impl StepFailure {
    /// Creates a new [`StepFailure`].
    #[must_use]
    pub fn new(
        step: impl Into<String>,
        line: Option<usize>,
        kind: FailureKind,
        message: impl Into<String>,
    ) -> Self {
        Self { step: step.into(), line, kind, message: message.into() }
    }

    /// Returns the text of the failed step.
    #[must_use]
    pub fn step(&self) -> &str {
        &self.step
    }

    /// Returns the source line of the failed step.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        self.line
    }

    /// Returns the [`FailureKind`] of this failure.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Returns the bare failure message, without the step header.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Indicates whether this failure can never be soft-failed, as there was
    /// no handler to even attempt.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self.kind, FailureKind::Undefined | FailureKind::Ambiguous)
    }
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} (#{line})", self.step)?,
            None => write!(f, "{}", self.step)?,
        }
        write!(f, "\n{}", self.message)
    }
}
