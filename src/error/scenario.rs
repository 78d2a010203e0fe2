// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Synthetic failure reported once per failed scenario.

use std::fmt;

use derive_more::with_trait::Error;
use itertools::Itertools as _;

use super::StepFailure;

/// Failure of a whole scenario, combining every [`StepFailure`] collected
/// while it ran.
///
/// With a single failure it displays exactly as that failure. With several
/// of them, they are listed most recent first under a summary line.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub struct ScenarioFailure {
    /// Name of the failed scenario.
    #[error(not(source))]
    scenario: String,

    /// Collected failures, in the order they happened.
    failures: Vec<StepFailure>,
}

impl ScenarioFailure {
    /// Creates a new [`ScenarioFailure`] out of the collected `failures`.
    #[must_use]
    pub fn new(scenario: impl Into<String>, failures: Vec<StepFailure>) -> Self {
        Self { scenario: scenario.into(), failures }
    }

    /// Returns the name of the failed scenario.
    #[must_use]
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// Returns the collected failures, in the order they happened.
    #[must_use]
    pub fn failures(&self) -> &[StepFailure] {
        &self.failures
    }
}

impl fmt::Display for ScenarioFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.failures.as_slice() {
            [] => write!(f, "Scenario `{}` failed", self.scenario),
            [single] => write!(f, "{single}"),
            many => write!(
                f,
                "{} errors in scenario `{}`:\n\n{}",
                many.len(),
                self.scenario,
                many.iter().rev().join("\n\n"),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{super::FailureKind, *};

    fn failure(step: &str, line: usize) -> StepFailure {
        StepFailure::new(step, Some(line), FailureKind::Handler, "boom")
    }

    #[test]
    fn single_failure_displays_as_is() {
        let err = ScenarioFailure::new("S", vec![failure("A", 3)]);
        assert_eq!(err.to_string(), "A (#3)\nboom");
    }

    #[test]
    fn lists_most_recent_first() {
        let err =
            ScenarioFailure::new("S", vec![failure("A", 3), failure("B", 4)]);
        let msg = err.to_string();

        assert!(msg.starts_with("2 errors in scenario `S`:"));
        let (a, b) = (msg.find("A (#3)"), msg.find("B (#4)"));
        assert!(b < a, "{msg}");
    }
}
