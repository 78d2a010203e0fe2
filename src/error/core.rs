// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Top-level error of the crate.

use std::io;

use derive_more::{Display, Error, From};

use crate::{
    parser,
    step::error::{AmbiguousStep, MatchError, UndefinedStep},
};

use super::{ConfigError, ScenarioFailure, WorldError};

/// Top-level error type for all picklejar operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Invalid step pattern, tag expression or configuration.
    #[display("Configuration error: {_0}")]
    Config(ConfigError),

    /// Feature files cannot be read or parsed.
    #[display("{_0}")]
    Parse(parser::Error),

    /// Step text matches no step definition.
    #[display("{_0}")]
    Undefined(UndefinedStep),

    /// Step text matches several step definitions at the same priority.
    #[display("{_0}")]
    Ambiguous(AmbiguousStep),

    /// World cannot be constructed.
    #[display("{_0}")]
    World(WorldError),

    /// Scenario failed.
    #[display("{_0}")]
    Scenario(ScenarioFailure),

    /// I/O operation failed.
    #[display("I/O operation failed: {_0}")]
    Io(io::Error),
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl From<MatchError> for Error {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::Undefined(e) => Self::Undefined(e),
            MatchError::Ambiguous(e) => Self::Ambiguous(e),
        }
    }
}

impl Error {
    /// Returns the [`ScenarioFailure`] if this is a failed scenario.
    #[must_use]
    pub const fn as_scenario_failure(&self) -> Option<&ScenarioFailure> {
        if let Self::Scenario(failure) = self {
            Some(failure)
        } else {
            None
        }
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn wraps_errors_with_their_source() {
        let err = Error::from(ConfigError::invalid_config("nope"));
        assert!(err.is_config());
        assert_eq!(err.to_string(), "Configuration error: Invalid configuration: nope");
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("Invalid configuration: nope"),
        );

        let res: Result<()> = Err(parser::Error::from(io::Error::other("gone")).into());
        let err = res.unwrap_err();
        assert!(!err.is_config());
        assert_eq!(err.to_string(), "Failed to access input: gone");
        assert!(err.as_scenario_failure().is_none());
    }
}
