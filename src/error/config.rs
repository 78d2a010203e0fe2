// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration errors.
//!
//! All of them are raised eagerly: while registering steps and hooks, or
//! while loading a [`Config`], never deferred to match time.
//!
//! [`Config`]: crate::Config

use derive_more::with_trait::{Display, Error};

/// Error of an invalid step pattern, tag expression or configuration.
#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Step pattern failed to compile.
    #[display("Invalid step pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// Source of the pattern.
        #[error(not(source))]
        pattern: String,

        /// Why compilation failed.
        reason: String,
    },

    /// Tag expression failed to parse.
    #[display("Invalid tag expression `{expression}`: {reason}")]
    InvalidTagExpression {
        /// Source of the expression.
        #[error(not(source))]
        expression: String,

        /// Why parsing failed.
        reason: String,
    },

    /// Custom parameter type is malformed or defined twice.
    #[display("Invalid parameter type `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the parameter type.
        #[error(not(source))]
        name: String,

        /// What's wrong with it.
        reason: String,
    },

    /// Configuration document cannot be loaded.
    #[display("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Why loading failed.
        #[error(not(source))]
        reason: String,
    },
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// Creates a new [`ConfigError::InvalidPattern`].
    #[must_use]
    pub fn invalid_pattern(
        pattern: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidPattern { pattern: pattern.into(), reason: reason.into() }
    }

    /// Creates a new [`ConfigError::InvalidTagExpression`].
    #[must_use]
    pub fn invalid_tag_expression(
        expression: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidTagExpression {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new [`ConfigError::InvalidParameter`].
    #[must_use]
    pub fn invalid_parameter(
        name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter { name: name.into(), reason: reason.into() }
    }

    /// Creates a new [`ConfigError::InvalidConfig`].
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig { reason: reason.into() }
    }

    /// Returns true if this is an invalid pattern error.
    #[must_use]
    pub fn is_invalid_pattern(&self) -> bool {
        matches!(self, Self::InvalidPattern { .. })
    }

    /// Returns true if this is an invalid tag expression error.
    #[must_use]
    pub fn is_invalid_tag_expression(&self) -> bool {
        matches!(self, Self::InvalidTagExpression { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_offending_source() {
        let err = ConfigError::invalid_pattern("I have {int", "unclosed");
        assert_eq!(
            err.to_string(),
            "Invalid step pattern `I have {int`: unclosed",
        );
        assert!(err.is_invalid_pattern());
        assert!(!err.is_invalid_tag_expression());

        let err = ConfigError::invalid_tag_expression("@a and", "eof");
        assert!(err.to_string().contains("`@a and`"));
        assert!(err.is_invalid_tag_expression());
    }
}
