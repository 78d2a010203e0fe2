// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! World construction errors.

use derive_more::with_trait::{Display, Error};

/// Error of constructing a [`World`] for a scenario.
///
/// [`World`]: crate::World
#[derive(Clone, Debug, Display, Error, Eq, PartialEq)]
#[display("Failed to construct world for `{scenario}`: {message}")]
pub struct WorldError {
    /// Scenario the world was constructed for.
    #[error(not(source))]
    pub scenario: String,

    /// Error message returned by the construction hook.
    pub message: String,
}

impl WorldError {
    /// Creates a new [`WorldError`].
    #[must_use]
    pub fn new(scenario: impl Into<String>, message: impl Into<String>) -> Self {
        Self { scenario: scenario.into(), message: message.into() }
    }
}
