// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Items referenced by the code [`render`]ed out of Feature files.
//!
//! Generated modules import everything they need from here, so they only
//! depend on this crate being reachable at the configured runtime path.
//!
//! [`render`]: crate::render

#[doc(no_inline)]
pub use std::sync::Arc;

#[doc(no_inline)]
pub use gherkin::StepType;
#[doc(no_inline)]
pub use once_cell::sync::Lazy;

#[doc(no_inline)]
pub use crate::{
    error::{ConfigError, Error},
    runner::{FeatureRun, State},
    step::StepData,
    world::JsonWorld,
};

/// Fails the current test with the message of the given scenario `result`.
///
/// # Panics
///
/// If the `result` is an [`Error`].
#[track_caller]
pub fn fail_on_error(result: Result<(), Error>) {
    if let Err(e) = result {
        panic!("{e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_on_ok() {
        fail_on_error(Ok(()));
    }

    #[test]
    #[should_panic(expected = "Configuration error: Invalid configuration: nope")]
    fn panics_with_the_error_message() {
        fail_on_error(Err(ConfigError::invalid_config("nope").into()));
    }
}
