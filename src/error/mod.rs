// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error types of picklejar.
//!
//! - [`config`] - invalid patterns, tag expressions and configuration
//! - [`step`] - failures recorded while executing a scenario
//! - [`scenario`] - the synthetic failure of a whole scenario
//! - [`world`] - world construction failures
//! - [`utilities`] - helpers for failure messages

pub mod config;
pub mod core;
pub mod scenario;
pub mod step;
pub mod utilities;
pub mod world;

pub use self::{
    config::{ConfigError, ConfigResult},
    core::{Error, Result},
    scenario::ScenarioFailure,
    step::{FailureKind, StepFailure},
    world::WorldError,
};
