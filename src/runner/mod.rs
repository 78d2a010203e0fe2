// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Runtime executing generated scenarios.
//!
//! Generated code obtains one [`FeatureRun`] per Feature, starts a [`State`]
//! per scenario (or exploded variant), feeds it every step in source order
//! through [`State::execute_step()`] and ends with [`State::finish()`].
//!
//! Within a scenario, steps and hooks are awaited strictly one after
//! another. Different scenarios run concurrently only if the host test
//! runner decides so.

pub mod feature;
mod hooks;
pub mod scenario;

#[doc(inline)]
pub use self::{feature::FeatureRun, scenario::State};
