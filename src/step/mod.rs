// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Step definitions: patterns, storage, matching and handler context.
//!
//! - [`pattern`]: step patterns compiled into matchers
//! - [`collection`]: priority-aware storage and matching of definitions
//! - [`context`]: what a handler gets to see
//! - [`error`]: undefined and ambiguous step errors
//! - [`snippet`]: registration snippets for undefined steps
//! - [`location`]: where definitions were registered

pub mod collection;
pub mod context;
pub mod error;
pub mod location;
pub mod pattern;
pub mod snippet;

use futures::future::LocalBoxFuture;

use crate::State;

pub use self::{
    collection::{Collection, Definition, Match},
    context::{Context, StepData},
    error::{AmbiguousStep, MatchError, UndefinedStep},
    location::Location,
    pattern::{Param, ParamKind, ParameterType, Pattern},
};

/// Alias for a step handler function returning a [`LocalBoxFuture`].
pub type StepFn<W> = for<'a> fn(
    &'a mut State<W>,
    Context,
) -> LocalBoxFuture<'a, anyhow::Result<()>>;
