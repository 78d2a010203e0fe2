// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Compiles [Gherkin] Feature files into Rust test code, and drives the
//! scenario lifecycle of that code at run time.
//!
//! At build time, the [`render`]er turns every Scenario (per Examples row and
//! per exploded tag variant) into an `async` test function, whose attributes
//! reflect the scenario's tags (see [`render::Modifiers`]).
//!
//! At run time, generated tests drive a [`State`] through its steps, each of
//! them matched against a [`Registry`] of step definitions and wrapped with
//! its hooks. Scenarios tagged for soft failure collect step failures and
//! report them all at once.
//!
//! [Gherkin]: https://cucumber.io/docs/gherkin/reference

pub mod cli;
pub mod codegen;
pub mod config;
pub mod data_table;
pub mod doc_string;
pub mod error;
pub mod feature;
pub mod hook;
pub mod parser;
pub mod registry;
pub mod render;
pub mod runner;
pub mod step;
pub mod tag;
pub mod world;

pub use gherkin::{self, StepType};

#[doc(inline)]
pub use self::{
    config::Config,
    data_table::DataTable,
    doc_string::DocString,
    error::{Error, Result},
    hook::HookOptions,
    parser::Parser,
    registry::Registry,
    runner::{FeatureRun, State},
    step::Context,
    tag::Tag,
    world::{Common, Info, JsonWorld, World},
};
