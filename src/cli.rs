// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Command line interface of the `picklejar` binary.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use tracing_subscriber::filter::LevelFilter;

use crate::tag::TagExpr;

/// Renders Gherkin Feature files into Rust test code.
#[derive(Clone, Debug, Parser)]
#[command(name = "picklejar", version, about)]
pub struct Opts {
    /// `.feature` file, or directory to search for them recursively.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// File to write the generated code into, instead of stdout.
    #[arg(long, short, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// JSON configuration file.
    #[arg(long, short, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Tag expression to filter scenarios by.
    ///
    /// Note: Tags from Feature, Rule and Scenario are merged together on
    /// filtering, so be careful about conflicting tags on different levels.
    #[arg(id = "tags", long = "tags", short = 't', value_name = "tagexpr")]
    pub tags_filter: Option<TagExpr>,

    /// Increases logging verbosity, may be repeated.
    ///
    /// Ignored if `RUST_LOG` is set.
    #[arg(long, short, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Opts {
    /// Shortcut for [`clap::Parser::parse()`], which doesn't require the trait
    /// being imported.
    #[must_use]
    pub fn parsed() -> Self {
        <Self as Parser>::parse()
    }

    /// Returns the default logging level for the requested verbosity.
    #[must_use]
    pub const fn level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}
