// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `picklejar` binary: renders Feature files into Rust test code.

use std::{fs, process::ExitCode};

use picklejar::{
    cli::Opts,
    feature::Ext as _,
    parser::{self, Parser as _},
    render, Config, Result,
};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let opts = Opts::parsed();

    let filter = EnvFilter::builder()
        .with_default_directive(opts.level().into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(opts: &Opts) -> Result<()> {
    let config = match &opts.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };

    let mut features = parser::Basic
        .parse(&opts.input)
        .collect::<parser::Result<Vec<_>>>()?;
    if let Some(filter) = &opts.tags_filter {
        features = features
            .into_iter()
            .map(|f| f.filter_scenarios(filter))
            .collect();
    }
    tracing::info!(features = features.len(), input = %opts.input.display(), "parsed");

    let code = render::render_features(&features, &config)?;
    match &opts.out {
        Some(path) => {
            fs::write(path, code)?;
            tracing::info!(out = %path.display(), "written");
        }
        None => print!("{code}"),
    }
    Ok(())
}
