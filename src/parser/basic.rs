// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Default [`Parser`] implementation.

use std::{path::Path, vec};

use super::{Error, Parser, Result};

/// Default [`Parser`].
///
/// Parses a single `.feature` file, or every `.feature` file found in a
/// directory recursively (case-insensitive extension), ordered by path.
#[derive(Clone, Copy, Debug)]
pub struct Basic;

impl<I: AsRef<Path>> Parser<I> for Basic {
    type Output = vec::IntoIter<Result<gherkin::Feature>>;

    fn parse(self, path: I) -> Self::Output {
        let features = match path.as_ref().canonicalize() {
            Ok(path) if path.is_file() => vec![parse_file(&path)],
            Ok(path) => match feature_files(&path) {
                Ok(files) => files.iter().map(|p| parse_file(p)).collect(),
                Err(e) => vec![Err(e)],
            },
            Err(e) => vec![Err(e.into())],
        };
        features.into_iter()
    }
}

fn parse_file(path: &Path) -> Result<gherkin::Feature> {
    let env = gherkin::GherkinEnv::default();
    let feature = gherkin::Feature::parse_path(path, env)?;
    tracing::debug!(path = %path.display(), feature = %feature.name, "parsed feature");
    Ok(feature)
}

/// Collects the `.feature` files under the `dir`, sorted by path.
fn feature_files(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    let walk_err = |reason: String| Error::Walk { path: dir.to_owned(), reason };

    let walker = globwalk::GlobWalkerBuilder::new(dir, "*.feature")
        .case_insensitive(true)
        .build()
        .map_err(|e| walk_err(e.to_string()))?;
    let mut files = walker
        .map(|entry| entry.map(|e| e.into_path()).map_err(|e| walk_err(e.to_string())))
        .collect::<Result<Vec<_>>>()?;
    files.sort();
    Ok(files)
}
