// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! World construction and the information threaded through a scenario.

use std::{
    convert::Infallible,
    fmt::Display,
    future::Future,
    sync::{Arc, Mutex, PoisonError},
};

use itertools::Itertools as _;
use serde_json::{Map, Value};

use crate::{error::StepFailure, tag::Tag};

/// User-defined per-scenario data, stored as [`State::data`].
///
/// A fresh instance is constructed right before the before-scenario hooks of
/// every scenario (or exploded variant) run.
///
/// [`State::data`]: crate::State::data
pub trait World: Sized + 'static {
    /// Error of creating a new [`World`] instance.
    type Error: Display;

    /// Creates a new [`World`] instance out of the configured `world_config`.
    fn new(config: &Value) -> impl Future<Output = Result<Self, Self::Error>>;
}

/// Schemaless [`World`] backed by a JSON object.
pub type JsonWorld = Map<String, Value>;

impl World for JsonWorld {
    type Error = Infallible;

    async fn new(_: &Value) -> Result<Self, Self::Error> {
        Ok(Map::new())
    }
}

/// Information about the running scenario.
#[derive(Clone, Debug, Default)]
pub struct Info {
    /// Name of the Feature.
    pub feature: String,

    /// Name of the Rule the scenario is nested in, if any.
    pub rule: Option<String>,

    /// Name of the scenario.
    pub scenario: String,

    /// Effective tags of the scenario (or of its exploded variant).
    pub tags: Vec<Tag>,

    /// Texts of the scenario's own steps, background ones excluded.
    pub steps: Vec<String>,

    /// Text of the current step.
    pub step: Option<String>,

    /// Source line of the current step.
    pub line: Option<usize>,

    /// Index of the current step: `1..` for the scenario's own steps, `..=-1`
    /// for background ones, `0` before any step ran.
    ///
    /// Rule background steps continue after the Feature background ones, so
    /// `-1` is always the first Feature background step if there is one.
    pub step_index: i64,

    /// 1-based index of the exploded variant, if the scenario got exploded
    /// into several ones.
    pub explode_index: Option<usize>,

    /// Failures collected so far.
    ///
    /// Only grows while steps run. Hooks may inspect and clear it.
    pub errors: Vec<StepFailure>,
}

impl Info {
    /// Indicates whether the last step of the scenario has been reached.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        usize::try_from(self.step_index).is_ok_and(|i| i == self.steps.len())
    }

    /// Indicates whether the current step belongs to a background.
    #[must_use]
    pub const fn is_background(&self) -> bool {
        self.step_index < 0
    }

    /// Returns a filename-safe stem unique per scenario variant, for
    /// collaborators writing files (screenshots, logs, etc.).
    #[must_use]
    pub fn artifact_stem(&self) -> String {
        let mut stem = sanitize(
            &[Some(self.feature.as_str()), self.rule.as_deref(), Some(self.scenario.as_str())]
                .into_iter()
                .flatten()
                .filter(|s| !s.is_empty())
                .join("__"),
        );
        if self.explode_index.is_some() {
            let tags = self.tags.iter().map(Tag::name).join(",");
            stem.push_str(&format!("_({})", sanitize(&tags)));
        }
        stem
    }
}

/// Replaces every run of characters unsafe in file names with a single `_`.
fn sanitize(raw: &str) -> String {
    raw.split(|c: char| !(c.is_alphanumeric() || matches!(c, '-' | '_' | ',' | '.')))
        .filter(|s| !s.is_empty())
        .join("_")
}

/// JSON key/value map shared by every scenario of one Feature.
///
/// Meant for the rare state that must outlive a scenario. Scenarios of the
/// same Feature running in parallel may race on it: every access is atomic,
/// but nothing orders accesses across scenarios.
#[derive(Clone, Debug, Default)]
pub struct Common(Arc<Mutex<Map<String, Value>>>);

impl Common {
    /// Creates a new empty [`Common`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the value stored under the `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.with(|map| map.get(key).cloned())
    }

    /// Stores the `value` under the `key`, returning the previous one.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.with(|map| map.insert(key.into(), value.into()))
    }

    /// Removes the value stored under the `key`.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.with(|map| map.remove(key))
    }

    /// Runs `f` with exclusive access to the whole map.
    pub fn with<R>(&self, f: impl FnOnce(&mut Map<String, Value>) -> R) -> R {
        let mut map = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut map)
    }
}
