// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Setup and teardown hooks.
//!
//! Hooks are grouped into six phases ([`HookType`]). Within a phase they run
//! in ascending weight, equal weights keeping registration order, and only
//! if their tag expression (if any) matches the active tags.

use derive_more::with_trait::{Debug, Display};
use futures::future::LocalBoxFuture;

use crate::{
    error::ConfigError,
    step::Location,
    tag::{Tag, TagExpr},
    Common, State,
};

/// Phase a [`Hook`] runs in.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum HookType {
    /// Once per Feature, before its first scenario.
    #[display("before-all")]
    BeforeAll,

    /// Before every scenario.
    #[display("before-scenario")]
    Before,

    /// Before every step.
    #[display("before-step")]
    BeforeStep,

    /// After every step, even a failed one.
    #[display("after-step")]
    AfterStep,

    /// Exactly once after every scenario.
    #[display("after-scenario")]
    After,

    /// Once per Feature, after its last scenario.
    #[display("after-all")]
    AfterAll,
}

/// Alias for a before-all/after-all hook function.
pub type FeatureHookFn =
    for<'a> fn(&'a Common) -> LocalBoxFuture<'a, anyhow::Result<()>>;

/// Alias for a scenario or step hook function.
pub type ScenarioHookFn<W> =
    for<'a> fn(&'a mut State<W>) -> LocalBoxFuture<'a, anyhow::Result<()>>;

/// Options of a [`Hook`].
#[derive(Clone, Debug, Default)]
pub struct HookOptions {
    /// Name used in failure messages.
    pub name: Option<String>,

    /// Tag expression gating the hook.
    pub tags: Option<TagExpr>,

    /// Weight ordering the hook within its phase, lower runs first.
    pub weight: i32,
}

impl HookOptions {
    /// Creates default [`HookOptions`]: unnamed, ungated, zero weight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name of the hook.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Gates the hook with the given tag `expression`.
    ///
    /// # Errors
    ///
    /// If the `expression` is malformed.
    pub fn tags(mut self, expression: &str) -> Result<Self, ConfigError> {
        self.tags = TagExpr::parse(expression)?;
        Ok(self)
    }

    /// Sets the weight of the hook.
    #[must_use]
    pub const fn weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }
}

/// Registered hook.
#[derive(Clone, Debug)]
pub struct Hook<F> {
    /// Options the hook was registered with.
    pub options: HookOptions,

    /// Hook function.
    #[debug("{handler:p}")]
    pub handler: F,

    /// Where the hook was registered.
    pub location: Location,
}

impl<F> Hook<F> {
    /// Indicates whether this [`Hook`] fires for the given `tags`.
    #[must_use]
    pub fn applies_to(&self, tags: &[Tag]) -> bool {
        self.options.tags.as_ref().map_or(true, |expr| expr.eval(tags))
    }

    /// Returns a label identifying this [`Hook`] in failure messages.
    #[must_use]
    pub fn label(&self, ty: HookType) -> String {
        match &self.options.name {
            Some(name) => format!("{ty} hook `{name}`"),
            None => format!("{ty} hook at {}", self.location),
        }
    }
}

/// Hooks of every phase, each phase kept ordered by weight.
#[derive(Debug)]
pub struct Hooks<W> {
    /// [`HookType::BeforeAll`] hooks.
    pub before_all: Vec<Hook<FeatureHookFn>>,

    /// [`HookType::Before`] hooks.
    pub before: Vec<Hook<ScenarioHookFn<W>>>,

    /// [`HookType::BeforeStep`] hooks.
    pub before_step: Vec<Hook<ScenarioHookFn<W>>>,

    /// [`HookType::AfterStep`] hooks.
    pub after_step: Vec<Hook<ScenarioHookFn<W>>>,

    /// [`HookType::After`] hooks.
    pub after: Vec<Hook<ScenarioHookFn<W>>>,

    /// [`HookType::AfterAll`] hooks.
    pub after_all: Vec<Hook<FeatureHookFn>>,
}

// Implemented manually to omit redundant `W: Default` trait bound, imposed by
// `#[derive(Default)]`.
impl<W> Default for Hooks<W> {
    fn default() -> Self {
        Self {
            before_all: Vec::new(),
            before: Vec::new(),
            before_step: Vec::new(),
            after_step: Vec::new(),
            after: Vec::new(),
            after_all: Vec::new(),
        }
    }
}

impl<W> Hooks<W> {
    /// Returns the scenario-level hooks of the given phase.
    ///
    /// Feature-level phases have no scenario-level hooks.
    #[must_use]
    pub fn scenario_phase(&self, ty: HookType) -> &[Hook<ScenarioHookFn<W>>] {
        match ty {
            HookType::Before => &self.before,
            HookType::BeforeStep => &self.before_step,
            HookType::AfterStep => &self.after_step,
            HookType::After => &self.after,
            HookType::BeforeAll | HookType::AfterAll => &[],
        }
    }

    /// Returns the feature-level hooks of the given phase.
    ///
    /// Scenario-level phases have no feature-level hooks.
    #[must_use]
    pub fn feature_phase(&self, ty: HookType) -> &[Hook<FeatureHookFn>] {
        match ty {
            HookType::BeforeAll => &self.before_all,
            HookType::AfterAll => &self.after_all,
            _ => &[],
        }
    }
}

/// Inserts the `hook` keeping `phase` sorted by weight, after any hooks of
/// equal weight.
pub(crate) fn insert<F>(phase: &mut Vec<Hook<F>>, hook: Hook<F>) {
    let at = phase.partition_point(|h| h.options.weight <= hook.options.weight);
    phase.insert(at, hook);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hook(name: &str, weight: i32) -> Hook<()> {
        Hook {
            options: HookOptions::new().named(name).weight(weight),
            handler: (),
            location: Location::new("hooks.rs", 1, 1),
        }
    }

    fn names(phase: &[Hook<()>]) -> Vec<&str> {
        phase.iter().filter_map(|h| h.options.name.as_deref()).collect()
    }

    #[test]
    fn keeps_weight_order_stable() {
        let mut phase = Vec::new();
        for (name, weight) in [("a", 0), ("b", -5), ("c", 0), ("d", 10), ("e", -5)] {
            insert(&mut phase, hook(name, weight));
        }
        assert_eq!(names(&phase), ["b", "e", "a", "c", "d"]);
    }

    #[test]
    fn gates_by_tag_expression() {
        let mut h = hook("db", 0);
        assert!(h.applies_to(&[]));

        h.options = HookOptions::new().tags("@db and not @nodb").unwrap();
        assert!(h.applies_to(&crate::tag::normalize(["@db"])));
        assert!(!h.applies_to(&crate::tag::normalize(["@db, @nodb"])));
        assert!(!h.applies_to(&[]));

        assert!(HookOptions::new().tags("@db and").is_err());
    }

    #[test]
    fn labels_by_name_or_location() {
        assert_eq!(hook("db", 0).label(HookType::Before), "before-scenario hook `db`");

        let mut h = hook("x", 0);
        h.options.name = None;
        assert_eq!(h.label(HookType::AfterStep), "after-step hook at hooks.rs:1:1");
    }
}
