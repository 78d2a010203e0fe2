// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Injectable registry of step definitions and hooks.
//!
//! Every [`Registry`] is an isolated instance: tests may build as many of them
//! as they like, while generated code wires a single one per Feature.

use derive_more::with_trait::Debug;
use gherkin::StepType;

use crate::{
    error::ConfigError,
    hook::{self, FeatureHookFn, Hook, HookOptions, Hooks, ScenarioHookFn},
    step::{Collection, Location, Match, MatchError, Pattern, StepData, StepFn},
};

/// Registry of step definitions and hooks.
///
/// Built by value, every registration compiling its pattern right away:
///
/// ```rust
/// # use futures::future::LocalBoxFuture;
/// # use picklejar::{step::Context, JsonWorld, Registry, State};
/// #
/// fn have(state: &mut State<JsonWorld>, ctx: Context) -> LocalBoxFuture<'_, anyhow::Result<()>> {
///     Box::pin(async move {
///         let n: u32 = ctx.parse(0)?;
///         state.data.insert("cucumbers".into(), n.into());
///         Ok(())
///     })
/// }
///
/// # fn main() -> Result<(), picklejar::error::ConfigError> {
/// let registry = Registry::<JsonWorld>::new().given("I have {int} cucumbers", have)?;
/// assert_eq!(registry.steps().len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Registry<W> {
    /// Step definitions.
    steps: Collection<W>,

    /// Hooks of every phase.
    hooks: Hooks<W>,
}

// Implemented manually to omit redundant `W: Default` trait bound, imposed by
// `#[derive(Default)]`.
impl<W> Default for Registry<W> {
    fn default() -> Self {
        Self { steps: Collection::new(), hooks: Hooks::default() }
    }
}

impl<W> Registry<W> {
    /// Creates a new empty [`Registry`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a [Given] step.
    ///
    /// # Errors
    ///
    /// If the `pattern` doesn't compile.
    ///
    /// [Given]: https://cucumber.io/docs/gherkin/reference#given
    #[track_caller]
    pub fn given(
        self,
        pattern: impl Into<Pattern>,
        handler: StepFn<W>,
    ) -> Result<Self, ConfigError> {
        let loc = Location::caller();
        self.register(StepType::Given, pattern.into(), 0, handler, loc)
    }

    /// Registers a [When] step.
    ///
    /// # Errors
    ///
    /// If the `pattern` doesn't compile.
    ///
    /// [When]: https://cucumber.io/docs/gherkin/reference#when
    #[track_caller]
    pub fn when(
        self,
        pattern: impl Into<Pattern>,
        handler: StepFn<W>,
    ) -> Result<Self, ConfigError> {
        let loc = Location::caller();
        self.register(StepType::When, pattern.into(), 0, handler, loc)
    }

    /// Registers a [Then] step.
    ///
    /// # Errors
    ///
    /// If the `pattern` doesn't compile.
    ///
    /// [Then]: https://cucumber.io/docs/gherkin/reference#then
    #[track_caller]
    pub fn then(
        self,
        pattern: impl Into<Pattern>,
        handler: StepFn<W>,
    ) -> Result<Self, ConfigError> {
        let loc = Location::caller();
        self.register(StepType::Then, pattern.into(), 0, handler, loc)
    }

    /// Registers a step with an explicit `priority`.
    ///
    /// # Errors
    ///
    /// If the `pattern` doesn't compile.
    #[track_caller]
    pub fn step_with_priority(
        self,
        keyword: StepType,
        pattern: impl Into<Pattern>,
        priority: i32,
        handler: StepFn<W>,
    ) -> Result<Self, ConfigError> {
        let loc = Location::caller();
        self.register(keyword, pattern.into(), priority, handler, loc)
    }

    fn register(
        mut self,
        keyword: StepType,
        pattern: Pattern,
        priority: i32,
        handler: StepFn<W>,
        loc: Location,
    ) -> Result<Self, ConfigError> {
        self.steps.add(keyword, pattern, priority, handler, loc)?;
        Ok(self)
    }

    /// Defines a custom parameter type for expressions registered afterwards.
    ///
    /// # Errors
    ///
    /// If the parameter type is malformed or already defined.
    pub fn define_parameter(
        mut self,
        name: impl Into<String>,
        regex: &'static str,
    ) -> Result<Self, ConfigError> {
        self.steps.define_parameter(name, regex)?;
        Ok(self)
    }

    /// Registers a before-all hook with default options.
    #[must_use]
    #[track_caller]
    pub fn before_all(self, handler: FeatureHookFn) -> Self {
        self.before_all_with(HookOptions::new(), handler)
    }

    /// Registers a before-all hook.
    #[must_use]
    #[track_caller]
    pub fn before_all_with(mut self, options: HookOptions, handler: FeatureHookFn) -> Self {
        hook::insert(&mut self.hooks.before_all, new_hook(options, handler));
        self
    }

    /// Registers a before-scenario hook with default options.
    #[must_use]
    #[track_caller]
    pub fn before(self, handler: ScenarioHookFn<W>) -> Self {
        self.before_with(HookOptions::new(), handler)
    }

    /// Registers a before-scenario hook.
    #[must_use]
    #[track_caller]
    pub fn before_with(mut self, options: HookOptions, handler: ScenarioHookFn<W>) -> Self {
        hook::insert(&mut self.hooks.before, new_hook(options, handler));
        self
    }

    /// Registers a before-step hook with default options.
    #[must_use]
    #[track_caller]
    pub fn before_step(self, handler: ScenarioHookFn<W>) -> Self {
        self.before_step_with(HookOptions::new(), handler)
    }

    /// Registers a before-step hook.
    #[must_use]
    #[track_caller]
    pub fn before_step_with(
        mut self,
        options: HookOptions,
        handler: ScenarioHookFn<W>,
    ) -> Self {
        hook::insert(&mut self.hooks.before_step, new_hook(options, handler));
        self
    }

    /// Registers an after-step hook with default options.
    #[must_use]
    #[track_caller]
    pub fn after_step(self, handler: ScenarioHookFn<W>) -> Self {
        self.after_step_with(HookOptions::new(), handler)
    }

    /// Registers an after-step hook.
    #[must_use]
    #[track_caller]
    pub fn after_step_with(
        mut self,
        options: HookOptions,
        handler: ScenarioHookFn<W>,
    ) -> Self {
        hook::insert(&mut self.hooks.after_step, new_hook(options, handler));
        self
    }

    /// Registers an after-scenario hook with default options.
    #[must_use]
    #[track_caller]
    pub fn after(self, handler: ScenarioHookFn<W>) -> Self {
        self.after_with(HookOptions::new(), handler)
    }

    /// Registers an after-scenario hook.
    #[must_use]
    #[track_caller]
    pub fn after_with(mut self, options: HookOptions, handler: ScenarioHookFn<W>) -> Self {
        hook::insert(&mut self.hooks.after, new_hook(options, handler));
        self
    }

    /// Registers an after-all hook with default options.
    #[must_use]
    #[track_caller]
    pub fn after_all(self, handler: FeatureHookFn) -> Self {
        self.after_all_with(HookOptions::new(), handler)
    }

    /// Registers an after-all hook.
    #[must_use]
    #[track_caller]
    pub fn after_all_with(mut self, options: HookOptions, handler: FeatureHookFn) -> Self {
        hook::insert(&mut self.hooks.after_all, new_hook(options, handler));
        self
    }

    /// Returns the registered step definitions.
    #[must_use]
    pub const fn steps(&self) -> &Collection<W> {
        &self.steps
    }

    /// Returns the registered hooks.
    #[must_use]
    pub const fn hooks(&self) -> &Hooks<W> {
        &self.hooks
    }

    /// Matches the given step `text` against the registered definitions.
    ///
    /// Pure function of the registry state and its input.
    ///
    /// # Errors
    ///
    /// If the step is undefined or ambiguous.
    pub fn find_match(
        &self,
        step_type: StepType,
        text: &str,
        data: Option<&StepData>,
    ) -> Result<Match<'_, W>, MatchError> {
        self.steps.find(step_type, text, data)
    }
}

#[track_caller]
fn new_hook<F>(options: HookOptions, handler: F) -> Hook<F> {
    Hook { options, handler, location: Location::caller() }
}
