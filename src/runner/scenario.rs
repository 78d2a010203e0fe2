// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-scenario state machine driving hooks, steps and failures.

use std::sync::Arc;

use gherkin::StepType;
use tracing::Instrument as _;

use crate::{
    config::Config,
    error::{Error, FailureKind, Result, ScenarioFailure, StepFailure, WorldError},
    hook::HookType,
    step::{MatchError, StepData},
    tag, Common, Info, World,
};

use super::{feature::FeatureRun, hooks};

/// Lifecycle phase of a [`State`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Phase {
    /// Steps are being executed.
    Running,

    /// After-scenario hooks ran, nothing executes anymore.
    Complete,
}

/// State of a single scenario execution (or of a single exploded variant of
/// it), handed to every hook and step handler.
pub struct State<W> {
    /// Information about the running scenario.
    pub info: Info,

    /// Key/value map shared by every scenario of the Feature.
    pub common: Common,

    /// Data scoped to this scenario only.
    pub data: W,

    /// Feature this scenario belongs to.
    feature: Arc<FeatureRun<W>>,

    /// Current lifecycle phase.
    phase: Phase,
}

impl<W> State<W> {
    /// Starts a new scenario: runs the Feature's before-all hooks if needed,
    /// constructs the [`World`] and runs the before-scenario hooks.
    ///
    /// `steps` are the texts of the scenario's own steps, background ones
    /// excluded.
    ///
    /// # Errors
    ///
    /// - [`Error::World`] if the [`World`] cannot be constructed.
    /// - [`Error::Scenario`] if a before-all or before-scenario hook fails.
    ///   Failed before-scenario hooks still get the after-scenario hooks run.
    pub async fn start(
        feature: Arc<FeatureRun<W>>,
        rule: Option<&str>,
        scenario: &str,
        tags: &[&str],
        steps: Vec<String>,
        explode_index: Option<usize>,
    ) -> Result<Self>
    where
        W: World,
    {
        let info = Info {
            feature: feature.name().to_owned(),
            rule: rule.map(ToOwned::to_owned),
            scenario: scenario.to_owned(),
            tags: tag::normalize(tags),
            steps,
            explode_index,
            ..Info::default()
        };
        tracing::info!(
            feature = %info.feature,
            scenario = %info.scenario,
            ?explode_index,
            "starting scenario",
        );

        if let Err(failure) = feature.ensure_before_all().await {
            let mut failures = vec![failure];
            failures.extend(feature.scenario_done().await);
            return Err(ScenarioFailure::new(info.scenario, failures).into());
        }

        let data = match W::new(&feature.config().world_config).await {
            Ok(data) => data,
            Err(e) => {
                let err = WorldError::new(&info.scenario, e.to_string());
                tracing::error!(%err);
                for failure in feature.scenario_done().await {
                    tracing::error!(%failure);
                }
                return Err(err.into());
            }
        };

        let mut state = Self {
            info,
            common: feature.common().clone(),
            data,
            feature: Arc::clone(&feature),
            phase: Phase::Running,
        };

        let failures = hooks::run_scenario(
            &mut state,
            HookType::Before,
            feature.registry().hooks().scenario_phase(HookType::Before),
        )
        .await;
        if !failures.is_empty() {
            state.info.errors.extend(failures);
            return Err(state.escalate().await);
        }
        Ok(state)
    }

    /// Returns the resolved [`Config`] of the Feature.
    #[must_use]
    pub fn config(&self) -> &Config {
        self.feature.config()
    }

    /// Indicates whether the after-scenario hooks ran already.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Indicates whether this scenario collects step failures instead of
    /// stopping at the first one.
    #[must_use]
    pub fn is_soft_fail(&self) -> bool {
        self.config().is_soft_fail(&self.info.tags)
    }

    /// Executes a single step: runs the before-step hooks, the matching step
    /// handler and the after-step hooks.
    ///
    /// `step_index` is 1-based for the scenario's own steps and negative for
    /// background ones. Once the last step is executed, the scenario
    /// finishes as by [`State::finish()`].
    ///
    /// Failures are enriched with the step text and `line`. Under soft-fail
    /// they're collected and execution continues, unless the step is
    /// undefined or ambiguous.
    ///
    /// # Errors
    ///
    /// With [`Error::Scenario`] if the step failed and the scenario stops
    /// here. The after-scenario hooks have run by then.
    pub async fn execute_step(
        &mut self,
        step_type: StepType,
        text: &str,
        line: usize,
        step_index: i64,
        explode_index: Option<usize>,
        data: Option<StepData>,
    ) -> Result<()> {
        if self.is_complete() {
            tracing::warn!(step = text, "scenario is complete, step ignored");
            return Ok(());
        }

        self.info.step = Some(text.to_owned());
        self.info.line = Some(line);
        self.info.step_index = step_index;
        if explode_index.is_some() {
            self.info.explode_index = explode_index;
        }

        let span = tracing::info_span!("step", text, line, step_index);
        let outcome = self
            .run_step(step_type, text, line, data)
            .instrument(span)
            .await;

        match outcome {
            Outcome::Passed => self.finish_if_complete().await,
            Outcome::Failed if self.is_soft_fail() => {
                tracing::warn!(
                    scenario = %self.info.scenario,
                    step = text,
                    errors = self.info.errors.len(),
                    "step soft-failed",
                );
                self.finish_if_complete().await
            }
            Outcome::Failed | Outcome::Fatal => Err(self.escalate().await),
        }
    }

    /// Finishes the scenario by running the after-scenario hooks, unless they
    /// ran already.
    ///
    /// Hooks may inspect and clear [`Info::errors`] before it's checked.
    ///
    /// # Errors
    ///
    /// With [`Error::Scenario`] combining every failure left in
    /// [`Info::errors`], most recent first.
    pub async fn finish(&mut self) -> Result<()> {
        if self.is_complete() {
            return Ok(());
        }

        let failures = self.complete().await;
        self.info.errors.extend(failures);
        if self.info.errors.is_empty() {
            tracing::info!(scenario = %self.info.scenario, "scenario passed");
            return Ok(());
        }
        tracing::info!(
            scenario = %self.info.scenario,
            errors = self.info.errors.len(),
            "scenario failed",
        );
        Err(ScenarioFailure::new(&self.info.scenario, self.info.errors.clone()).into())
    }

    async fn finish_if_complete(&mut self) -> Result<()> {
        if self.info.is_complete() {
            self.finish().await
        } else {
            Ok(())
        }
    }

    /// Stops the scenario right away, returning the error to propagate.
    ///
    /// Failures recorded so far are reported even if the after-scenario hooks
    /// clear them.
    async fn escalate(&mut self) -> Error {
        let mut failures = self.info.errors.clone();
        let after = self.complete().await;
        failures.extend(after.iter().cloned());
        self.info.errors.extend(after);

        tracing::info!(
            scenario = %self.info.scenario,
            errors = failures.len(),
            "scenario failed",
        );
        ScenarioFailure::new(&self.info.scenario, failures).into()
    }

    /// Runs the after-scenario hooks and marks this scenario as done for its
    /// Feature, returning their failures.
    async fn complete(&mut self) -> Vec<StepFailure> {
        self.phase = Phase::Complete;
        let feature = Arc::clone(&self.feature);
        let mut failures = hooks::run_scenario(
            self,
            HookType::After,
            feature.registry().hooks().scenario_phase(HookType::After),
        )
        .await;
        failures.extend(feature.scenario_done().await);
        failures
    }

    /// Runs the step and its hooks, recording failures into
    /// [`Info::errors`].
    async fn run_step(
        &mut self,
        step_type: StepType,
        text: &str,
        line: usize,
        data: Option<StepData>,
    ) -> Outcome {
        let feature = Arc::clone(&self.feature);
        let registry = feature.registry();
        let mut failures = hooks::run_scenario(
            self,
            HookType::BeforeStep,
            registry.hooks().scenario_phase(HookType::BeforeStep),
        )
        .await;

        if failures.is_empty() {
            match registry.find_match(step_type, text, data.as_ref()) {
                Ok(m) => {
                    let ctx = m.context(step_type, text, line, data);
                    let res = hooks::catch((m.definition.handler)(self, ctx)).await;
                    if let Err(msg) = res {
                        tracing::debug!(step = text, error = %msg, "step failed");
                        failures.push(StepFailure::new(
                            text,
                            Some(line),
                            FailureKind::Handler,
                            msg,
                        ));
                    }
                }
                Err(e) => {
                    let kind = match &e {
                        MatchError::Undefined(_) => FailureKind::Undefined,
                        MatchError::Ambiguous(_) => FailureKind::Ambiguous,
                    };
                    tracing::error!(step = text, %kind, "step cannot run");
                    failures.push(StepFailure::new(text, Some(line), kind, e.to_string()));
                }
            }
        }
        let outcome = if failures.iter().any(StepFailure::is_fatal) {
            Outcome::Fatal
        } else if failures.is_empty() {
            Outcome::Passed
        } else {
            Outcome::Failed
        };
        self.info.errors.extend(failures);

        // After-step hooks run even for failed steps, seeing their failures.
        let after = hooks::run_scenario(
            self,
            HookType::AfterStep,
            registry.hooks().scenario_phase(HookType::AfterStep),
        )
        .await;
        if after.is_empty() {
            return outcome;
        }
        self.info.errors.extend(after);
        match outcome {
            Outcome::Fatal => Outcome::Fatal,
            Outcome::Passed | Outcome::Failed => Outcome::Failed,
        }
    }
}

/// Outcome of a single step along with its hooks.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Outcome {
    /// Nothing failed.
    Passed,

    /// Something failed, and may be soft-failed.
    Failed,

    /// Step is undefined or ambiguous.
    Fatal,
}
