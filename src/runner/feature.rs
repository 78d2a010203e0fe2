// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-Feature execution handle.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use futures::lock::Mutex;

use crate::{
    config::Config,
    error::{ConfigError, StepFailure},
    hook::HookType,
    tag::{self, Tag},
    Common, Registry,
};

use super::hooks;

/// Everything the scenarios of a single Feature share.
///
/// Generated code creates one lazily per Feature. Runs the before-all hooks
/// once, before the first scenario starts, and the after-all hooks once the
/// last runnable scenario of the Feature is done.
///
/// If the host runner filters out some scenarios, the after-all hooks never
/// run, as the Feature never gets done.
pub struct FeatureRun<W> {
    /// Step definitions and hooks.
    registry: Registry<W>,

    /// Resolved configuration.
    config: Config,

    /// Key/value map shared by the Feature's scenarios.
    common: Common,

    /// Name of the Feature.
    name: String,

    /// Tags of the Feature, gating the before-all/after-all hooks.
    tags: Vec<Tag>,

    /// Number of runnable scenarios not done yet.
    remaining: AtomicUsize,

    /// Outcome of the before-all hooks, once they ran.
    before_all: Mutex<Option<Result<(), StepFailure>>>,
}

impl<W> FeatureRun<W> {
    /// Creates a new [`FeatureRun`] expecting the given number of `runnable`
    /// scenarios.
    #[must_use]
    pub fn new(
        registry: Registry<W>,
        config: Config,
        name: impl Into<String>,
        tags: Vec<Tag>,
        runnable: usize,
    ) -> Arc<Self> {
        Arc::new(Self {
            registry,
            config,
            common: Common::new(),
            name: name.into(),
            tags,
            remaining: AtomicUsize::new(runnable),
            before_all: Mutex::new(None),
        })
    }

    /// Creates a new [`FeatureRun`] out of generated code's inputs: the
    /// result of building the `registry`, and the `config` embedded as JSON.
    ///
    /// # Errors
    ///
    /// If the `registry` failed to build, or the `config` is malformed.
    pub fn load(
        registry: Result<Registry<W>, ConfigError>,
        config: &str,
        name: &str,
        tags: &[&str],
        runnable: usize,
    ) -> Result<Arc<Self>, ConfigError> {
        let registry = registry?;
        let config = Config::from_json(config)?;
        tracing::debug!(feature = name, runnable, "loaded feature");
        Ok(Self::new(registry, config, name, tag::normalize(tags), runnable))
    }

    /// Returns the [`Registry`] of this Feature.
    #[must_use]
    pub const fn registry(&self) -> &Registry<W> {
        &self.registry
    }

    /// Returns the resolved [`Config`].
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the [`Common`] map shared by the Feature's scenarios.
    #[must_use]
    pub const fn common(&self) -> &Common {
        &self.common
    }

    /// Returns the name of the Feature.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tags of the Feature.
    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Runs the before-all hooks, unless they ran already.
    ///
    /// Every later call returns the outcome of the first one, so a failed
    /// before-all hook fails every scenario of the Feature.
    pub(crate) async fn ensure_before_all(&self) -> Result<(), StepFailure> {
        let mut outcome = self.before_all.lock().await;
        if let Some(res) = &*outcome {
            return res.clone();
        }

        tracing::debug!(feature = %self.name, "running before-all hooks");
        let res = hooks::run_feature(
            &self.common,
            &self.tags,
            HookType::BeforeAll,
            self.registry.hooks().feature_phase(HookType::BeforeAll),
        )
        .await
        .into_iter()
        .next()
        .map_or(Ok(()), Err);
        *outcome = Some(res.clone());
        res
    }

    /// Marks one scenario as done, running the after-all hooks if it was the
    /// last one.
    pub(crate) async fn scenario_done(&self) -> Vec<StepFailure> {
        let previous = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        if previous != Ok(1) {
            return Vec::new();
        }

        tracing::debug!(feature = %self.name, "running after-all hooks");
        hooks::run_feature(
            &self.common,
            &self.tags,
            HookType::AfterAll,
            self.registry.hooks().feature_phase(HookType::AfterAll),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicU32;

    use futures::future::LocalBoxFuture;

    use super::*;
    use crate::JsonWorld;

    static BEFORE: AtomicU32 = AtomicU32::new(0);
    static AFTER: AtomicU32 = AtomicU32::new(0);

    fn before(common: &Common) -> LocalBoxFuture<'_, anyhow::Result<()>> {
        Box::pin(async move {
            _ = BEFORE.fetch_add(1, Ordering::SeqCst);
            _ = common.set("ready", true);
            Ok(())
        })
    }

    fn after(_: &Common) -> LocalBoxFuture<'_, anyhow::Result<()>> {
        Box::pin(async {
            _ = AFTER.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    fn failing(_: &Common) -> LocalBoxFuture<'_, anyhow::Result<()>> {
        Box::pin(async { Err(anyhow::anyhow!("no database")) })
    }

    #[tokio::test]
    async fn feature_hooks_run_once() {
        let registry = Registry::<JsonWorld>::new().before_all(before).after_all(after);
        let feature = FeatureRun::new(registry, Config::default(), "F", vec![], 2);

        feature.ensure_before_all().await.unwrap();
        feature.ensure_before_all().await.unwrap();
        assert_eq!(BEFORE.load(Ordering::SeqCst), 1);
        assert_eq!(feature.common().get("ready"), Some(true.into()));

        assert!(feature.scenario_done().await.is_empty());
        assert_eq!(AFTER.load(Ordering::SeqCst), 0);
        assert!(feature.scenario_done().await.is_empty());
        assert_eq!(AFTER.load(Ordering::SeqCst), 1);

        // Extra calls never underflow nor rerun the hooks.
        assert!(feature.scenario_done().await.is_empty());
        assert_eq!(AFTER.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_before_all_is_remembered() {
        let registry = Registry::<JsonWorld>::new().before_all(failing);
        let feature = FeatureRun::new(registry, Config::default(), "F", vec![], 1);

        let first = feature.ensure_before_all().await.unwrap_err();
        let second = feature.ensure_before_all().await.unwrap_err();
        assert_eq!(first, second);
        assert_eq!(first.message(), "no database");
    }

    #[test]
    fn load_reports_bad_inputs() {
        let err = FeatureRun::<JsonWorld>::load(
            Err(ConfigError::invalid_pattern("{x", "unclosed")),
            "{}",
            "F",
            &[],
            1,
        )
        .err()
        .unwrap();
        assert!(err.is_invalid_pattern());

        let err = FeatureRun::load(Ok(Registry::<JsonWorld>::new()), "[", "F", &[], 1)
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::InvalidConfig { .. }));

        let feature =
            FeatureRun::load(Ok(Registry::<JsonWorld>::new()), "{}", "F", &["@slow"], 1)
                .unwrap();
        assert_eq!(tag::to_strings(feature.tags()), ["@slow"]);
    }
}
