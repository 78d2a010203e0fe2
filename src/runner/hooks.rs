// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Invoking the hooks of a single phase.

use std::panic::AssertUnwindSafe;

use futures::{future::LocalBoxFuture, FutureExt as _};

use crate::{
    error::{
        utilities::{error_message, panic_message},
        FailureKind, StepFailure,
    },
    hook::{FeatureHookFn, Hook, HookType, ScenarioHookFn},
    tag::Tag,
    Common, State,
};

/// Awaits the given hook or step `fut`, turning both returned errors and
/// panics into a failure message.
pub(crate) async fn catch(
    fut: LocalBoxFuture<'_, anyhow::Result<()>>,
) -> Result<(), String> {
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(error_message(&e)),
        Err(panic) => Err(panic_message(&*panic)),
    }
}

/// Indicates whether the remaining hooks of the phase still run after one of
/// them failed.
const fn is_cleanup(ty: HookType) -> bool {
    matches!(ty, HookType::AfterStep | HookType::After | HookType::AfterAll)
}

/// Runs the scenario-level `hooks` of the given phase applying to the
/// scenario's tags.
///
/// Before-phases stop at the first failure, after-phases run every hook.
pub(crate) async fn run_scenario<W>(
    state: &mut State<W>,
    ty: HookType,
    hooks: &[Hook<ScenarioHookFn<W>>],
) -> Vec<StepFailure> {
    let mut failures = Vec::new();
    for hook in hooks {
        if !hook.applies_to(&state.info.tags) {
            continue;
        }
        let Err(msg) = catch((hook.handler)(state)).await else {
            continue;
        };

        let label = hook.label(ty);
        tracing::warn!(hook = %label, scenario = %state.info.scenario, "hook failed");
        failures.push(match ty {
            HookType::BeforeStep | HookType::AfterStep => StepFailure::new(
                state.info.step.clone().unwrap_or_default(),
                state.info.line,
                FailureKind::Hook(ty),
                format!("{label} failed: {msg}"),
            ),
            _ => StepFailure::new(label, None, FailureKind::Hook(ty), msg),
        });
        if !is_cleanup(ty) {
            break;
        }
    }
    failures
}

/// Runs the feature-level `hooks` of the given phase applying to the
/// Feature's `tags`.
pub(crate) async fn run_feature(
    common: &Common,
    tags: &[Tag],
    ty: HookType,
    hooks: &[Hook<FeatureHookFn>],
) -> Vec<StepFailure> {
    let mut failures = Vec::new();
    for hook in hooks {
        if !hook.applies_to(tags) {
            continue;
        }
        if let Err(msg) = catch((hook.handler)(common)).await {
            let label = hook.label(ty);
            tracing::warn!(hook = %label, "hook failed");
            failures.push(StepFailure::new(label, None, FailureKind::Hook(ty), msg));
            if !is_cleanup(ty) {
                break;
            }
        }
    }
    failures
}
