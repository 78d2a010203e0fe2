// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Rendering [`gherkin::Feature`]s into Rust test code.
//!
//! A Feature renders into a module body holding:
//! - a lazily loaded [`FeatureRun`] wiring the configured registry;
//! - an `init_scenario()` function starting a [`State`] and executing the
//!   Feature's background steps (with negative step indices);
//! - a nested module per Rule, with an `init_rule_scenario()` function
//!   adding the Rule's background steps on top;
//! - a runner function per Scenario, executing its steps in order, and a
//!   test function per Example row and exploded tag variant calling it.
//!
//! Test functions carry attributes derived from the tags, as described by
//! [`Modifiers`].
//!
//! [`FeatureRun`]: crate::FeatureRun
//! [`State`]: crate::State

pub mod modifiers;
mod text;
mod writer;

use gherkin::StepType;
use itertools::Itertools as _;

use crate::{
    config::Config,
    error::ConfigError,
    feature::Ext as _,
    tag::{self, Tag},
};

use self::{
    text::{ident, raw_literal, str_expr, str_literal, string_expr, Names},
    writer::Writer,
};

#[doc(inline)]
pub use self::modifiers::Modifiers;

/// Items of the generated code runner and test names must not clash with.
const RESERVED: &[&str] = &[
    "CONFIG",
    "FEATURE",
    "fail_on_error",
    "feature",
    "init_rule_scenario",
    "init_scenario",
];

/// Renders the given [`gherkin::Feature`] into the body of a Rust module.
///
/// Returns an empty string for a Feature without any scenarios.
///
/// # Errors
///
/// If the [`Config`] cannot be serialized for embedding.
pub fn render_feature(
    feature: &gherkin::Feature,
    config: &Config,
) -> Result<String, ConfigError> {
    render_at(feature, config, 0)
}

/// Renders the given [`gherkin::Feature`]s into a single Rust file, each one
/// in its own `pub mod` named after it.
///
/// # Errors
///
/// If the [`Config`] cannot be serialized for embedding.
pub fn render_features(
    features: &[gherkin::Feature],
    config: &Config,
) -> Result<String, ConfigError> {
    let mut names = Names::default();
    let mut out = String::from("// Generated by picklejar. Do not edit.\n");

    for feature in features {
        let body = render_at(feature, config, 1)?;
        if body.is_empty() {
            continue;
        }
        let module = names.claim(&ident(&feature.name, "feature"));
        out.push_str(&format!("\npub mod {module} {{\n{body}}}\n"));
    }
    Ok(out)
}

fn render_at(
    feature: &gherkin::Feature,
    config: &Config,
    depth: usize,
) -> Result<String, ConfigError> {
    if feature.count_scenarios() == 0 {
        tracing::debug!(feature = %feature.name, "no scenarios to render");
        return Ok(String::new());
    }

    let renderer = Renderer { feature, config };
    let mut body = Writer::new(depth);
    let mut names = Names::reserved(RESERVED);
    let mut runnable = 0;

    for scenario in &feature.scenarios {
        runnable += renderer.scenario(&mut body, &mut names, None, scenario);
    }
    for rule in &feature.rules {
        if rule.scenarios.is_empty() {
            continue;
        }
        body.blank()
            .open(format!("mod {} {{", names.claim(&ident(&rule.name, "rule"))))
            .line("use super::*;")
            .blank();
        renderer.init_rule(&mut body, rule);
        let mut rule_names = Names::reserved(RESERVED);
        for scenario in &rule.scenarios {
            runnable += renderer.scenario(&mut body, &mut rule_names, Some(rule), scenario);
        }
        body.close("}");
    }

    let mut out = Writer::new(depth);
    renderer.header(&mut out, runnable)?;
    renderer.init(&mut out);
    let mut code = out.finish();
    code.push('\n');
    code.push_str(&body.finish());

    tracing::debug!(feature = %feature.name, runnable, "rendered feature");
    Ok(code)
}

/// Renderer of a single [`gherkin::Feature`].
#[derive(Clone, Copy, Debug)]
struct Renderer<'a> {
    /// Feature being rendered.
    feature: &'a gherkin::Feature,

    /// Configuration to render with.
    config: &'a Config,
}

impl Renderer<'_> {
    /// Renders imports, the embedded [`Config`] and the lazily loaded
    /// `FeatureRun`.
    fn header(&self, w: &mut Writer, runnable: usize) -> Result<(), ConfigError> {
        let opts = &self.config.render;
        let feature_tags = tags_literal(&tag::normalize(&self.feature.tags));

        w.line(format!(
            "// Generated by picklejar from `{}: {}`. Do not edit.",
            self.feature.keyword,
            self.feature.name.replace('\n', " "),
        ))
        .blank()
        .open(format!("use {}::codegen::{{", opts.runtime))
        .line(
            "fail_on_error, Arc, ConfigError, Error, FeatureRun, Lazy, State, StepData, \
             StepType,",
        )
        .close("};")
        .blank()
        .line(format!("type World = {};", opts.world))
        .blank()
        .line(format!("const CONFIG: &str = {};", raw_literal(&self.config.to_json()?)))
        .blank()
        .open("static FEATURE: Lazy<Result<Arc<FeatureRun<World>>, ConfigError>> = Lazy::new(|| {")
        .line(format!(
            "FeatureRun::load({}(), CONFIG, {}, {feature_tags}, {runnable})",
            opts.registry,
            str_literal(&self.feature.name),
        ))
        .close("});")
        .blank()
        .open("fn feature() -> Result<Arc<FeatureRun<World>>, Error> {")
        .line("FEATURE.as_ref().map(Arc::clone).map_err(|e| Error::Config(e.clone()))")
        .close("}");
        Ok(())
    }

    /// Renders the `init_scenario()` function, executing the Feature's
    /// background steps.
    fn init(&self, w: &mut Writer) {
        let steps = self.feature.background.as_ref().map_or(&[][..], |b| &b.steps[..]);

        w.blank()
            .open("async fn init_scenario(")
            .line("rule: Option<&str>,")
            .line("scenario: &str,")
            .line("tags: &[&str],")
            .line("steps: Vec<String>,")
            .line("explode: Option<usize>,")
            .close(") -> Result<State<World>, Error> {")
            .indent();
        start_then_background(
            w,
            "State::start(feature()?, rule, scenario, tags, steps, explode)",
            steps,
            0,
        );
        w.close("}");
    }

    /// Renders the `init_rule_scenario()` function, executing the Rule's
    /// background steps.
    fn init_rule(&self, w: &mut Writer, rule: &gherkin::Rule) {
        let steps = rule.background.as_ref().map_or(&[][..], |b| &b.steps[..]);
        let offset = self.feature.background.as_ref().map_or(0, |b| b.steps.len());

        w.open("async fn init_rule_scenario(")
            .line("scenario: &str,")
            .line("tags: &[&str],")
            .line("steps: Vec<String>,")
            .line("explode: Option<usize>,")
            .close(") -> Result<State<World>, Error> {")
            .indent();
        start_then_background(
            w,
            &format!(
                "init_scenario(Some({}), scenario, tags, steps, explode)",
                str_literal(&rule.name),
            ),
            steps,
            offset,
        );
        w.close("}");
    }

    /// Renders the runner and test functions of a single `scenario`.
    ///
    /// Returns the number of rendered tests the host runner is going to run.
    fn scenario(
        &self,
        w: &mut Writer,
        names: &mut Names,
        rule: Option<&gherkin::Rule>,
        scenario: &gherkin::Scenario,
    ) -> usize {
        let base = ident(&scenario.name, "scenario");
        let outline = Outline::new(scenario);
        if outline.as_ref().is_some_and(|o| o.rows.is_empty()) {
            tracing::debug!(scenario = %scenario.name, "outline without examples");
            return 0;
        }
        let columns = outline.as_ref().map_or(&[][..], |o| &o.columns[..]);
        let runner = names.claim(&format!("run_{base}"));

        self.runner(w, &runner, rule, scenario, columns);

        let tags = self.feature.effective_tags(rule, scenario);
        let rows = outline.as_ref().map_or_else(
            || vec![(None, Vec::new(), Vec::new())],
            |o| {
                o.rows
                    .iter()
                    .enumerate()
                    .map(|(i, (tags, values))| (Some(i + 1), tags.clone(), values.clone()))
                    .collect()
            },
        );

        let mut runnable = 0;
        for (example, example_tags, values) in rows {
            let tags = tags.iter().cloned().chain(example_tags).collect::<Vec<_>>();
            let variants = tag::explode(&self.config.explode_tags, &tags);
            if variants.len() > 1 {
                tracing::trace!(
                    scenario = %scenario.name,
                    variants = variants.len(),
                    "exploded scenario",
                );
            }

            for (v, variant) in variants.iter().enumerate() {
                let explode = (variants.len() > 1).then_some(v + 1);
                let mut name = base.clone();
                if let Some(k) = example {
                    name.push_str(&format!("_example_{k}"));
                }
                if let Some(n) = explode {
                    name.push_str(&format!("_v{n}"));
                }

                let modifiers = Modifiers::new(self.config, variant);
                if !modifiers.is_ignored() {
                    runnable += 1;
                }
                let args = [
                    tags_literal(variant),
                    explode.map_or_else(|| "None".to_owned(), |n| format!("Some({n})")),
                ]
                .into_iter()
                .chain(values.iter().map(|val| str_literal(val)))
                .join(", ");

                w.blank();
                for attr in modifiers.attributes(&self.config.render) {
                    w.line(attr);
                }
                w.open(format!("async fn {}() {{", names.claim(&name)))
                    .line(format!("fail_on_error({runner}({args}).await);"))
                    .close("}");
            }
        }
        runnable
    }

    /// Renders the runner function of a single `scenario`.
    fn runner(
        &self,
        w: &mut Writer,
        name: &str,
        rule: Option<&gherkin::Rule>,
        scenario: &gherkin::Scenario,
        columns: &[String],
    ) {
        let params = (0..columns.len()).map(|i| format!(", _{i}: &str")).join("");
        let init = match rule {
            Some(_) => "init_rule_scenario(",
            None => "init_scenario(None, ",
        };

        w.blank()
            .line(format!("/// {}: {}", scenario.keyword, scenario.name.replace('\n', " ")))
            .open(format!(
                "async fn {name}(tags: &[&str], explode: Option<usize>{params}) -> Result<(), Error> {{",
            ));
        if scenario.steps.is_empty() {
            w.line("let steps = Vec::new();");
        } else {
            w.open("let steps = vec![");
            for step in &scenario.steps {
                w.line(format!("{},", string_expr(&step.value, columns)));
            }
            w.close("];");
        }
        w.line(format!(
            "let mut state = {init}{}, tags, steps.clone(), explode).await?;",
            str_expr(&scenario.name, columns),
        ));
        for (i, step) in scenario.steps.iter().enumerate() {
            w.line(execute_step(step, &format!("&steps[{i}]"), step_index(i, false), columns));
        }
        w.line("state.finish().await").close("}");
    }
}

/// Renders the body of an `init_*()` function: the `start` expression
/// followed by the given background `steps`.
///
/// Background steps are numbered after the `offset` ones already executed
/// by an outer background, so every step index stays unique.
fn start_then_background(
    w: &mut Writer,
    start: &str,
    steps: &[gherkin::Step],
    offset: usize,
) {
    if steps.is_empty() {
        w.line(format!("{start}.await"));
        return;
    }
    w.line(format!("let mut state = {start}.await?;"));
    for (i, step) in steps.iter().enumerate() {
        let index = step_index(offset + i, true);
        w.line(execute_step(step, &str_literal(&step.value), index, &[]));
    }
    w.line("Ok(state)");
}

/// Returns the step index of the `i`th step: 1-based for scenario steps,
/// negative for background ones.
fn step_index(i: usize, background: bool) -> i64 {
    let idx = i64::try_from(i).map_or(i64::MAX, |i| i + 1);
    if background {
        -idx
    } else {
        idx
    }
}

/// Renders a single `State::execute_step()` call.
fn execute_step(step: &gherkin::Step, text: &str, index: i64, columns: &[String]) -> String {
    let ty = match step.ty {
        StepType::Given => "Given",
        StepType::When => "When",
        StepType::Then => "Then",
    };
    let data = if let Some(table) = &step.table {
        let rows = table
            .rows
            .iter()
            .map(|r| format!("vec![{}]", r.iter().map(|c| string_expr(c, columns)).join(", ")))
            .join(", ");
        format!("Some(StepData::table(vec![{rows}]))")
    } else if let Some(doc) = &step.docstring {
        format!("Some(StepData::doc_string({}, None))", string_expr(doc, columns))
    } else {
        "None".to_owned()
    };
    format!(
        "state.execute_step(StepType::{ty}, {text}, {}, {index}, explode, {data}).await?;",
        step.position.line,
    )
}

/// Renders a `&[&str]` literal of the `tags`.
fn tags_literal(tags: &[Tag]) -> String {
    format!("&[{}]", tags.iter().map(|t| str_literal(t.as_str())).join(", "))
}

/// Examples of a Scenario Outline.
#[derive(Clone, Debug)]
struct Outline {
    /// Columns of every Examples table, in order of their first appearance.
    columns: Vec<String>,

    /// Tags and column values of every Examples row.
    ///
    /// A row of an Examples table lacking some column gets the placeholder
    /// itself as its value, so it stays as is.
    rows: Vec<(Vec<Tag>, Vec<String>)>,
}

impl Outline {
    /// Collects the Examples of the `scenario`, if it's an outline.
    fn new(scenario: &gherkin::Scenario) -> Option<Self> {
        if scenario.examples.is_empty() {
            return None;
        }

        let tables = scenario
            .examples
            .iter()
            .filter_map(|ex| {
                let (header, body) = ex.table.as_ref()?.rows.split_first()?;
                Some((ex, header, body))
            })
            .collect::<Vec<_>>();
        let columns = tables
            .iter()
            .flat_map(|(_, header, _)| header.iter())
            .unique()
            .cloned()
            .collect::<Vec<_>>();

        let all = &columns;
        let rows = tables
            .iter()
            .flat_map(|(ex, header, body)| {
                let tags = tag::normalize(&ex.tags);
                body.iter().map(move |row| {
                    let values = all
                        .iter()
                        .map(|col| {
                            header.iter().position(|h| h == col).map_or_else(
                                || format!("<{col}>"),
                                |i| row.get(i).cloned().unwrap_or_default(),
                            )
                        })
                        .collect();
                    (tags.clone(), values)
                })
            })
            .collect();

        Some(Self { columns, rows })
    }
}
