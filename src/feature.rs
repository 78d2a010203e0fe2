// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`gherkin::Feature`] extension.

use std::mem;

use sealed::sealed;

use crate::tag::{self, Tag, TagExpr};

/// Helper methods to operate on [`gherkin::Feature`]s.
#[sealed]
pub trait Ext: Sized {
    /// Returns the effective [`Tag`]s of the given [`Scenario`], nested in the
    /// optional [`Rule`]: the Feature's tags, followed by the Rule's, followed
    /// by the Scenario's own.
    ///
    /// [`Rule`]: gherkin::Rule
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    fn effective_tags(
        &self,
        rule: Option<&gherkin::Rule>,
        scenario: &gherkin::Scenario,
    ) -> Vec<Tag>;

    /// Retains only the [`Scenario`]s whose effective [`Tag`]s satisfy the
    /// given `filter`, dropping [`Rule`]s left empty.
    ///
    /// [`Rule`]: gherkin::Rule
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    fn filter_scenarios(self, filter: &TagExpr) -> Self;

    /// Counts all the [`Feature`]'s [`Scenario`]s, including [`Rule`]s inside.
    ///
    /// [`Feature`]: gherkin::Feature
    /// [`Rule`]: gherkin::Rule
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    fn count_scenarios(&self) -> usize;
}

#[sealed]
impl Ext for gherkin::Feature {
    fn effective_tags(
        &self,
        rule: Option<&gherkin::Rule>,
        scenario: &gherkin::Scenario,
    ) -> Vec<Tag> {
        tag::normalize(
            self.tags
                .iter()
                .chain(rule.iter().flat_map(|r| &r.tags))
                .chain(&scenario.tags),
        )
    }

    fn filter_scenarios(mut self, filter: &TagExpr) -> Self {
        let feature_tags = tag::normalize(&self.tags);
        let keep = |rule_tags: &[Tag], s: &gherkin::Scenario| {
            let tags = feature_tags
                .iter()
                .chain(rule_tags)
                .cloned()
                .chain(tag::normalize(&s.tags))
                .collect::<Vec<_>>();
            filter.eval(&tags)
        };

        self.scenarios = mem::take(&mut self.scenarios)
            .into_iter()
            .filter(|s| keep(&[], s))
            .collect();
        for r in &mut self.rules {
            let rule_tags = tag::normalize(&r.tags);
            r.scenarios = mem::take(&mut r.scenarios)
                .into_iter()
                .filter(|s| keep(&rule_tags, s))
                .collect();
        }
        self.rules.retain(|r| !r.scenarios.is_empty());

        self
    }

    fn count_scenarios(&self) -> usize {
        self.scenarios.len()
            + self.rules.iter().map(|r| r.scenarios.len()).sum::<usize>()
    }
}
