// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Test attributes derived from a scenario's tags.

use crate::{
    config::{Config, RenderOptions},
    tag::Tag,
};

/// Execution modifiers of a single generated test.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Modifiers {
    /// Not implemented yet, so not run.
    pub todo: bool,

    /// Skipped.
    pub skip: bool,

    /// Expected to fail.
    pub fails: bool,

    /// Must not run in parallel with other serial tests.
    pub sequential: bool,

    /// May run in parallel with other tests. Never set along with
    /// [`Modifiers::sequential`].
    pub concurrent: bool,
}

impl Modifiers {
    /// Evaluates the [`Config`]ured tag lists against the scenario's `tags`.
    #[must_use]
    pub fn new(config: &Config, tags: &[Tag]) -> Self {
        let sequential = config.sequential_tags.any_in(tags);
        Self {
            todo: config.todo_tags.any_in(tags),
            skip: config.skip_tags.any_in(tags),
            fails: config.fail_tags.any_in(tags),
            sequential,
            concurrent: !sequential && config.concurrent_tags.any_in(tags),
        }
    }

    /// Indicates whether the test is ignored by the host runner.
    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        self.todo || self.skip
    }

    /// Renders the attributes of the test function.
    #[must_use]
    pub fn attributes(&self, opts: &RenderOptions) -> Vec<String> {
        let mut attrs = vec![format!("#[{}]", opts.test_attribute)];
        if self.todo {
            attrs.push("#[ignore = \"todo\"]".to_owned());
        } else if self.skip {
            attrs.push("#[ignore = \"skip\"]".to_owned());
        }
        if self.fails {
            attrs.push("#[should_panic]".to_owned());
        }
        if self.sequential {
            attrs.push(format!("#[{}]", opts.serial_attribute));
        } else if self.concurrent {
            attrs.push(format!("#[{}]", opts.parallel_attribute));
        }
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag;

    fn modifiers(tags: &str) -> Modifiers {
        Modifiers::new(&Config::default(), &tag::normalize([tags]))
    }

    #[test]
    fn maps_tags_to_modifiers() {
        assert_eq!(modifiers("@other"), Modifiers::default());

        let m = modifiers("@WIP, @failing");
        assert!(m.todo && m.fails && m.is_ignored());
        assert!(modifiers("@skip").is_ignored());
        assert!(!modifiers("@fails").is_ignored());
    }

    #[test]
    fn sequential_wins_over_concurrent() {
        let m = modifiers("@concurrent, @sequential");
        assert!(m.sequential);
        assert!(!m.concurrent);
        assert!(modifiers("@concurrent").concurrent);
    }

    #[test]
    fn renders_attributes() {
        let opts = RenderOptions::default();
        assert_eq!(modifiers("").attributes(&opts), ["#[::tokio::test]"]);
        assert_eq!(
            modifiers("@todo, @skip, @fails, @concurrent").attributes(&opts),
            [
                "#[::tokio::test]",
                "#[ignore = \"todo\"]",
                "#[should_panic]",
                "#[::serial_test::parallel]",
            ],
        );
        assert_eq!(
            modifiers("@skip, @sequential").attributes(&opts),
            ["#[::tokio::test]", "#[ignore = \"skip\"]", "#[::serial_test::serial]"],
        );
    }
}
