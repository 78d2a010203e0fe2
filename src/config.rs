// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration resolved once at setup time.
//!
//! Loaded from JSON, where every tag list may be given either as a
//! comma-separated string or as a list, and embedded into generated code in
//! its normalized form. Keys are accepted both in `snake_case` and in
//! `camelCase`.

use std::{fs, path::Path};

use derive_more::with_trait::Deref;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smart_default::SmartDefault;

use crate::{
    error::{ConfigError, Result},
    tag::{self, Tag},
};

/// Normalized list of [`Tag`]s.
#[derive(Clone, Debug, Default, Deref, Deserialize, Eq, PartialEq, Serialize)]
#[serde(from = "RawTags", into = "Vec<String>")]
pub struct TagList(Vec<Tag>);

impl TagList {
    /// Normalizes the given comma-separated `raw` tags.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self(tag::normalize([raw]))
    }

    /// Returns the [`Tag`]s of this list present in `tags`, if any.
    #[must_use]
    pub fn matches(&self, tags: &[Tag]) -> Option<Vec<Tag>> {
        tag::matches(&self.0, tags)
    }

    /// Indicates whether any [`Tag`] of this list is present in `tags`.
    #[must_use]
    pub fn any_in(&self, tags: &[Tag]) -> bool {
        self.matches(tags).is_some()
    }
}

impl From<TagList> for Vec<String> {
    fn from(list: TagList) -> Self {
        tag::to_strings(&list.0)
    }
}

/// Tags as they may be written in a configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum RawTags {
    One(String),
    Many(Vec<String>),
}

impl From<RawTags> for TagList {
    fn from(raw: RawTags) -> Self {
        Self(match raw {
            RawTags::One(s) => tag::normalize([s]),
            RawTags::Many(v) => tag::normalize(v),
        })
    }
}

/// Groups of mutually exclusive [`Tag`]s to explode scenarios over.
#[derive(Clone, Debug, Default, Deref, Deserialize, Eq, PartialEq, Serialize)]
#[serde(from = "RawGroups", into = "Vec<Vec<String>>")]
pub struct ExplodeGroups(Vec<Vec<Tag>>);

impl ExplodeGroups {
    /// Creates new [`ExplodeGroups`], dropping empty groups.
    #[must_use]
    pub fn new(groups: Vec<Vec<Tag>>) -> Self {
        Self(groups.into_iter().filter(|g| !g.is_empty()).collect())
    }
}

impl From<ExplodeGroups> for Vec<Vec<String>> {
    fn from(groups: ExplodeGroups) -> Self {
        groups.0.iter().map(|g| tag::to_strings(g)).collect()
    }
}

/// Explode groups as they may be written in a configuration: a single group
/// as a string or a flat list, or several groups as a list of those.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum RawGroups {
    One(String),
    Flat(Vec<String>),
    Nested(Vec<RawTags>),
}

impl From<RawGroups> for ExplodeGroups {
    fn from(raw: RawGroups) -> Self {
        Self::new(match raw {
            RawGroups::One(s) => vec![tag::normalize([s])],
            RawGroups::Flat(v) => vec![tag::normalize(v)],
            RawGroups::Nested(groups) => groups
                .into_iter()
                .map(|g| TagList::from(g).0)
                .collect(),
        })
    }
}

/// Paths and attribute names used by the generated code.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, SmartDefault)]
#[serde(default)]
pub struct RenderOptions {
    /// Path of this crate, as seen from the generated code.
    #[default(String::from("::picklejar"))]
    pub runtime: String,

    /// Type implementing [`World`], used as the scenario data.
    ///
    /// [`World`]: crate::World
    #[default(String::from("::picklejar::JsonWorld"))]
    pub world: String,

    /// Function returning a `Result<Registry<World>, ConfigError>`.
    #[default(String::from("crate::steps::registry"))]
    pub registry: String,

    /// Attribute marking an async test.
    #[default(String::from("::tokio::test"))]
    pub test_attribute: String,

    /// Attribute forcing serial execution.
    #[default(String::from("::serial_test::serial"))]
    pub serial_attribute: String,

    /// Attribute allowing parallel execution.
    #[default(String::from("::serial_test::parallel"))]
    pub parallel_attribute: String,
}

/// Configuration of rendering and running scenarios.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, SmartDefault)]
#[serde(default)]
pub struct Config {
    /// Tags marking scenarios as not implemented yet.
    #[default(TagList::parse("@todo, @wip"))]
    #[serde(alias = "todoTags")]
    pub todo_tags: TagList,

    /// Tags marking scenarios to skip.
    #[default(TagList::parse("@skip"))]
    #[serde(alias = "skipTags")]
    pub skip_tags: TagList,

    /// Tags marking scenarios expected to fail.
    #[default(TagList::parse("@fails, @failing"))]
    #[serde(alias = "failTags")]
    pub fail_tags: TagList,

    /// Tags marking scenarios that collect step failures instead of stopping
    /// at the first one.
    #[default(TagList::parse("@soft"))]
    #[serde(alias = "softFailTags")]
    pub soft_fail_tags: TagList,

    /// Tags allowing scenarios to run in parallel.
    #[default(TagList::parse("@concurrent"))]
    #[serde(alias = "concurrentTags")]
    pub concurrent_tags: TagList,

    /// Tags forcing scenarios to run serially. Win over
    /// [`Config::concurrent_tags`].
    #[default(TagList::parse("@sequential"))]
    #[serde(alias = "sequentialTags")]
    pub sequential_tags: TagList,

    /// Groups of tags to explode scenarios over.
    #[serde(alias = "explodeTags")]
    pub explode_tags: ExplodeGroups,

    /// Configuration handed to [`World::new()`].
    ///
    /// [`World::new()`]: crate::World::new
    #[default(Value::Object(Map::new()))]
    #[serde(alias = "worldConfig")]
    pub world_config: Value,

    /// Options of the generated code.
    pub render: RenderOptions,
}

impl Config {
    /// Parses a [`Config`] out of its JSON representation. Missing keys get
    /// their defaults.
    ///
    /// # Errors
    ///
    /// If the `json` is malformed or has values of unexpected types.
    pub fn from_json(json: &str) -> std::result::Result<Self, ConfigError> {
        serde_json::from_str(json)
            .map_err(|e| ConfigError::invalid_config(e.to_string()))
    }

    /// Reads a [`Config`] out of the JSON file at the given `path`.
    ///
    /// # Errors
    ///
    /// If the file cannot be read or contains an invalid [`Config`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }

    /// Serializes this [`Config`] into JSON, to be embedded into generated
    /// code.
    ///
    /// # Errors
    ///
    /// If the [`Config::world_config`] cannot be serialized.
    pub fn to_json(&self) -> std::result::Result<String, ConfigError> {
        serde_json::to_string(self)
            .map_err(|e| ConfigError::invalid_config(e.to_string()))
    }

    /// Indicates whether a scenario with the given `tags` collects step
    /// failures instead of stopping at the first one.
    #[must_use]
    pub fn is_soft_fail(&self, tags: &[Tag]) -> bool {
        self.soft_fail_tags.any_in(tags)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn strings(list: &TagList) -> Vec<String> {
        tag::to_strings(list)
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(strings(&config.todo_tags), ["@todo", "@wip"]);
        assert_eq!(strings(&config.fail_tags), ["@fails", "@failing"]);
        assert_eq!(strings(&config.soft_fail_tags), ["@soft"]);
        assert!(config.explode_tags.is_empty());
        assert_eq!(config.world_config, json!({}));
        assert_eq!(config.render.world, "::picklejar::JsonWorld");
    }

    #[test]
    fn accepts_strings_and_lists() {
        let config = Config::from_json(
            r#"{"skipTags": "ignore, @later", "todo_tags": ["wip"], "explodeTags": "a,b"}"#,
        )
        .unwrap();

        assert_eq!(strings(&config.skip_tags), ["@ignore", "@later"]);
        assert_eq!(strings(&config.todo_tags), ["@wip"]);
        assert_eq!(config.explode_tags.len(), 1);
        assert_eq!(strings(&config.sequential_tags), ["@sequential"]);
    }

    #[test]
    fn accepts_nested_explode_groups() {
        let config = Config::from_json(
            r#"{"explodeTags": [["chromium", "firefox"], "mobile, desktop", []]}"#,
        )
        .unwrap();
        let groups = Vec::<Vec<String>>::from(config.explode_tags);
        assert_eq!(groups, [["@chromium", "@firefox"], ["@mobile", "@desktop"]]);
    }

    #[test]
    fn survives_json_round_trip() {
        let config = Config::from_json(
            r#"{"softFailTags": ["@soft", "@lenient"], "worldConfig": {"port": 8080},
                "explode_tags": [["@a", "@b"], ["@c"]]}"#,
        )
        .unwrap();
        let back = Config::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = Config::from_json(r#"{"skipTags": 5}"#).unwrap_err();
        assert!(err.to_string().starts_with("Invalid configuration:"));
    }

    #[test]
    fn soft_fail_is_case_insensitive() {
        let config = Config::default();
        assert!(config.is_soft_fail(&tag::normalize(["@SOFT"])));
        assert!(!config.is_soft_fail(&tag::normalize(["@hard"])));
    }
}
