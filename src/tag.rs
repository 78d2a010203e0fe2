// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tag algebra: normalization, matching, boolean [tag expressions][1] and
//! combinatorial exploding of mutually exclusive tag groups.
//!
//! [1]: https://cucumber.io/docs/cucumber/api#tag-expressions

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use derive_more::with_trait::{Deref, Display};
use gherkin::tagexpr::TagOperation;
use itertools::Itertools as _;
use sealed::sealed;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Marker every normalized [`Tag`] starts with.
pub const MARKER: char = '@';

/// Normalized tag token, always prefixed with [`MARKER`].
///
/// Comparison and hashing are case-insensitive, while the original spelling
/// is kept for display.
#[derive(Clone, Debug, Deref, Deserialize, Display, Serialize)]
#[serde(from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    /// Creates a new [`Tag`], prefixing it with [`MARKER`] if it's missing.
    #[must_use]
    pub fn new(raw: impl AsRef<str>) -> Self {
        let raw = raw.as_ref().trim();
        if raw.starts_with(MARKER) {
            Self(raw.to_owned())
        } else {
            Self(format!("{MARKER}{raw}"))
        }
    }

    /// Returns this [`Tag`] as a string slice, including its [`MARKER`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns this [`Tag`] without its [`MARKER`].
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.trim_start_matches(MARKER)
    }

    /// Checks whether this [`Tag`] equals the given raw tag text, ignoring
    /// case and the presence of a [`MARKER`].
    #[must_use]
    pub fn is(&self, other: &str) -> bool {
        self.name().to_lowercase()
            == other.trim_start_matches(MARKER).to_lowercase()
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.is(other.as_str())
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().to_lowercase().hash(state);
    }
}

impl From<String> for Tag {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for Tag {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.0
    }
}

/// Normalizes the given raw tags.
///
/// Every entry may itself be a comma-separated list. Empty entries are
/// dropped and entries missing the [`MARKER`] get it prepended, so
/// normalizing an already normalized list returns it unchanged.
///
/// # Example
///
/// ```rust
/// use picklejar::tag;
///
/// let tags = tag::normalize(["todo, @wip", "", "skip"]);
/// assert_eq!(tag::to_strings(&tags), ["@todo", "@wip", "@skip"]);
/// ```
#[must_use]
pub fn normalize<I, S>(raw: I) -> Vec<Tag>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .flat_map(|entry| {
            entry
                .as_ref()
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty() && *t != "@")
                .map(Tag::new)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Converts [`Tag`]s back into plain strings.
#[must_use]
pub fn to_strings(tags: &[Tag]) -> Vec<String> {
    tags.iter().map(|t| t.as_str().to_owned()).collect()
}

/// Returns the case-insensitive intersection of `candidates` and
/// `scenario_tags`.
///
/// [`None`] means no overlap at all, which lets callers tell it apart from a
/// trivially empty match.
#[must_use]
pub fn matches(candidates: &[Tag], scenario_tags: &[Tag]) -> Option<Vec<Tag>> {
    let found = candidates
        .iter()
        .filter(|c| scenario_tags.contains(*c))
        .unique()
        .cloned()
        .collect::<Vec<_>>();
    (!found.is_empty()).then_some(found)
}

/// Evaluates the given boolean tag `expression` against `scenario_tags`.
///
/// An absent or blank expression always evaluates to `true`.
///
/// # Errors
///
/// If the `expression` is malformed.
pub fn evaluate(
    expression: Option<&str>,
    scenario_tags: &[Tag],
) -> Result<bool, ConfigError> {
    Ok(TagExpr::parse(expression.unwrap_or_default())?
        .map_or(true, |expr| expr.eval(scenario_tags)))
}

/// Explodes `scenario_tags` over the mutually exclusive `groups`.
///
/// For every group the members present in `scenario_tags` are picked out,
/// and one variant is produced per combination of picks (a group without
/// any present members contributes nothing to a combination). Each variant
/// consists of the untouched tags followed by one pick per group.
///
/// If no group has any member present, the only variant is `scenario_tags`
/// unchanged.
///
/// # Example
///
/// ```rust
/// use picklejar::tag;
///
/// let groups = vec![tag::normalize(["@a, @b"]), tag::normalize(["@c, @d"])];
/// let variants = tag::explode(&groups, &tag::normalize(["@a, @b, @c, @d"]));
///
/// assert_eq!(variants.len(), 4);
/// assert_eq!(tag::to_strings(&variants[1]), ["@a", "@d"]);
/// ```
#[must_use]
pub fn explode(groups: &[Vec<Tag>], scenario_tags: &[Tag]) -> Vec<Vec<Tag>> {
    let mut remaining = scenario_tags.to_vec();

    let picks = groups
        .iter()
        .map(|group| {
            let present = group
                .iter()
                .filter(|t| remaining.contains(*t))
                .unique()
                .cloned()
                .collect::<Vec<_>>();
            remaining.retain(|t| !present.contains(t));
            present
        })
        .collect::<Vec<_>>();

    if picks.iter().all(Vec::is_empty) {
        return vec![scenario_tags.to_vec()];
    }

    picks
        .into_iter()
        .map(|present| {
            if present.is_empty() {
                vec![None]
            } else {
                present.into_iter().map(Some).collect()
            }
        })
        .multi_cartesian_product()
        .map(|combination| {
            remaining
                .iter()
                .cloned()
                .chain(combination.into_iter().flatten())
                .collect()
        })
        .collect()
}

/// Parsed boolean tag expression.
///
/// Accepts the `and`/`or`/`not`/parentheses grammar of [tag expressions][1],
/// plus the shorthand of a comma-separated tag list (meaning "any of"). Tags
/// may be written with or without the [`MARKER`].
///
/// [1]: https://cucumber.io/docs/cucumber/api#tag-expressions
#[derive(Clone, Debug)]
pub struct TagExpr {
    /// Source text this [`TagExpr`] was parsed from.
    source: String,

    /// Parsed operation tree.
    op: TagOperation,
}

impl TagExpr {
    /// Parses the given `expression`, returning [`None`] for a blank one.
    ///
    /// # Errors
    ///
    /// If the `expression` is malformed.
    pub fn parse(expression: &str) -> Result<Option<Self>, ConfigError> {
        let canonical = canonicalize(expression);
        if canonical.is_empty() {
            return Ok(None);
        }
        let op = canonical.parse::<TagOperation>().map_err(|e| {
            ConfigError::invalid_tag_expression(expression, e.to_string())
        })?;
        Ok(Some(Self { source: expression.trim().to_owned(), op }))
    }

    /// Builds a [`TagExpr`] matching any of the given `tags`.
    ///
    /// Returns [`None`] if `tags` is empty.
    #[must_use]
    pub fn any_of(tags: &[Tag]) -> Option<Self> {
        let source = tags.iter().join(" or ");
        let mut tags = tags.iter();
        let first = TagOperation::Tag(tags.next()?.name().to_owned());
        let op = tags.fold(first, |acc, t| {
            TagOperation::Or(
                Box::new(acc),
                Box::new(TagOperation::Tag(t.name().to_owned())),
            )
        });
        Some(Self { source, op })
    }

    /// Returns the source text of this [`TagExpr`].
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluates this [`TagExpr`] against the given `tags`.
    #[must_use]
    pub fn eval(&self, tags: &[Tag]) -> bool {
        self.op.eval(tags.iter().map(Tag::as_str))
    }
}

impl fmt::Display for TagExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for TagExpr {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)?.ok_or_else(|| {
            ConfigError::invalid_tag_expression(s, "empty expression")
        })
    }
}

/// Rewrites the `expression` into the strict [`TagOperation`] grammar:
/// commas become `or`, and bare tag names get their [`MARKER`].
fn canonicalize(expression: &str) -> String {
    let spaced = expression
        .replace('(', " ( ")
        .replace(')', " ) ")
        .replace(',', " or ");
    spaced
        .split_whitespace()
        .map(|token| match token.to_lowercase().as_str() {
            "and" | "or" | "not" | "(" | ")" => token.to_lowercase(),
            _ => Tag::new(token).as_str().to_owned(),
        })
        .join(" ")
}

/// Extension of a [`TagOperation`] allowing to evaluate it.
#[sealed]
pub trait Ext {
    /// Evaluates this [`TagOperation`] for the given `tags`, ignoring case
    /// and [`MARKER`]s.
    #[must_use]
    fn eval<I, S>(&self, tags: I) -> bool
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S> + Clone;
}

#[sealed]
impl Ext for TagOperation {
    fn eval<I, S>(&self, tags: I) -> bool
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S> + Clone,
    {
        match self {
            Self::And(l, r) => l.eval(tags.clone()) & r.eval(tags),
            Self::Or(l, r) => l.eval(tags.clone()) | r.eval(tags),
            Self::Not(t) => !t.eval(tags),
            Self::Tag(t) => {
                let t = Tag::new(t);
                tags.into_iter().any(|tag| t.is(tag.as_ref()))
            }
        }
    }
}
