//! Step patterns and their compiled matchers.
//!
//! A [`Pattern`] is either a [Cucumber Expression][1] or a raw [`Regex`]. Both
//! get compiled once, at registration time, into a [`Matcher`] that tests a
//! candidate step text and extracts its parameters.
//!
//! [1]: https://github.com/cucumber/cucumber-expressions#readme

use std::fmt;

use cucumber_expressions::{expand::parameters, Expression, Spanned};
use derive_more::with_trait::Display;
use regex::Regex;

use crate::error::ConfigError;

/// Names of the parameter types built into Cucumber Expressions.
const BUILTIN_PARAMETERS: &[&str] = &["int", "float", "word", "string", ""];

/// Source of a step pattern.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Pattern {
    /// [Cucumber Expression][1], like `I have {int} cucumbers`.
    ///
    /// [1]: https://github.com/cucumber/cucumber-expressions#readme
    Expression(String),

    /// Raw regular expression.
    Regex(String),
}

impl Pattern {
    /// Creates a new [`Pattern::Expression`].
    #[must_use]
    pub fn expression(source: impl Into<String>) -> Self {
        Self::Expression(source.into())
    }

    /// Creates a new [`Pattern::Regex`].
    #[must_use]
    pub fn regex(source: impl Into<String>) -> Self {
        Self::Regex(source.into())
    }

    /// Returns the source text of this [`Pattern`].
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::Expression(s) | Self::Regex(s) => s,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expression(s) => write!(f, "\"{s}\""),
            Self::Regex(s) => write!(f, "/{s}/"),
        }
    }
}

impl From<&str> for Pattern {
    fn from(source: &str) -> Self {
        Self::expression(source)
    }
}

impl From<String> for Pattern {
    fn from(source: String) -> Self {
        Self::Expression(source)
    }
}

impl From<Regex> for Pattern {
    fn from(re: Regex) -> Self {
        Self::Regex(re.as_str().to_owned())
    }
}

/// Custom parameter type usable in [`Pattern::Expression`]s as `{name}`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParameterType {
    /// Name of this parameter type.
    pub name: String,

    /// Regular expression matching a value of this parameter type.
    pub regex: &'static str,
}

impl ParameterType {
    /// Creates a new [`ParameterType`], validating its `name` and `regex`.
    ///
    /// # Errors
    ///
    /// If the `name` is empty, clashes with a built-in parameter type or
    /// contains braces, or if the `regex` doesn't compile.
    pub fn new(
        name: impl Into<String>,
        regex: &'static str,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.is_empty() || name.contains(['{', '}', '(', ')']) {
            return Err(ConfigError::invalid_parameter(
                name,
                "name must be non-empty and must not contain braces",
            ));
        }
        if BUILTIN_PARAMETERS.contains(&name.as_str()) {
            return Err(ConfigError::invalid_parameter(
                name,
                "name clashes with a built-in parameter type",
            ));
        }
        if let Err(e) = Regex::new(regex) {
            return Err(ConfigError::invalid_parameter(name, e.to_string()));
        }
        Ok(Self { name, regex })
    }
}

/// [`parameters::Provider`] of custom [`ParameterType`]s.
#[derive(Clone, Copy, Debug)]
struct Provider<'p>(&'p [ParameterType]);

impl<'s> parameters::Provider<Spanned<'s>> for Provider<'_> {
    type Item = char;
    type Value = &'static str;

    fn get(&self, input: &Spanned<'s>) -> Option<Self::Value> {
        self.0
            .iter()
            .find(|p| p.name == *input.fragment())
            .map(|p| p.regex)
    }
}

/// Kind of a parameter captured by a [`Matcher`].
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum ParamKind {
    /// `{int}`.
    #[display("int")]
    Int,

    /// `{float}`.
    #[display("float")]
    Float,

    /// `{word}`.
    #[display("word")]
    Word,

    /// `{string}`, captured without its surrounding quotes.
    #[display("string")]
    String,

    /// `{}`.
    #[display("anonymous")]
    Anonymous,

    /// Custom [`ParameterType`].
    #[display("{_0}")]
    Custom(String),

    /// Capturing group of a [`Pattern::Regex`].
    #[display("regex")]
    Regex,
}

impl ParamKind {
    fn from_name(name: &str) -> Self {
        match name {
            "int" => Self::Int,
            "float" => Self::Float,
            "word" => Self::Word,
            "string" => Self::String,
            "" => Self::Anonymous,
            custom => Self::Custom(custom.to_owned()),
        }
    }
}

/// Parameter extracted from a step text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Param {
    /// Kind of this parameter.
    pub kind: ParamKind,

    /// Matched text, with quotes stripped from `{string}`s.
    pub value: String,
}

/// Compiled [`Pattern`].
#[derive(Clone, Debug)]
pub struct Matcher {
    /// [`Pattern`] this [`Matcher`] was compiled from.
    pattern: Pattern,

    /// Compiled regular expression.
    regex: Regex,

    /// Parameter kinds in the order of their capturing groups.
    kinds: Vec<ParamKind>,
}

impl Matcher {
    /// Compiles the given [`Pattern`], resolving `custom` parameter types.
    ///
    /// # Errors
    ///
    /// If the [`Pattern`] is malformed or refers an unknown parameter type.
    pub fn compile(
        pattern: Pattern,
        custom: &[ParameterType],
    ) -> Result<Self, ConfigError> {
        let (regex, kinds) = match &pattern {
            Pattern::Expression(expr) => {
                let regex =
                    Expression::regex_with_parameters(expr, Provider(custom))
                        .map_err(|e| {
                            ConfigError::invalid_pattern(expr, e.to_string())
                        })?;
                let kinds = parameter_names(expr)
                    .iter()
                    .map(|n| ParamKind::from_name(n))
                    .collect();
                (regex, kinds)
            }
            Pattern::Regex(src) => {
                let regex = Regex::new(src).map_err(|e| {
                    ConfigError::invalid_pattern(src, e.to_string())
                })?;
                let kinds = vec![ParamKind::Regex; regex.captures_len() - 1];
                (regex, kinds)
            }
        };
        Ok(Self { pattern, regex, kinds })
    }

    /// Returns the [`Pattern`] this [`Matcher`] was compiled from.
    #[must_use]
    pub const fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Tests the given `text`, returning the extracted parameters on a match.
    #[must_use]
    pub fn captures(&self, text: &str) -> Option<Vec<Param>> {
        let caps = self.regex.captures(text)?;
        let groups = caps
            .iter()
            .skip(1)
            .map(|m| m.map_or("", |m| m.as_str()))
            .collect::<Vec<_>>();

        // Custom parameter regexes may carry groups of their own, in which
        // case groups no longer line up with the parameter kinds.
        let aligned = groups.len() == self.kinds.len();
        Some(
            groups
                .into_iter()
                .enumerate()
                .map(|(i, value)| {
                    let kind = if aligned {
                        self.kinds[i].clone()
                    } else {
                        ParamKind::Regex
                    };
                    let value = match kind {
                        ParamKind::String => unquote(value),
                        _ => value.to_owned(),
                    };
                    Param { kind, value }
                })
                .collect(),
        )
    }
}

/// Scans the `{name}` parameters of a Cucumber Expression, skipping escaped
/// braces.
fn parameter_names(expr: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut chars = expr.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                _ = chars.next();
            }
            '{' => {
                names.push(chars.by_ref().take_while(|c| *c != '}').collect());
            }
            _ => {}
        }
    }
    names
}

/// Strips the surrounding quotes of a `{string}` and unescapes the quote
/// character inside it.
fn unquote(value: &str) -> String {
    let mut chars = value.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open @ ('"' | '\'')), Some(close)) if open == close => chars
            .as_str()
            .replace(&format!("\\{open}"), &open.to_string()),
        _ => value.to_owned(),
    }
}
