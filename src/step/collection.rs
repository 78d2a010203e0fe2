//! Step definitions storage and matching.

use derive_more::with_trait::Debug;
use gherkin::StepType;

use super::{
    error::{AmbiguousStep, MatchError, UndefinedStep},
    location::Location,
    pattern::{Matcher, Param, ParameterType, Pattern},
    snippet, Context, StepData, StepFn,
};
use crate::error::ConfigError;

/// Registered step definition.
#[derive(Debug)]
pub struct Definition<W> {
    /// Keyword the definition was registered with.
    ///
    /// Matching doesn't depend on it: any keyword may use any definition.
    pub keyword: StepType,

    /// Compiled pattern.
    pub matcher: Matcher,

    /// Priority disambiguating overlapping patterns, higher wins.
    pub priority: i32,

    /// Handler of the step.
    #[debug("{handler:p}")]
    pub handler: StepFn<W>,

    /// Where this definition was registered.
    pub location: Location,
}

/// Result of a successful [`Collection::find()`].
#[derive(Debug)]
pub struct Match<'c, W> {
    /// Matched [`Definition`].
    pub definition: &'c Definition<W>,

    /// Parameters extracted from the step text.
    pub params: Vec<Param>,
}

impl<W> Match<'_, W> {
    /// Builds the [`Context`] for invoking the matched handler.
    #[must_use]
    pub fn context(
        &self,
        step_type: StepType,
        step: &str,
        line: usize,
        data: Option<StepData>,
    ) -> Context {
        Context {
            step_type,
            step: step.to_owned(),
            line,
            params: self.params.clone(),
            data,
            location: self.definition.location,
        }
    }
}

/// Append-only collection of step [`Definition`]s.
#[derive(Debug)]
pub struct Collection<W> {
    /// Registered definitions, in registration order.
    definitions: Vec<Definition<W>>,

    /// Custom parameter types available to expressions.
    parameters: Vec<ParameterType>,
}

// Implemented manually to omit redundant `W: Default` trait bound, imposed by
// `#[derive(Default)]`.
impl<W> Default for Collection<W> {
    fn default() -> Self {
        Self { definitions: Vec::new(), parameters: Vec::new() }
    }
}

impl<W> Collection<W> {
    /// Creates a new empty [`Collection`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a custom parameter type, usable as `{name}` by expressions
    /// registered afterwards.
    ///
    /// # Errors
    ///
    /// If the parameter type is malformed or already defined.
    pub fn define_parameter(
        &mut self,
        name: impl Into<String>,
        regex: &'static str,
    ) -> Result<(), ConfigError> {
        let param = ParameterType::new(name, regex)?;
        if self.parameters.iter().any(|p| p.name == param.name) {
            return Err(ConfigError::invalid_parameter(
                param.name,
                "already defined",
            ));
        }
        self.parameters.push(param);
        Ok(())
    }

    /// Compiles the `pattern` and registers a new [`Definition`].
    ///
    /// # Errors
    ///
    /// If the `pattern` doesn't compile.
    pub fn add(
        &mut self,
        keyword: StepType,
        pattern: Pattern,
        priority: i32,
        handler: StepFn<W>,
        location: Location,
    ) -> Result<(), ConfigError> {
        let matcher = Matcher::compile(pattern, &self.parameters)?;
        tracing::trace!(%location, pattern = %matcher.pattern(), priority, "registered step");
        self.definitions.push(Definition {
            keyword,
            matcher,
            priority,
            handler,
            location,
        });
        Ok(())
    }

    /// Returns the number of registered [`Definition`]s.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Indicates whether no [`Definition`]s are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Returns the registered [`Definition`]s, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Definition<W>> {
        self.definitions.iter()
    }

    /// Finds the single [`Definition`] matching the given step `text`.
    ///
    /// Only matches at the highest matching priority are considered, so a
    /// higher-priority match discards any lower-priority ones regardless of
    /// registration order.
    ///
    /// # Errors
    ///
    /// - [`MatchError::Undefined`] if nothing matches, with a snippet
    ///   implementing the step.
    /// - [`MatchError::Ambiguous`] if several definitions match at the
    ///   winning priority.
    pub fn find(
        &self,
        step_type: StepType,
        text: &str,
        data: Option<&StepData>,
    ) -> Result<Match<'_, W>, MatchError> {
        let mut winning: Option<i32> = None;
        let mut found = Vec::new();

        for definition in &self.definitions {
            let Some(params) = definition.matcher.captures(text) else {
                continue;
            };
            match winning {
                Some(p) if definition.priority < p => continue,
                Some(p) if definition.priority == p => {}
                _ => {
                    winning = Some(definition.priority);
                    found.clear();
                }
            }
            found.push(Match { definition, params });
        }

        match found.len() {
            0 => Err(UndefinedStep::new(
                text,
                snippet::generate(step_type, text, data),
            )
            .into()),
            1 => Ok(found.swap_remove(0)),
            _ => Err(AmbiguousStep {
                step: text.to_owned(),
                priority: winning.unwrap_or_default(),
                candidates: found
                    .iter()
                    .map(|m| {
                        (m.definition.matcher.pattern().clone(), m.definition.location)
                    })
                    .collect(),
            }
            .into()),
        }
    }
}
