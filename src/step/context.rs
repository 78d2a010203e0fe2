//! Context handed to a step handler.

use std::{fmt::Display, str::FromStr};

use anyhow::anyhow;
use gherkin::StepType;

use crate::{DataTable, DocString};

use super::{location::Location, pattern::Param};

/// Data attached to a step: either a [`DataTable`] or a [`DocString`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StepData {
    /// Table following the step.
    Table(DataTable),

    /// Free-text block following the step.
    DocString(DocString),
}

impl StepData {
    /// Creates a new [`StepData::Table`] out of the given `rows`.
    #[must_use]
    pub fn table(rows: Vec<Vec<String>>) -> Self {
        Self::Table(DataTable::new(rows))
    }

    /// Creates a new [`StepData::DocString`].
    #[must_use]
    pub fn doc_string(content: impl Into<String>, media_type: Option<&str>) -> Self {
        Self::DocString(DocString::new(content, media_type))
    }

    /// Returns a short description of the kind of this [`StepData`].
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Table(_) => "data table",
            Self::DocString(_) => "doc string",
        }
    }
}

/// Context of a step handler invocation.
#[derive(Clone, Debug)]
pub struct Context {
    /// Type of the step, as given by its keyword.
    pub step_type: StepType,

    /// Text of the step.
    pub step: String,

    /// Source line of the step.
    pub line: usize,

    /// Parameters extracted from the step text.
    pub params: Vec<Param>,

    /// Data attached to the step.
    pub data: Option<StepData>,

    /// Where the matched step definition was registered.
    pub location: Location,
}

impl Context {
    /// Returns the raw text of the parameter at the given `index`.
    #[must_use]
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(|p| p.value.as_str())
    }

    /// Parses the parameter at the given `index` into `T`.
    ///
    /// # Errors
    ///
    /// If there is no such parameter, or it cannot be parsed.
    pub fn parse<T>(&self, index: usize) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self
            .param(index)
            .ok_or_else(|| anyhow!("step has no parameter #{index}"))?;
        raw.parse()
            .map_err(|e| anyhow!("cannot parse parameter #{index} `{raw}`: {e}"))
    }

    /// Returns the attached [`DataTable`], if any.
    #[must_use]
    pub const fn data_table(&self) -> Option<&DataTable> {
        match &self.data {
            Some(StepData::Table(t)) => Some(t),
            _ => None,
        }
    }

    /// Returns the attached [`DocString`], if any.
    #[must_use]
    pub const fn doc_string(&self) -> Option<&DocString> {
        match &self.data {
            Some(StepData::DocString(d)) => Some(d),
            _ => None,
        }
    }
}
