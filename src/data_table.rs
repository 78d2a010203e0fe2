// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Data tables attached to steps.

use std::{collections::HashMap, fmt};

use derive_more::with_trait::Error;
use serde::{Deserialize, Serialize};

/// Table attached to a step, as rows of cells.
///
/// ```rust
/// use picklejar::DataTable;
///
/// let table = DataTable::from(vec![
///     vec!["name", "age"],
///     vec!["Alice", "30"],
///     vec!["Bob", "25"],
/// ]);
///
/// assert_eq!(table.hashes()[1]["age"], "25");
/// assert_eq!(table.rows(), &[vec!["Alice", "30"], vec!["Bob", "25"]]);
/// ```
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DataTable {
    rows: Vec<Vec<String>>,
}

/// Error of a [`DataTable`] not having the shape requested from it.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub struct ShapeError {
    /// Index of the offending row.
    #[error(not(source))]
    pub row: usize,

    /// Expected number of cells.
    pub expected: usize,

    /// Actual number of cells.
    pub actual: usize,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "data table row {} has {} cells, expected {}",
            self.row + 1,
            self.actual,
            self.expected,
        )
    }
}

impl DataTable {
    /// Creates a new [`DataTable`] out of the given `rows`.
    #[must_use]
    pub const fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Returns all the rows, including the header one.
    #[must_use]
    pub fn raw(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns all the rows except the header one.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or_default()
    }

    /// Returns the header row, if any.
    #[must_use]
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Maps every non-header row to a map keyed by the header cells.
    #[must_use]
    pub fn hashes(&self) -> Vec<HashMap<&str, &str>> {
        let Some(header) = self.header() else {
            return Vec::new();
        };
        self.rows()
            .iter()
            .map(|row| {
                header
                    .iter()
                    .map(String::as_str)
                    .zip(row.iter().map(String::as_str))
                    .collect()
            })
            .collect()
    }

    /// Maps a two-column table, first column being keys, second being values.
    ///
    /// # Errors
    ///
    /// If any row doesn't have exactly two cells.
    pub fn rows_hash(&self) -> Result<HashMap<&str, &str>, ShapeError> {
        self.rows
            .iter()
            .enumerate()
            .map(|(row, cells)| match cells.as_slice() {
                [k, v] => Ok((k.as_str(), v.as_str())),
                _ => Err(ShapeError { row, expected: 2, actual: cells.len() }),
            })
            .collect()
    }

    /// Returns a new [`DataTable`] with rows and columns swapped.
    ///
    /// Rows shorter than the first one are padded with empty cells.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let width = self.rows.first().map_or(0, Vec::len);
        Self::new(
            (0..width)
                .map(|col| {
                    self.rows
                        .iter()
                        .map(|row| row.get(col).cloned().unwrap_or_default())
                        .collect()
                })
                .collect(),
        )
    }

    /// Indicates whether this [`DataTable`] has no rows at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<Vec<&str>>> for DataTable {
    fn from(rows: Vec<Vec<&str>>) -> Self {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(str::to_owned).collect())
                .collect(),
        )
    }
}

impl From<Vec<Vec<String>>> for DataTable {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self::new(rows)
    }
}

impl From<&gherkin::Table> for DataTable {
    fn from(table: &gherkin::Table) -> Self {
        Self::new(table.rows.clone())
    }
}

impl fmt::Display for DataTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "| {} |", row.join(" | "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> DataTable {
        DataTable::from(vec![
            vec!["name", "age"],
            vec!["Alice", "30"],
            vec!["Bob", "25"],
        ])
    }

    #[test]
    fn splits_header_from_rows() {
        let table = people();
        assert_eq!(table.raw().len(), 3);
        assert_eq!(
            table.header(),
            Some(&["name".to_owned(), "age".to_owned()][..]),
        );
        assert_eq!(table.rows()[0], ["Alice", "30"]);
        assert!(DataTable::default().rows().is_empty());
    }

    #[test]
    fn hashes_by_header() {
        let people = people();
        let hashes = people.hashes();
        assert_eq!(hashes.len(), 2);
        assert_eq!(hashes[0]["name"], "Alice");
        assert_eq!(hashes[1]["age"], "25");
    }

    #[test]
    fn rows_hash_requires_two_columns() {
        let table = DataTable::from(vec![vec!["timeout", "30"], vec!["retries", "3"]]);
        assert_eq!(table.rows_hash().unwrap()["retries"], "3");

        let err = DataTable::from(vec![vec!["a", "b", "c"]]).rows_hash().unwrap_err();
        assert_eq!(err, ShapeError { row: 0, expected: 2, actual: 3 });
        assert_eq!(err.to_string(), "data table row 1 has 3 cells, expected 2");
    }

    #[test]
    fn transposes() {
        let t = people().transpose();
        assert_eq!(t.raw(), &[vec!["name", "Alice", "Bob"], vec!["age", "30", "25"]]);
        assert_eq!(t.transpose(), people());
    }

    #[test]
    fn displays_as_gherkin() {
        let table = DataTable::from(vec![vec!["a", "b"]]);
        assert_eq!(table.to_string(), "| a | b |\n");
    }
}
