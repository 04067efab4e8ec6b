//! Tabular query results and the column algebra used by the merge engine
//!
//! A [`ResultSet`] is an ordered list of column names plus rows of cells.
//! Cells keep the text rendering produced by the store (`None` is SQL NULL),
//! so values survive CSV serialization without precision loss.

use crate::domain::{BisyncError, Result};
use std::collections::HashMap;

/// A single scalar value; `None` is SQL NULL
pub type Cell = Option<String>;

/// Ordered rows with an ordered list of column names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl ResultSet {
    /// Create an empty result set with the given columns
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Create a result set from columns and rows
    ///
    /// # Errors
    ///
    /// Returns an error if any row width differs from the column count.
    pub fn with_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        let mut set = Self::new(columns);
        for row in rows {
            set.push_row(row)?;
        }
        Ok(set)
    }

    /// Append a row
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(BisyncError::Uncaught(format!(
                "row has {} values but result set has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column with this name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// The first column, used as the merge primary key
    pub fn first_column(&self) -> Option<&str> {
        self.columns.first().map(String::as_str)
    }

    /// Value of `column` in row `row`
    pub fn value(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Keep only the named columns, in the order given
    ///
    /// # Errors
    ///
    /// Returns an error if a requested column does not exist.
    pub fn project(&self, columns: &[String]) -> Result<ResultSet> {
        let indices = columns
            .iter()
            .map(|name| {
                self.column_index(name).ok_or_else(|| {
                    BisyncError::Uncaught(format!("cannot project missing column '{name}'"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Ok(ResultSet {
            columns: columns.to_vec(),
            rows,
        })
    }

    /// Remove every column whose name is listed; unknown names are ignored
    pub fn drop_columns(&mut self, names: &[String]) {
        let keep: Vec<bool> = self
            .columns
            .iter()
            .map(|c| !names.contains(c))
            .collect();

        self.columns = retain_flagged(std::mem::take(&mut self.columns), &keep);
        for row in &mut self.rows {
            *row = retain_flagged(std::mem::take(row), &keep);
        }
    }

    /// Left-join `other` onto `self` on the `key` column
    ///
    /// Every row of `self` is kept in order. Each one is paired with every
    /// matching row of `other` (in `other`'s order), or with NULLs when
    /// nothing matches. Output columns are the columns of `self` followed by
    /// the non-key columns of `other`; a non-key name present on both sides is
    /// suffixed `_x` on the left and `_y` on the right. NULL keys match NULL
    /// keys.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is missing from either side.
    pub fn left_join(&self, other: &ResultSet, key: &str) -> Result<ResultSet> {
        let left_key = self.column_index(key).ok_or_else(|| {
            BisyncError::Uncaught(format!("join key '{key}' missing from left side"))
        })?;
        let right_key = other.column_index(key).ok_or_else(|| {
            BisyncError::Uncaught(format!("join key '{key}' missing from right side"))
        })?;

        let right_columns: Vec<usize> = (0..other.columns.len())
            .filter(|&i| i != right_key)
            .collect();

        let clashes = |name: &str| name != key && other.columns.iter().any(|c| c == name);
        let mut columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                if clashes(c) {
                    format!("{c}_x")
                } else {
                    c.clone()
                }
            })
            .collect();
        for &i in &right_columns {
            let name = &other.columns[i];
            if name != key && self.columns.contains(name) {
                columns.push(format!("{name}_y"));
            } else {
                columns.push(name.clone());
            }
        }

        let mut index: HashMap<&Cell, Vec<usize>> = HashMap::new();
        for (pos, row) in other.rows.iter().enumerate() {
            index.entry(&row[right_key]).or_default().push(pos);
        }

        let mut rows = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            match index.get(&row[left_key]) {
                Some(matches) => {
                    for &pos in matches {
                        let mut joined = row.clone();
                        joined.extend(right_columns.iter().map(|&i| other.rows[pos][i].clone()));
                        rows.push(joined);
                    }
                }
                None => {
                    let mut joined = row.clone();
                    joined.extend(std::iter::repeat(None).take(right_columns.len()));
                    rows.push(joined);
                }
            }
        }

        Ok(ResultSet { columns, rows })
    }
}

fn retain_flagged<T>(items: Vec<T>, keep: &[bool]) -> Vec<T> {
    items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, &k)| k.then_some(item))
        .collect()
}
