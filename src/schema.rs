//! Named, typed column layout of a solver iteration log.

use std::collections::HashSet;

use crate::error::{ConvError, Result};

/// Columns written by the solver into every data row, in file order.
pub const STANDARD_COLUMNS: [&str; 20] = [
    "Time",
    "LoadStep",
    "SubStep",
    "CumIter",
    "TimeIncr",
    "MaxDOFIncr",
    "LineSearchParameter",
    "Bisection",
    "FCrit",
    "FL2",
    "UCrit",
    "UInf",
    "MCrit",
    "ML2",
    "Remesh",
    "MaxResiF",
    "NodeMaxDOFIncr",
    "DOFMaxDOFIncr",
    "NodeMaxResiF",
    "DOFMaxResiF",
];

/// Columns coerced to floating point unless configured otherwise.
pub const DEFAULT_NUMERIC_COLUMNS: [&str; 4] = ["Time", "CumIter", "FCrit", "FL2"];

/// Semantic type attached to a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    /// Token is parsed as `f64` while the table is built.
    Numeric,
    /// Token is kept verbatim.
    Text,
}

/// A single `(name, kind)` entry of a [`ColumnSchema`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

/// Ordered list of named columns, validated on construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnSchema {
    columns: Vec<ColumnSpec>,
}

impl ColumnSchema {
    /// Builds a schema from ordered `(name, kind)` pairs.
    ///
    /// Fails if the list is empty or a name repeats.
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, ColumnKind)>,
        S: Into<String>,
    {
        let columns: Vec<ColumnSpec> = columns
            .into_iter()
            .map(|(name, kind)| ColumnSpec {
                name: name.into(),
                kind,
            })
            .collect();

        if columns.is_empty() {
            return Err(ConvError::invalid_schema("at least one column is required"));
        }

        let mut seen = HashSet::new();
        for column in &columns {
            if column.name.is_empty() || column.name.chars().any(char::is_whitespace) {
                return Err(ConvError::invalid_schema(format!(
                    "column name `{}` must be non-empty and free of whitespace",
                    column.name
                )));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(ConvError::invalid_schema(format!(
                    "column `{}` is declared twice",
                    column.name
                )));
            }
        }

        Ok(Self { columns })
    }

    /// The 20-column solver layout with every column kept as text.
    pub fn standard() -> Self {
        Self {
            columns: STANDARD_COLUMNS
                .iter()
                .map(|name| ColumnSpec {
                    name: (*name).to_string(),
                    kind: ColumnKind::Text,
                })
                .collect(),
        }
    }

    /// Marks the named columns as numeric, leaving every other column untouched.
    pub fn with_numeric<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self> {
        for name in names {
            let name = name.as_ref();
            let index = self.index_of(name)?;
            self.columns[index].kind = ColumnKind::Numeric;
        }
        Ok(self)
    }

    /// Number of columns every data line must carry.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always `false` for a validated schema; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterates over the column entries in order.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter()
    }

    /// Position of `name` within the schema.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|column| column.name == name)
            .ok_or_else(|| ConvError::unknown_column(name))
    }

    /// Kind of the column at `index`.
    pub fn kind(&self, index: usize) -> ColumnKind {
        self.columns[index].kind
    }

    /// Name of the column at `index`.
    pub fn name(&self, index: usize) -> &str {
        &self.columns[index].name
    }
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_schema_has_twenty_text_columns() {
        let schema = ColumnSchema::standard();
        assert_eq!(schema.len(), 20);
        assert!(schema.columns().all(|c| c.kind == ColumnKind::Text));
        assert_eq!(schema.index_of("Bisection").unwrap(), 7);
        assert_eq!(schema.name(19), "DOFMaxResiF");
    }

    #[test]
    fn with_numeric_marks_only_listed_columns() {
        let schema = ColumnSchema::standard()
            .with_numeric(&DEFAULT_NUMERIC_COLUMNS)
            .unwrap();
        let numeric: Vec<&str> = schema
            .columns()
            .filter(|c| c.kind == ColumnKind::Numeric)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(numeric, vec!["Time", "CumIter", "FCrit", "FL2"]);
    }

    #[test]
    fn with_numeric_rejects_unknown_column() {
        let result = ColumnSchema::standard().with_numeric(&["Pressure"]);
        assert!(matches!(result, Err(ConvError::UnknownColumn { .. })));
    }

    #[test]
    fn new_rejects_duplicates_and_empty() {
        let dup = ColumnSchema::new([("a", ColumnKind::Text), ("a", ColumnKind::Numeric)]);
        assert!(matches!(dup, Err(ConvError::InvalidSchema { .. })));

        let empty = ColumnSchema::new(Vec::<(String, ColumnKind)>::new());
        assert!(matches!(empty, Err(ConvError::InvalidSchema { .. })));
    }
}
