//! Typed records parsed from a cleaned solver log.

use crate::error::{ConvError, Result};
use crate::schema::{ColumnKind, ColumnSchema};

/// A single field of a [`Record`].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Field of a numeric column, coerced while parsing.
    Number(f64),
    /// Field of a text column, kept verbatim.
    Text(String),
}

impl Value {
    /// Returns the field as `f64`, parsing text fields on demand.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(value) => Some(*value),
            Value::Text(token) => token.parse().ok(),
        }
    }

    /// Returns the raw token of a text field.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Number(_) => None,
            Value::Text(token) => Some(token),
        }
    }
}

/// One data row, with values stored in schema order.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// One-based line number within the cleaned log.
    line_number: usize,
    /// Source line, trimmed.
    line: String,
    values: Vec<Value>,
}

impl Record {
    /// Line number this record was parsed from.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Source line exactly as the solver wrote it, minus surrounding whitespace.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Values in schema order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of fields, always equal to the schema length.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Ordered, immutable collection of all records of a log.
#[derive(Clone, Debug)]
pub struct RecordTable {
    schema: ColumnSchema,
    records: Vec<Record>,
}

impl RecordTable {
    /// Parses cleaned lines against `schema`.
    ///
    /// Whitespace-only lines are skipped. Every other line must split into
    /// exactly `schema.len()` tokens, and tokens of numeric columns must parse
    /// as `f64`; the first violation aborts parsing.
    pub fn parse<S: AsRef<str>>(lines: &[S], schema: &ColumnSchema) -> Result<Self> {
        let mut records = Vec::with_capacity(lines.len());

        for (offset, line) in lines.iter().enumerate() {
            let line = line.as_ref().trim();
            let line_number = offset + 1;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }
            if tokens.len() != schema.len() {
                return Err(ConvError::SchemaMismatch {
                    line_number,
                    expected: schema.len(),
                    found: tokens.len(),
                    line: line.to_string(),
                });
            }

            let mut values = Vec::with_capacity(tokens.len());
            for (index, token) in tokens.into_iter().enumerate() {
                let value = match schema.kind(index) {
                    ColumnKind::Numeric => {
                        let number = token.parse::<f64>().map_err(|_| ConvError::TypeCoercion {
                            line_number,
                            column: schema.name(index).to_string(),
                            token: token.to_string(),
                            line: line.to_string(),
                        })?;
                        Value::Number(number)
                    }
                    ColumnKind::Text => Value::Text(token.to_string()),
                };
                values.push(value);
            }

            records.push(Record {
                line_number,
                line: line.to_string(),
                values,
            });
        }

        Ok(Self {
            schema: schema.clone(),
            records,
        })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Schema the table was parsed against.
    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    /// Records in file order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Value of `column` in row `row`, if the row exists.
    pub fn value(&self, row: usize, column: &str) -> Result<Option<&Value>> {
        let index = self.schema.index_of(column)?;
        Ok(self.records.get(row).map(|record| &record.values[index]))
    }

    /// Raw tokens of a column, regardless of its declared kind.
    pub fn text_column(&self, column: &str) -> Result<Vec<String>> {
        let index = self.schema.index_of(column)?;
        Ok(self
            .records
            .iter()
            .map(|record| match &record.values[index] {
                Value::Number(value) => value.to_string(),
                Value::Text(token) => token.clone(),
            })
            .collect())
    }

    /// Values of `column` as `f64`.
    ///
    /// Text columns are coerced here; the first non-numeric token yields a
    /// [`ConvError::TypeCoercion`] naming its line.
    pub fn numeric_column(&self, column: &str) -> Result<Vec<f64>> {
        let index = self.schema.index_of(column)?;
        self.records
            .iter()
            .map(|record| {
                let value = &record.values[index];
                value.as_f64().ok_or_else(|| ConvError::TypeCoercion {
                    line_number: record.line_number,
                    column: column.to_string(),
                    token: value.as_text().unwrap_or_default().to_string(),
                    line: record.line.clone(),
                })
            })
            .collect()
    }
}
