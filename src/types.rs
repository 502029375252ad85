//! Core data model types.
//!
//! The decoder turns CSV text into loosely typed records ([`Value`] cells laid out by a
//! [`Schema`]). The worker then projects each record into a strongly typed [`Row`], which is the
//! unit everything above ingestion works with.

use crate::error::{IngestionError, IngestionResult};

/// Logical data type for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// UTF-8 string.
    Utf8,
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// A list of fields describing the expected shape of incoming data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// The column set every EWAS association file carries.
    ///
    /// `Source` is deliberately absent: it is assigned during ingestion, not read from the file.
    pub fn ewas() -> Self {
        Self::new(vec![
            Field::new("Phenotype", DataType::Utf8),
            Field::new("Tissue", DataType::Utf8),
            Field::new("Type", DataType::Utf8),
            Field::new("Method", DataType::Utf8),
            Field::new("N", DataType::Int64),
            Field::new("CpG", DataType::Utf8),
            Field::new("Location", DataType::Utf8),
            Field::new("Gene", DataType::Utf8),
            Field::new("Beta", DataType::Float64),
            Field::new("P", DataType::Float64),
        ])
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A single loosely typed cell produced by the decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// String form of the value. `Null` becomes the empty string.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Int64(v) => v.to_string(),
            Value::Float64(v) => v.to_string(),
            Value::Bool(v) => v.to_string(),
            Value::Utf8(s) => s.clone(),
        }
    }

    /// Numeric cast; anything that is not a finite number becomes `NaN`.
    pub fn to_f64(&self) -> f64 {
        match self {
            Value::Int64(v) => *v as f64,
            Value::Float64(v) if v.is_finite() => *v,
            Value::Utf8(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .unwrap_or(f64::NAN),
            Value::Float64(_) | Value::Null | Value::Bool(_) => f64::NAN,
        }
    }

    /// Cast to a non-negative integer count; `None` when the value is missing, negative,
    /// fractional or not numeric.
    pub fn to_count(&self) -> Option<u64> {
        match self {
            Value::Int64(v) => u64::try_from(*v).ok(),
            Value::Float64(v) if v.is_finite() && *v >= 0.0 && v.fract() == 0.0 => Some(*v as u64),
            Value::Utf8(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        }
    }
}

/// In-memory tabular dataset of decoded records.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Project every record into a [`Row`] tagged with `source`.
    pub fn to_rows(&self, source: &str) -> IngestionResult<Vec<Row>> {
        let projection = RowProjection::new(&self.schema)?;
        Ok(self
            .rows
            .iter()
            .map(|record| projection.project(record, source))
            .collect())
    }
}

/// One EWAS association record.
///
/// Missing or non-numeric `beta`/`p` are `NaN`; a missing or invalid sample size is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub phenotype: String,
    pub tissue: String,
    pub r#type: String,
    pub method: String,
    pub n: Option<u64>,
    pub cpg: String,
    pub location: String,
    pub gene: String,
    pub beta: f64,
    pub p: f64,
    /// Label of the file the row was read from.
    pub source: String,
}

/// Precomputed column positions for projecting decoded records into [`Row`]s.
#[derive(Debug, Clone, Copy)]
pub struct RowProjection {
    phenotype: usize,
    tissue: usize,
    r#type: usize,
    method: usize,
    n: usize,
    cpg: usize,
    location: usize,
    gene: usize,
    beta: usize,
    p: usize,
}

impl RowProjection {
    /// Resolve the EWAS columns within `schema`.
    pub fn new(schema: &Schema) -> IngestionResult<Self> {
        let idx = |name: &str| {
            schema
                .index_of(name)
                .ok_or_else(|| IngestionError::SchemaMismatch {
                    message: format!(
                        "schema has no '{name}' field. fields={:?}",
                        schema.field_names().collect::<Vec<_>>()
                    ),
                })
        };
        Ok(Self {
            phenotype: idx("Phenotype")?,
            tissue: idx("Tissue")?,
            r#type: idx("Type")?,
            method: idx("Method")?,
            n: idx("N")?,
            cpg: idx("CpG")?,
            location: idx("Location")?,
            gene: idx("Gene")?,
            beta: idx("Beta")?,
            p: idx("P")?,
        })
    }

    /// Coerce one record into a [`Row`]. Never fails: bad numbers become `NaN`/`None`.
    pub fn project(&self, record: &[Value], source: &str) -> Row {
        static MISSING: Value = Value::Null;
        let cell = |i: usize| record.get(i).unwrap_or(&MISSING);
        Row {
            phenotype: cell(self.phenotype).to_text(),
            tissue: cell(self.tissue).to_text(),
            r#type: cell(self.r#type).to_text(),
            method: cell(self.method).to_text(),
            n: cell(self.n).to_count(),
            cpg: cell(self.cpg).to_text(),
            location: cell(self.location).to_text(),
            gene: cell(self.gene).to_text(),
            beta: cell(self.beta).to_f64(),
            p: cell(self.p).to_f64(),
            source: source.to_owned(),
        }
    }
}
