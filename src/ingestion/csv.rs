//! CSV decoding.
//!
//! The decoder does not reject values that disagree with their field type. Cells of `Utf8`
//! fields are kept as trimmed text; cells of numeric fields are coerced best-effort into a
//! [`Value`] (numeric-looking text becomes a number, `true`/`false` become booleans). Blank cells
//! become [`Value::Null`]. Turning a record into a typed [`crate::types::Row`] is the worker's
//! job.

use std::io::Read;
use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, DataType, Schema, Value};

/// Reader settings used for every EWAS file: headers required, ragged rows tolerated.
pub fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).flexible(true);
    builder
}

/// Ingest a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain all schema fields (order can differ).
/// - Rows whose cells are all blank are skipped.
pub fn ingest_csv_from_path(path: impl AsRef<Path>, schema: &Schema) -> IngestionResult<DataSet> {
    let mut rdr = reader_builder().from_path(path)?;
    ingest_csv_from_reader(&mut rdr, schema)
}

/// Ingest CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
) -> IngestionResult<DataSet> {
    let mut rows: Vec<Vec<Value>> = Vec::new();
    decode_records(rdr, schema, |record| rows.push(record))?;
    Ok(DataSet::new(schema.clone(), rows))
}

/// Stream records from `reader`, handing them to `on_chunk` in groups of `chunk_size`.
///
/// The final chunk may be shorter. Returns the number of records decoded. On error, chunks that
/// were already delivered stay delivered.
pub fn decode_csv_chunks<R, F>(
    reader: R,
    schema: &Schema,
    chunk_size: usize,
    mut on_chunk: F,
) -> IngestionResult<usize>
where
    R: Read,
    F: FnMut(Vec<Vec<Value>>),
{
    let chunk_size = chunk_size.max(1);
    let mut rdr = reader_builder().from_reader(reader);
    let mut chunk = Vec::with_capacity(chunk_size);

    let total = decode_records(&mut rdr, schema, |record| {
        chunk.push(record);
        if chunk.len() >= chunk_size {
            on_chunk(std::mem::replace(&mut chunk, Vec::with_capacity(chunk_size)));
        }
    })?;

    if !chunk.is_empty() {
        on_chunk(chunk);
    }
    Ok(total)
}

fn decode_records<R, F>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
    mut on_record: F,
) -> IngestionResult<usize>
where
    R: Read,
    F: FnMut(Vec<Value>),
{
    let headers = rdr.headers()?.clone();
    let col_idxs = resolve_columns(&headers, schema)?;

    let mut total = 0usize;
    let mut record = csv::StringRecord::new();
    while rdr.read_record(&mut record)? {
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let row = col_idxs
            .iter()
            .zip(&schema.fields)
            .map(|(&idx, field)| decode_cell(record.get(idx).unwrap_or(""), field.data_type))
            .collect();
        on_record(row);
        total += 1;
    }
    Ok(total)
}

/// Map schema fields -> CSV column indexes (allows re-ordered CSV columns).
fn resolve_columns(headers: &csv::StringRecord, schema: &Schema) -> IngestionResult<Vec<usize>> {
    let mut col_idxs = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        match headers.iter().position(|h| h.trim() == field.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(IngestionError::SchemaMismatch {
                    message: format!(
                        "missing required column '{field}'. headers={:?}",
                        headers.iter().collect::<Vec<_>>(),
                        field = field.name
                    ),
                });
            }
        }
    }
    Ok(col_idxs)
}

/// Decode one cell for a field of type `data_type`.
///
/// Text fields keep the trimmed cell verbatim (so `007` or `1e5` in a CpG or gene column are not
/// reinterpreted as numbers); numeric fields go through [`coerce_cell`].
pub fn decode_cell(raw: &str, data_type: DataType) -> Value {
    match data_type {
        DataType::Utf8 => match raw.trim() {
            "" => Value::Null,
            text => Value::Utf8(text.to_owned()),
        },
        DataType::Int64 | DataType::Float64 => coerce_cell(raw),
    }
}

/// Best-effort dynamic typing of a single cell.
pub fn coerce_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if looks_numeric(trimmed) {
        if let Ok(v) = trimmed.parse::<i64>() {
            return Value::Int64(v);
        }
        if let Ok(v) = trimmed.parse::<f64>() {
            return Value::Float64(v);
        }
    }
    match trimmed {
        "true" | "TRUE" | "True" => Value::Bool(true),
        "false" | "FALSE" | "False" => Value::Bool(false),
        _ => Value::Utf8(trimmed.to_owned()),
    }
}

// `f64::from_str` also accepts "inf"/"NaN"; those stay text.
fn looks_numeric(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_digit())
        && s
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
}
