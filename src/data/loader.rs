use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{Float32Type, Float64Type, Int16Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Category, DatasetError, EmissionRecord, EmissionsDataset, CATEGORY_COUNT};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the emissions dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – `Entity, Code, Year, <sector columns…>` (the source layout)
/// * `.parquet` – same column names, one row per record
/// * `.json`    – `[{ "Entity": "...", "Year": 1990, "Agriculture": 1.0, ... }, ...]`
///
/// The `Code` column is never read. Empty sector cells load as missing.
pub fn load_file(path: &Path) -> Result<EmissionsDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        other => return Err(DatasetError::UnsupportedExtension(other.to_string()).into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    let dataset = EmissionsDataset::from_records(records)?;
    log::info!(
        "Loaded {} rows ({} entities, years {}–{}) from {}",
        dataset.len(),
        dataset.entities.len(),
        dataset.domain().min(),
        dataset.domain().max(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Column resolution shared by all formats
// ---------------------------------------------------------------------------

const ENTITY_COLUMN: &str = "Entity";
const YEAR_COLUMN: &str = "Year";
const CODE_COLUMN: &str = "Code";

/// Positions of the columns we read, resolved once from the header/schema.
struct ColumnIndex {
    entity: usize,
    year: usize,
    categories: [usize; CATEGORY_COUNT],
}

impl ColumnIndex {
    fn resolve(lookup: impl Fn(&str) -> Option<usize>) -> Result<Self, DatasetError> {
        let find =
            |name: &str| lookup(name).ok_or_else(|| DatasetError::MissingColumn(name.to_string()));

        let mut categories = [0; CATEGORY_COUNT];
        for cat in Category::ALL {
            categories[cat.index()] = find(cat.column_name())?;
        }

        Ok(ColumnIndex {
            entity: find(ENTITY_COLUMN)?,
            year: find(YEAR_COLUMN)?,
            categories,
        })
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<EmissionRecord>> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

/// Parse CSV text with a header row.
pub fn read_csv<R: Read>(source: R) -> Result<Vec<EmissionRecord>> {
    let mut reader = csv::Reader::from_reader(source);
    let headers = reader.headers().context("reading CSV headers")?.clone();
    let columns = ColumnIndex::resolve(|name| headers.iter().position(|h| h.trim() == name))?;
    for header in headers.iter().map(str::trim) {
        let known = [ENTITY_COLUMN, CODE_COLUMN, YEAR_COLUMN].contains(&header)
            || Category::from_column_name(header).is_some();
        if !known {
            log::warn!("Ignoring unknown CSV column '{header}'");
        }
    }

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |idx: usize| row.get(idx).unwrap_or("").trim();

        let entity = cell(columns.entity).to_string();
        let year = parse_year(cell(columns.year), row_no)?;

        let mut values = [None; CATEGORY_COUNT];
        for cat in Category::ALL {
            values[cat.index()] = parse_value(cell(columns.categories[cat.index()]), row_no, cat)?;
        }

        records.push(EmissionRecord {
            entity,
            year,
            values,
        });
    }

    Ok(records)
}

fn parse_year(s: &str, row: usize) -> Result<i32, DatasetError> {
    s.parse::<i32>().map_err(|_| DatasetError::InvalidYear {
        row,
        value: s.to_string(),
    })
}

/// Empty and `NaN` cells are missing values, not errors.
fn parse_value(s: &str, row: usize, cat: Category) -> Result<Option<f64>, DatasetError> {
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    s.parse::<f64>()
        .map(Some)
        .map_err(|_| DatasetError::InvalidNumber {
            row,
            column: cat.column_name().to_string(),
            value: s.to_string(),
        })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default of `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<Vec<EmissionRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    read_json(&text)
}

pub fn read_json(text: &str) -> Result<Vec<EmissionRecord>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        let field = |name: &str| {
            obj.get(name)
                .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
        };

        let entity = field(ENTITY_COLUMN)?
            .as_str()
            .with_context(|| format!("Row {i}: '{ENTITY_COLUMN}' is not a string"))?
            .to_string();

        let year_val = field(YEAR_COLUMN)?;
        let year = year_val
            .as_i64()
            .and_then(|y| i32::try_from(y).ok())
            .ok_or_else(|| DatasetError::InvalidYear {
                row: i,
                value: year_val.to_string(),
            })?;

        let mut values = [None; CATEGORY_COUNT];
        for cat in Category::ALL {
            values[cat.index()] = match field(cat.column_name())? {
                JsonValue::Null => None,
                JsonValue::Number(n) => n.as_f64(),
                other => {
                    return Err(DatasetError::InvalidNumber {
                        row: i,
                        column: cat.column_name().to_string(),
                        value: other.to_string(),
                    }
                    .into())
                }
            };
        }

        records.push(EmissionRecord {
            entity,
            year,
            values,
        });
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the CSV column names.
///
/// Accepted column types:
/// - `Entity`: Utf8 or LargeUtf8
/// - `Year`: Int16, Int32 or Int64
/// - sectors: Float64, Float32 or Int64, nullable
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<EmissionRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let columns = ColumnIndex::resolve(|name| schema.index_of(name).ok())?;

        let entity_col = batch.column(columns.entity);
        let year_col = batch.column(columns.year);

        for row in 0..batch.num_rows() {
            let row_no = records.len();
            let entity = string_at(entity_col, row)
                .with_context(|| format!("Row {row_no}: failed to read '{ENTITY_COLUMN}'"))?
                .unwrap_or_default();

            let raw_year = int_at(year_col, row)
                .with_context(|| format!("Row {row_no}: failed to read '{YEAR_COLUMN}'"))?;
            let year = raw_year
                .and_then(|y| i32::try_from(y).ok())
                .ok_or_else(|| DatasetError::InvalidYear {
                    row: row_no,
                    value: raw_year.map_or_else(|| "null".to_string(), |y| y.to_string()),
                })?;

            let mut values = [None; CATEGORY_COUNT];
            for cat in Category::ALL {
                let col = batch.column(columns.categories[cat.index()]);
                values[cat.index()] = float_at(col, row)
                    .with_context(|| format!("Row {row_no}: failed to read '{cat}'"))?;
            }

            records.push(EmissionRecord {
                entity,
                year,
                values,
            });
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

fn string_at(col: &ArrayRef, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    if let Some(arr) = col.as_string_opt::<i32>() {
        return Ok(Some(arr.value(row).to_string()));
    }
    if let Some(arr) = col.as_string_opt::<i64>() {
        return Ok(Some(arr.value(row).to_string()));
    }
    bail!("expected a string column, got {:?}", col.data_type())
}

fn int_at(col: &ArrayRef, row: usize) -> Result<Option<i64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    if let Some(arr) = col.as_primitive_opt::<Int64Type>() {
        return Ok(Some(arr.value(row)));
    }
    if let Some(arr) = col.as_primitive_opt::<Int32Type>() {
        return Ok(Some(i64::from(arr.value(row))));
    }
    if let Some(arr) = col.as_primitive_opt::<Int16Type>() {
        return Ok(Some(i64::from(arr.value(row))));
    }
    bail!("expected an integer column, got {:?}", col.data_type())
}

fn float_at(col: &ArrayRef, row: usize) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    if let Some(arr) = col.as_primitive_opt::<Float64Type>() {
        let v = arr.value(row);
        return Ok((!v.is_nan()).then_some(v));
    }
    if let Some(arr) = col.as_primitive_opt::<Float32Type>() {
        let v = f64::from(arr.value(row));
        return Ok((!v.is_nan()).then_some(v));
    }
    if let Some(arr) = col.as_primitive_opt::<Int64Type>() {
        return Ok(Some(arr.value(row) as f64));
    }
    bail!("expected a numeric column, got {:?}", col.data_type())
}
