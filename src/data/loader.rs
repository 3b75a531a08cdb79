use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{Record, TipsDataset};

/// A small bundled cut of the classic tips dataset, so the dashboard works
/// without any file on disk.
const SAMPLE_CSV: &str = include_str!("../../assets/tips.csv");

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a tips dataset from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – scalar columns matching the schema below (recommended)
/// * `.json`    – records-oriented array, the default `df.to_json(orient='records')`
/// * `.csv`     – header row with the seven schema columns
///
/// Schema: `total_bill`, `tip`, `sex`, `smoker`, `day`, `time`, `size`.
pub fn load_file(path: &Path) -> Result<TipsDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            read_csv(file)
        }
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Parse the bundled sample dataset.
pub fn load_builtin_sample() -> Result<TipsDataset> {
    read_csv(SAMPLE_CSV.as_bytes())
}

// ---------------------------------------------------------------------------
// Raw (string-typed) record shared by the CSV and JSON loaders
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawRecord {
    total_bill: f64,
    tip: f64,
    sex: String,
    smoker: String,
    day: String,
    time: String,
    size: u32,
}

impl RawRecord {
    fn into_record(self, row: usize) -> Result<Record> {
        Ok(Record {
            total_bill: self.total_bill,
            tip: self.tip,
            sex: self.sex.parse().with_context(|| format!("row {row}"))?,
            smoker: self.smoker.parse().with_context(|| format!("row {row}"))?,
            day: self.day.parse().with_context(|| format!("row {row}"))?,
            time: self.time.parse().with_context(|| format!("row {row}"))?,
            size: self.size,
        })
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn read_csv<R: io::Read>(reader: R) -> Result<TipsDataset> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for (row, result) in csv_reader.deserialize::<RawRecord>().enumerate() {
        let raw = result.with_context(|| format!("CSV row {row}"))?;
        records.push(raw.into_record(row)?);
    }

    Ok(TipsDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "total_bill": 16.99, "tip": 1.01, "sex": "Female",
///     "smoker": "No", "day": "Sun", "time": "Dinner", "size": 2 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<TipsDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let raw: Vec<RawRecord> = serde_json::from_str(&text).context("parsing JSON")?;

    let records = raw
        .into_iter()
        .enumerate()
        .map(|(row, r)| r.into_record(row))
        .collect::<Result<Vec<_>>>()?;

    Ok(TipsDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one scalar column per schema field.
///
/// Numeric columns may be Float64/Float32 (bills, tips) and Int64/Int32
/// (size); categorical columns must be strings. Works with files written by
/// both Pandas (`df.to_parquet()`) and Polars (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<TipsDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let column = |name: &str| -> Result<&Arc<dyn Array>> {
            let idx = schema
                .index_of(name)
                .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))?;
            Ok(batch.column(idx))
        };

        let total_bill = column("total_bill")?;
        let tip = column("tip")?;
        let sex = column("sex")?;
        let smoker = column("smoker")?;
        let day = column("day")?;
        let time = column("time")?;
        let size = column("size")?;

        for row in 0..batch.num_rows() {
            let record = Record {
                total_bill: extract_f64(total_bill, row)
                    .with_context(|| format!("row {row}: 'total_bill'"))?,
                tip: extract_f64(tip, row).with_context(|| format!("row {row}: 'tip'"))?,
                sex: extract_str(sex, row)
                    .and_then(|s| Ok(s.parse()?))
                    .with_context(|| format!("row {row}: 'sex'"))?,
                smoker: extract_str(smoker, row)
                    .and_then(|s| Ok(s.parse()?))
                    .with_context(|| format!("row {row}: 'smoker'"))?,
                day: extract_str(day, row)
                    .and_then(|s| Ok(s.parse()?))
                    .with_context(|| format!("row {row}: 'day'"))?,
                time: extract_str(time, row)
                    .and_then(|s| Ok(s.parse()?))
                    .with_context(|| format!("row {row}: 'time'"))?,
                size: extract_u32(size, row).with_context(|| format!("row {row}: 'size'"))?,
            };
            records.push(record);
        }
    }

    Ok(TipsDataset::from_records(records))
}

// -- Arrow helpers --

fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value");
    }
    match col.data_type() {
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            Ok(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            Ok(f64::from(arr.value(row)))
        }
        other => bail!("expected a float column, got {other:?}"),
    }
}

fn extract_u32(col: &Arc<dyn Array>, row: usize) -> Result<u32> {
    if col.is_null(row) {
        bail!("null value");
    }
    let value = match col.data_type() {
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            arr.value(row)
        }
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            i64::from(arr.value(row))
        }
        other => bail!("expected an integer column, got {other:?}"),
    };
    u32::try_from(value).with_context(|| format!("party size {value} out of range"))
}

fn extract_str(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => {
            let arr = col.as_string::<i64>();
            Ok(arr.value(row).to_string())
        }
        other => bail!("expected a string column, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::data::model::{Day, MealTime, Sex, Smoker};

    const CSV: &str = "total_bill,tip,sex,smoker,day,time,size\n\
                       16.99,1.01,Female,No,Sun,Dinner,2\n\
                       10.34,1.66,Male,No,Sun,Dinner,3\n";

    #[test]
    fn csv_round_trip_through_load_file() {
        let mut tmp = NamedTempFile::with_suffix(".csv").unwrap();
        write!(tmp, "{CSV}").unwrap();

        let ds = load_file(tmp.path()).unwrap();
        assert_eq!(ds.len(), 2);

        let first = &ds.records()[0];
        assert_eq!(first.total_bill, 16.99);
        assert_eq!(first.sex, Sex::Female);
        assert_eq!(first.smoker, Smoker::No);
        assert_eq!(first.day, Day::Sun);
        assert_eq!(first.time, MealTime::Dinner);
        assert_eq!(first.size, 2);
    }

    #[test]
    fn json_records_orientation_loads() {
        let json = r#"[
            { "total_bill": 20.0, "tip": 4.0, "sex": "Male",
              "smoker": "Yes", "day": "Sat", "time": "Dinner", "size": 4 }
        ]"#;
        let mut tmp = NamedTempFile::with_suffix(".json").unwrap();
        write!(tmp, "{json}").unwrap();

        let ds = load_file(tmp.path()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].day, Day::Sat);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(load_file(Path::new("tips.xlsx")).is_err());
    }

    #[test]
    fn bad_category_fails_with_row_context() {
        let csv = "total_bill,tip,sex,smoker,day,time,size\n\
                   10.0,1.0,Alien,No,Sun,Dinner,2\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("sex"));
    }

    #[test]
    fn bundled_sample_parses_and_is_nonempty() {
        let ds = load_builtin_sample().unwrap();
        assert!(!ds.is_empty());
        assert!(ds.records().iter().all(|r| r.total_bill > 0.0));
    }
}
