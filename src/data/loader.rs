use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Array, Float64Array, Int64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::DataError;
use super::model::{Dataset, PassengerRecord, REQUIRED_COLUMNS};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a passenger dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row `sex,pclass,embark_town,age,fare,family_size,survived`
/// * `.json`    – `[{ "sex": "male", "pclass": 3, ... }, ...]`
/// * `.parquet` – one column per field, as written by `df.to_parquet()`
pub fn load_file(path: &Path) -> Result<Dataset> {
    let bytes = std::fs::read(path).map_err(|source| DataError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    load_bytes(path, bytes)
}

/// Parse the already read content of `path`, choosing the format by the
/// path's extension. The file itself is not opened again.
pub fn load_bytes(path: &Path, bytes: Vec<u8>) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => read_csv(&bytes[..]),
        "json" => read_json(&bytes[..]),
        "parquet" | "pq" => read_parquet(Bytes::from(bytes)),
        other => Err(DataError::UnsupportedExtension(other.to_string()).into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!("Loaded {} passengers from {}", dataset.len(), path.display());
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with at least the required column names, in any
/// order. Unknown columns are ignored; empty `age`, `fare` or `embark_town`
/// cells load as absent.
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers().context("reading CSV headers")?.clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DataError::MissingColumn {
                source_kind: "CSV",
                column,
            }
            .into());
        }
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<PassengerRecord>().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(record);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "sex": "male", "pclass": 3, "embark_town": "Southampton",
///     "age": 22.0, "fare": 7.25, "family_size": 2, "survived": 0 },
///   ...
/// ]
/// ```
pub fn read_json<R: Read>(reader: R) -> Result<Dataset> {
    let records: Vec<PassengerRecord> =
        serde_json::from_reader(reader).context("parsing JSON passenger records")?;
    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Parse in-memory Parquet content with one column per passenger field.
///
/// Integer, float and boolean physical types are accepted interchangeably
/// for the numeric columns; `embark_town`, `age` and `fare` may be null.
pub fn read_parquet(content: Bytes) -> Result<Dataset> {
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(content).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let offset = records.len();
        records.extend(batch_records(&batch, offset)?);
    }

    Ok(Dataset::from_records(records))
}

fn batch_records(batch: &RecordBatch, offset: usize) -> Result<Vec<PassengerRecord>> {
    let sex = string_column(batch, "sex")?;
    let town = string_column(batch, "embark_town")?;
    let pclass = int_column(batch, "pclass")?;
    let family_size = int_column(batch, "family_size")?;
    let survived = int_column(batch, "survived")?;
    let age = float_column(batch, "age")?;
    let fare = float_column(batch, "fare")?;

    (0..batch.num_rows())
        .map(|row| -> Result<PassengerRecord> {
            let required_int = |arr: &Int64Array, column: &'static str| {
                if arr.is_null(row) {
                    Err(DataError::EmptyCell {
                        row: offset + row,
                        column,
                    })
                } else {
                    Ok(arr.value(row))
                }
            };
            if sex.is_null(row) {
                return Err(DataError::EmptyCell {
                    row: offset + row,
                    column: "sex",
                }
                .into());
            }
            Ok(PassengerRecord {
                sex: sex.value(row).to_string(),
                pclass: required_int(&pclass, "pclass")?,
                embark_town: (!town.is_null(row)).then(|| town.value(row).to_string()),
                age: (!age.is_null(row)).then(|| age.value(row)),
                fare: (!fare.is_null(row)).then(|| fare.value(row)),
                family_size: required_int(&family_size, "family_size")?,
                survived: required_int(&survived, "survived")? != 0,
            })
        })
        .collect()
}

// -- Parquet / Arrow helpers --

/// Fetch a column by name and cast it to `target`.
fn typed_column(
    batch: &RecordBatch,
    column: &'static str,
    target: &DataType,
) -> Result<Arc<dyn Array>> {
    let idx = batch
        .schema()
        .index_of(column)
        .map_err(|_| DataError::MissingColumn {
            source_kind: "Parquet file",
            column,
        })?;
    let array = batch.column(idx);
    cast(array, target).map_err(|_| {
        DataError::ColumnType {
            column,
            found: format!("{:?}", array.data_type()),
        }
        .into()
    })
}

fn string_column(batch: &RecordBatch, column: &'static str) -> Result<StringArray> {
    let array = typed_column(batch, column, &DataType::Utf8)?;
    array
        .as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .with_context(|| format!("expected string column '{column}'"))
}

fn int_column(batch: &RecordBatch, column: &'static str) -> Result<Int64Array> {
    let array = typed_column(batch, column, &DataType::Int64)?;
    array
        .as_any()
        .downcast_ref::<Int64Array>()
        .cloned()
        .with_context(|| format!("expected integer column '{column}'"))
}

fn float_column(batch: &RecordBatch, column: &'static str) -> Result<Float64Array> {
    let array = typed_column(batch, column, &DataType::Float64)?;
    array
        .as_any()
        .downcast_ref::<Float64Array>()
        .cloned()
        .with_context(|| format!("expected float column '{column}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CategoryValue, Column};

    const SAMPLE: &str = "\
sex,pclass,embark_town,age,fare,family_size,survived,who
male,3,Southampton,22.0,7.25,2,0,man
female,1,Cherbourg,38.0,71.2833,2,1,woman
female,3,,,7.925,1,1,woman
";

    #[test]
    fn csv_rows_and_absent_cells() {
        let ds = read_csv(SAMPLE.as_bytes()).expect("valid CSV");
        assert_eq!(ds.len(), 3);

        let third = &ds.records[2];
        assert_eq!(third.embark_town, None);
        assert_eq!(third.age, None);
        assert_eq!(third.fare, Some(7.925));
        assert!(third.survived);
        assert!(!ds.records[0].survived);

        assert!(ds.unique_values[&Column::EmbarkTown].contains(&CategoryValue::Missing));
    }

    #[test]
    fn csv_missing_column_is_reported() {
        let text = "sex,pclass,age,fare,family_size,survived\nmale,3,22,7.25,1,0\n";
        let err = read_csv(text.as_bytes()).unwrap_err();
        match err.downcast_ref::<DataError>() {
            Some(DataError::MissingColumn { column, .. }) => assert_eq!(*column, "embark_town"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn csv_malformed_number_fails() {
        let text = "sex,pclass,embark_town,age,fare,family_size,survived\nmale,three,Southampton,22,7.25,1,0\n";
        assert!(read_csv(text.as_bytes()).is_err());
    }

    #[test]
    fn json_records() {
        let text = r#"[
            {"sex": "male", "pclass": 1, "embark_town": "Southampton",
             "age": null, "fare": 30.0, "family_size": 1, "survived": 1},
            {"sex": "female", "pclass": 2, "embark_town": null,
             "age": 4.0, "fare": 12.5, "family_size": 3, "survived": 0.0}
        ]"#;
        let ds = read_json(text.as_bytes()).expect("valid JSON");
        assert_eq!(ds.len(), 2);
        assert!(ds.records[0].survived);
        assert_eq!(ds.records[0].age, None);
        assert_eq!(ds.records[1].embark_town, None);
        assert!(!ds.records[1].survived);
    }

    #[test]
    fn bytes_are_parsed_by_extension() {
        let ds = load_bytes(Path::new("titanic.csv"), SAMPLE.as_bytes().to_vec()).expect("csv");
        assert_eq!(ds.len(), 3);
        assert!(load_bytes(Path::new("titanic.json"), SAMPLE.as_bytes().to_vec()).is_err());
    }

    #[test]
    fn unsupported_extension() {
        let err = load_bytes(Path::new("passengers.xlsx"), Vec::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::UnsupportedExtension(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = load_file(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::Unreadable { .. })
        ));
    }

    #[test]
    fn csv_file_on_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("titanic.csv");
        std::fs::write(&path, SAMPLE).expect("write sample");
        let ds = load_file(&path).expect("load");
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn parquet_with_mixed_physical_types() {
        use arrow::array::{BooleanArray, Int32Array};
        use arrow::datatypes::{Field, Schema};
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("sex", DataType::Utf8, false),
            Field::new("pclass", DataType::Int32, false),
            Field::new("embark_town", DataType::Utf8, true),
            Field::new("age", DataType::Float64, true),
            Field::new("fare", DataType::Float64, true),
            Field::new("family_size", DataType::Int64, false),
            Field::new("survived", DataType::Boolean, false),
        ]));
        let columns: Vec<Arc<dyn Array>> = vec![
            Arc::new(StringArray::from(vec!["male", "female"])),
            Arc::new(Int32Array::from(vec![3, 1])),
            Arc::new(StringArray::from(vec![Some("Southampton"), None])),
            Arc::new(Float64Array::from(vec![None, Some(38.0)])),
            Arc::new(Float64Array::from(vec![Some(7.25), Some(71.28)])),
            Arc::new(Int64Array::from(vec![2, 1])),
            Arc::new(BooleanArray::from(vec![false, true])),
        ];
        let batch = RecordBatch::try_new(schema.clone(), columns).expect("batch");

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("titanic.parquet");
        let file = std::fs::File::create(&path).expect("create");
        let mut writer = ArrowWriter::try_new(file, schema, None).expect("writer");
        writer.write(&batch).expect("write");
        writer.close().expect("close");

        let ds = load_file(&path).expect("load parquet");
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].pclass, 3);
        assert_eq!(ds.records[0].age, None);
        assert!(!ds.records[0].survived);
        assert_eq!(ds.records[1].embark_town, None);
        assert!(ds.records[1].survived);
        assert_eq!(ds.records[1].fare, Some(71.28));
    }
}
