//! Loading rows into the in-memory dataset model

use crate::dataset::{Dataset, Row, Value};
use crate::errors::Result;
use std::io::Read;
use std::path::Path;

/// Load a headered CSV file. Cells arrive as text; an empty cell is a
/// blank value, not a missing one, because CSV cannot express null.
pub fn dataset_from_csv_path<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Dataset> {
    let file = std::fs::File::open(path)?;
    dataset_from_csv_reader(file, delimiter)
}

pub fn dataset_from_csv_reader<R: Read>(reader: R, delimiter: u8) -> Result<Dataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let mut row = Row::new();
        for (i, header) in headers.iter().enumerate() {
            let cell = record.get(i).unwrap_or("");
            row.insert(header.clone(), Value::Text(cell.to_string()));
        }
        rows.push(row);
    }

    Ok(Dataset::new(rows))
}

/// Build a dataset from JSON records, one object per row. Scalar types map
/// onto the value union directly; nested structures flatten to their JSON
/// text.
pub fn dataset_from_json_records(records: &[serde_json::Value]) -> Dataset {
    let rows: Vec<Row> = records
        .iter()
        .map(|record| match record.as_object() {
            Some(obj) => obj
                .iter()
                .map(|(k, v)| (k.clone(), Value::from(v)))
                .collect(),
            None => Row::new(),
        })
        .collect();
    Dataset::new(rows)
}
