use std::collections::BTreeMap;
use std::io::Read;

use serde_json::Value;

use super::SourceRecord;

/// Materialize loosely-typed records from a CSV export.
///
/// Every cell arrives as a string value; the normalizer coerces types later,
/// so the reader stays free of schema knowledge.
pub fn records_from_csv<R: Read>(reader: R) -> Result<Vec<SourceRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let mut record: SourceRecord = BTreeMap::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            record.insert(header.to_string(), Value::String(cell.to_string()));
        }
        records.push(record);
    }

    Ok(records)
}

/// Materialize loosely-typed records from a JSON array payload, as handed
/// over by provider API clients.
pub fn records_from_json(payload: &str) -> Result<Vec<SourceRecord>, serde_json::Error> {
    serde_json::from_str::<Vec<SourceRecord>>(payload)
}
