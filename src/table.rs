// src/table.rs
// Generic string-to-table parsing.

use std::collections::HashMap;

use csv::ReaderBuilder;

use crate::error::AnalysisError;

/// Reads a delimited string into a list of row maps.
///
/// When `has_header` is true the first line supplies the keys;
/// otherwise keys are generated as `"1"`, `"2"`, … from the first
/// line's field count. Rows whose field count differs from the key
/// count are skipped. Fields are trimmed of surrounding whitespace.
pub fn read_data_string(
    text: &str,
    delimiter: u8,
    has_header: bool,
) -> Result<Vec<HashMap<String, String>>, AnalysisError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let records = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(AnalysisError::from)?;

    let Some(first) = records.first() else {
        return Ok(Vec::new());
    };

    let headers: Vec<String> = if has_header {
        first.iter().map(str::to_string).collect()
    } else {
        (1..=first.len()).map(|i| i.to_string()).collect()
    };

    let data_records = if has_header {
        &records[1..]
    } else {
        &records[..]
    };

    let data = data_records
        .iter()
        .filter(|record| record.len() == headers.len())
        .map(|record| {
            headers
                .iter()
                .cloned()
                .zip(record.iter().map(str::to_string))
                .collect()
        })
        .collect();

    Ok(data)
}
