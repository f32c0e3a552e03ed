//! CSV and JSON utilities.

use crate::format::{TransformError, TransformResult, fenced, param, raw_param};
use serde::Serialize;
use serde_json::{Map, Value};

fn csv_error(e: csv::Error) -> TransformError {
    match e.position() {
        Some(pos) => TransformError::new(format!("Invalid CSV near line {}: {}", pos.line(), e)),
        None => TransformError::new(format!("Invalid CSV: {}", e)),
    }
}

/// Converts CSV text with a header row into JSON objects.
///
/// Quoted fields may contain commas, escaped quotes and line breaks. Short
/// rows are padded with empty strings; cells beyond the header are dropped.
///
/// # Errors
///
/// Fails on empty or malformed input, a header-only document, or
/// blank/duplicate headers.
pub fn csv_to_values(csv: &str) -> Result<Vec<Value>, TransformError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(csv.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(TransformError::new("CSV input is empty"));
    }
    if headers.iter().any(String::is_empty) {
        return Err(TransformError::new("Every CSV column needs a header name"));
    }
    for (i, header) in headers.iter().enumerate() {
        if headers[..i].contains(header) {
            return Err(TransformError::new(format!("Duplicate CSV header `{}`", header)));
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let object: Map<String, Value> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let cell = record.get(i).unwrap_or_default().to_string();
                (h.clone(), Value::String(cell))
            })
            .collect();
        rows.push(Value::Object(object));
    }

    if rows.is_empty() {
        return Err(TransformError::new(
            "CSV must contain a header row and at least one data row",
        ));
    }
    Ok(rows)
}

/// `CSV_JSON csv`
pub fn csv_json(params: &[String]) -> TransformResult {
    let rows = csv_to_values(raw_param(params, 0))?;
    let count = rows.len();
    let pretty = serde_json::to_string_pretty(&rows)
        .map_err(|e| TransformError::new(format!("Could not render JSON: {}", e)))?;
    Ok(format!(
        "## CSV to JSON\n\nConverted {} row{}.\n\n{}",
        count,
        if count == 1 { "" } else { "s" },
        fenced("json", &pretty)
    ))
}

/// `JSON_FORMAT json;;;indent`
pub fn json_format(params: &[String]) -> TransformResult {
    let source = raw_param(params, 0);
    if source.trim().is_empty() {
        return Err(TransformError::new("JSON input is empty"));
    }
    let indent = match param(params, 1) {
        "" | "2" => 2,
        "4" => 4,
        other => {
            return Err(TransformError::new(format!(
                "Indent must be 2 or 4, got `{}`",
                other
            )));
        }
    };
    let value: Value = serde_json::from_str(source)
        .map_err(|e| TransformError::new(format!("Invalid JSON: {}", e)))?;

    let indent_str = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent_str.as_bytes());
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| TransformError::new(format!("Could not render JSON: {}", e)))?;
    let pretty = String::from_utf8(out)
        .map_err(|e| TransformError::new(format!("Could not render JSON: {}", e)))?;

    Ok(format!("## Formatted JSON\n\n{}", fenced("json", &pretty)))
}
