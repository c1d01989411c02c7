//! JSON output for tabular listings.
//!
//! Each row becomes an object keyed by the lowercased column header, so
//! `jig --json toupgrade | jq '.[].package'` works.

use serde_json::{Map, Value};

pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
    let keys: Vec<String> = headers.iter().map(|h| key(h)).collect();

    let objects: Vec<Value> = rows
        .iter()
        .map(|row| {
            let object: Map<String, Value> = keys
                .iter()
                .zip(row)
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            Value::Object(object)
        })
        .collect();

    serde_json::to_string_pretty(&Value::Array(objects)).unwrap_or_else(|_| String::from("[]"))
}

/// "Size (KB)" -> "size_kb"
fn key(header: &str) -> String {
    header
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}
