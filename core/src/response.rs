//! Validates raw JSON bodies against the list envelope and a document type.
//!
//! Documents are decoded one by one so a schema error names the offending
//! index. Field renaming happens inside each document's `Deserialize`.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::types::ListResponse;

#[derive(Deserialize)]
struct Envelope {
    total: u64,
    limit: u64,
    #[serde(default)]
    offset: Option<u64>,
    page: u64,
    pages: u64,
}

/// Decode a list envelope whose `docs` are `D` documents.
pub fn validate_list<D: DeserializeOwned>(raw: Value) -> Result<ListResponse<D>> {
    let mut fields = match raw {
        Value::Object(fields) => fields,
        other => {
            return Err(ApiError::Schema(format!(
                "expected an object, got {}",
                kind(&other)
            )))
        }
    };

    let docs = match fields.remove("docs") {
        Some(Value::Array(docs)) => docs,
        Some(other) => {
            return Err(ApiError::Schema(format!(
                "`docs` must be an array, got {}",
                kind(&other)
            )))
        }
        None => return Err(ApiError::Schema("missing field `docs`".to_string())),
    };

    let envelope: Envelope = serde_json::from_value(Value::Object(fields))
        .map_err(|e| ApiError::Schema(e.to_string()))?;

    let docs = docs
        .into_iter()
        .enumerate()
        .map(|(i, doc)| {
            serde_json::from_value(doc).map_err(|e| ApiError::Schema(format!("docs[{i}]: {e}")))
        })
        .collect::<Result<Vec<D>>>()?;

    Ok(ListResponse {
        docs,
        total: envelope.total,
        limit: envelope.limit,
        offset: envelope.offset,
        page: envelope.page,
        pages: envelope.pages,
    })
}

/// Decode a by-id response and return its only document.
///
/// `id` names the lookup in the `NotFound` error when `docs` is empty.
pub fn validate_single<D: DeserializeOwned>(raw: Value, id: &str) -> Result<D> {
    validate_list::<D>(raw)?
        .docs
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::NotFound(id.to_string()))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
