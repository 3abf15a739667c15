//! Compiles typed list parameters into query-string fragments.
//!
//! # Design
//! Every function here is pure: the same input always yields the same
//! fragments in the same order. The fragment order of a list query is
//! fixed as filters (caller order), then the sort directive, then `page`,
//! `limit`, `offset`.
//!
//! Operands are not percent-encoded here; fragments carry the API's
//! operators (`!=`, `<`, `>=`, ...) literally and the transport decides how
//! to put them on the wire.

use crate::error::{ApiError, Result};
use crate::params::{FieldKey, Filter, FilterValue, ListParams, Pagination, Sort};

/// Regex flags the API forwards to its matcher.
const REGEX_FLAGS: &str = "dgimsuvy";

/// Compile one filter into a fragment such as `budgetInMillions>200`.
pub fn compile_filter<K: FieldKey>(filter: &Filter<K>) -> Result<String> {
    let key = filter.key.wire_name();
    let fragment = match &filter.value {
        FilterValue::Eq(value) => format!("{key}={value}"),
        FilterValue::Ne(value) => format!("{key}!={value}"),
        FilterValue::Include(values) => format!("{key}={}", join_values(key, "include", values)?),
        FilterValue::Exclude(values) => format!("{key}!={}", join_values(key, "exclude", values)?),
        FilterValue::Exists => key.to_string(),
        FilterValue::NotExists => format!("!{key}"),
        FilterValue::Regex { pattern, flags } => {
            format!("{key}={}", regex_literal(key, pattern, flags.as_deref())?)
        }
        FilterValue::Lt(n) => format!("{key}<{}", number(key, *n)?),
        FilterValue::Lte(n) => format!("{key}<={}", number(key, *n)?),
        FilterValue::Gt(n) => format!("{key}>{}", number(key, *n)?),
        FilterValue::Gte(n) => format!("{key}>={}", number(key, *n)?),
    };
    Ok(fragment)
}

/// Compile the sort directive into `sort=<key>:<asc|desc>`.
pub fn compile_sort<K: FieldKey>(sort: &Sort<K>) -> String {
    format!("sort={}:{}", sort.key.wire_name(), sort.order.as_str())
}

/// Compile pagination into `page`, `limit`, `offset` fragments.
///
/// Unset and zero values are both omitted.
pub fn compile_pagination(pagination: &Pagination) -> Vec<String> {
    [
        ("page", pagination.page),
        ("limit", pagination.limit),
        ("offset", pagination.offset),
    ]
    .into_iter()
    .filter_map(|(field, value)| match value {
        Some(n) if n > 0 => Some(format!("{field}={n}")),
        _ => None,
    })
    .collect()
}

/// Assemble the full fragment sequence for a list request.
pub fn to_query<K: FieldKey>(params: Option<&ListParams<K>>) -> Result<Vec<String>> {
    let Some(params) = params else {
        return Ok(Vec::new());
    };

    let mut fragments = params
        .filters
        .iter()
        .map(compile_filter)
        .collect::<Result<Vec<_>>>()?;
    if let Some(sort) = &params.sort {
        fragments.push(compile_sort(sort));
    }
    if let Some(pagination) = &params.pagination {
        fragments.extend(compile_pagination(pagination));
    }
    Ok(fragments)
}

fn join_values(key: &str, operator: &str, values: &[String]) -> Result<String> {
    if values.is_empty() {
        return Err(ApiError::Validation(format!(
            "`{operator}` on `{key}` needs at least one value"
        )));
    }
    Ok(values.join(","))
}

/// Render `/pattern/flags`, the form the API reads as a regex match.
fn regex_literal(key: &str, pattern: &str, flags: Option<&str>) -> Result<String> {
    if pattern.is_empty() {
        return Err(ApiError::Validation(format!("regex on `{key}` has an empty pattern")));
    }
    let flags = flags.unwrap_or_default();
    for (i, flag) in flags.char_indices() {
        if !REGEX_FLAGS.contains(flag) {
            return Err(ApiError::Validation(format!(
                "regex on `{key}` has unsupported flag `{flag}`"
            )));
        }
        if flags[..i].contains(flag) {
            return Err(ApiError::Validation(format!(
                "regex on `{key}` repeats flag `{flag}`"
            )));
        }
    }
    Ok(format!("/{pattern}/{flags}"))
}

/// Shortest decimal that round-trips; `200.0` renders as `200`.
fn number(key: &str, n: f64) -> Result<String> {
    if !n.is_finite() {
        return Err(ApiError::Validation(format!(
            "comparison on `{key}` needs a finite number, got {n}"
        )));
    }
    Ok(n.to_string())
}
