//! Typed list parameters: filters, sort directive and pagination.
//!
//! # Design
//! `FilterValue` is a sum type, so a filter always carries exactly one
//! operator. The only place where "zero or several operators" can still be
//! expressed is the JSON form (`{"eq": "x"}`), which is decoded through
//! `RawFilterValue` and rejected there with `ApiError::Validation`.
//!
//! The key type `K` is the closed set of fields a resource accepts. Each set
//! implements `FieldKey`, whose `wire_name` is the resource's key map from
//! public name to the name the API expects.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{ApiError, Result};

/// A closed set of field names one resource can filter and sort on.
pub trait FieldKey: Copy + fmt::Debug + Eq + 'static {
    /// Every key in the set, in declaration order.
    const ALL: &'static [Self];

    /// Public (domain) name, as used in documents.
    fn name(self) -> &'static str;

    /// Name the API expects on the wire. Identity unless remapped.
    fn wire_name(self) -> &'static str {
        self.name()
    }

    /// Look a key up by its public name.
    fn parse(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.name() == name)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|key| key.name()).collect();
                ApiError::Validation(format!(
                    "unknown field `{name}`, expected one of: {}",
                    known.join(", ")
                ))
            })
    }
}

/// The operator and operand of one filter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawFilterValue")]
pub enum FilterValue {
    Eq(String),
    Ne(String),
    Include(Vec<String>),
    Exclude(Vec<String>),
    Exists,
    NotExists,
    Regex {
        pattern: String,
        flags: Option<String>,
    },
    Lt(f64),
    Lte(f64),
    Gt(f64),
    Gte(f64),
}

impl FilterValue {
    pub fn eq(value: impl Into<String>) -> Self {
        Self::Eq(value.into())
    }

    pub fn ne(value: impl Into<String>) -> Self {
        Self::Ne(value.into())
    }

    pub fn include<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Include(values.into_iter().map(Into::into).collect())
    }

    pub fn exclude<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Exclude(values.into_iter().map(Into::into).collect())
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::Regex {
            pattern: pattern.into(),
            flags: None,
        }
    }

    pub fn regex_with_flags(pattern: impl Into<String>, flags: impl Into<String>) -> Self {
        Self::Regex {
            pattern: pattern.into(),
            flags: Some(flags.into()),
        }
    }

    pub fn lt(value: impl Into<f64>) -> Self {
        Self::Lt(value.into())
    }

    pub fn lte(value: impl Into<f64>) -> Self {
        Self::Lte(value.into())
    }

    pub fn gt(value: impl Into<f64>) -> Self {
        Self::Gt(value.into())
    }

    pub fn gte(value: impl Into<f64>) -> Self {
        Self::Gte(value.into())
    }

    /// Operator name as it appears in the JSON form.
    pub fn operator(&self) -> &'static str {
        match self {
            Self::Eq(_) => "eq",
            Self::Ne(_) => "ne",
            Self::Include(_) => "include",
            Self::Exclude(_) => "exclude",
            Self::Exists => "exists",
            Self::NotExists => "notExists",
            Self::Regex { .. } => "regex",
            Self::Lt(_) => "lt",
            Self::Lte(_) => "lte",
            Self::Gt(_) => "gt",
            Self::Gte(_) => "gte",
        }
    }
}

/// JSON form of a filter value: an object with exactly one operator key.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawFilterValue {
    eq: Option<String>,
    ne: Option<String>,
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    exists: Option<bool>,
    not_exists: Option<bool>,
    regex: Option<RawRegex>,
    lt: Option<f64>,
    lte: Option<f64>,
    gt: Option<f64>,
    gte: Option<f64>,
}

/// A regex operand, either a bare pattern or a pattern with flags.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawRegex {
    Pattern(String),
    WithFlags {
        pattern: String,
        #[serde(default)]
        flags: Option<String>,
    },
}

/// Errors are plain messages; `ListParams::from_json` wraps the serde
/// error in `ApiError::Validation` once.
impl TryFrom<RawFilterValue> for FilterValue {
    type Error = String;

    fn try_from(raw: RawFilterValue) -> std::result::Result<Self, String> {
        let RawFilterValue {
            eq,
            ne,
            include,
            exclude,
            exists,
            not_exists,
            regex,
            lt,
            lte,
            gt,
            gte,
        } = raw;

        let mut set = Vec::new();
        set.extend(eq.map(FilterValue::Eq));
        set.extend(ne.map(FilterValue::Ne));
        set.extend(include.map(FilterValue::Include));
        set.extend(exclude.map(FilterValue::Exclude));
        if let Some(flag) = exists {
            set.push(presence_operator("exists", flag, FilterValue::Exists)?);
        }
        if let Some(flag) = not_exists {
            set.push(presence_operator("notExists", flag, FilterValue::NotExists)?);
        }
        set.extend(regex.map(|regex| match regex {
            RawRegex::Pattern(pattern) => FilterValue::Regex {
                pattern,
                flags: None,
            },
            RawRegex::WithFlags { pattern, flags } => FilterValue::Regex { pattern, flags },
        }));
        set.extend(lt.map(FilterValue::Lt));
        set.extend(lte.map(FilterValue::Lte));
        set.extend(gt.map(FilterValue::Gt));
        set.extend(gte.map(FilterValue::Gte));

        if set.len() != 1 {
            let names: Vec<&str> = set.iter().map(FilterValue::operator).collect();
            return Err(format!(
                "exactly one filter operator must be set, found {} [{}]",
                set.len(),
                names.join(", ")
            ));
        }
        Ok(set.remove(0))
    }
}

fn presence_operator(
    name: &str,
    flag: bool,
    value: FilterValue,
) -> std::result::Result<FilterValue, String> {
    if flag {
        Ok(value)
    } else {
        Err(format!("`{name}` only accepts `true`"))
    }
}

/// One filter: a field of the resource and the condition on it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Filter<K> {
    pub key: K,
    pub value: FilterValue,
}

impl<K> Filter<K> {
    pub fn new(key: K, value: FilterValue) -> Self {
        Self { key, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// The single sort directive the API accepts per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Sort<K> {
    pub key: K,
    pub order: SortOrder,
}

/// Page-based and offset-based paging. Zero means "not set".
///
/// `page` and `offset` may both be sent; the server decides which wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub offset: Option<u32>,
}

/// Everything a `list` call can ask of the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "K: Deserialize<'de>"))]
pub struct ListParams<K> {
    #[serde(default)]
    pub filters: Vec<Filter<K>>,
    #[serde(default)]
    pub sort: Option<Sort<K>>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl<K> Default for ListParams<K> {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            sort: None,
            pagination: None,
        }
    }
}

impl<K> ListParams<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, key: K, value: FilterValue) -> Self {
        self.filters.push(Filter::new(key, value));
        self
    }

    /// Set the sort directive, replacing any previous one.
    pub fn sort(mut self, key: K, order: SortOrder) -> Self {
        self.sort = Some(Sort { key, order });
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.pagination.get_or_insert_with(Pagination::default).limit = Some(limit);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.pagination.get_or_insert_with(Pagination::default).page = Some(page);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.pagination.get_or_insert_with(Pagination::default).offset = Some(offset);
        self
    }
}

impl<K: DeserializeOwned> ListParams<K> {
    /// Decode the `{filters, sort, pagination}` JSON form.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ApiError::Validation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> Result<FilterValue> {
        serde_json::from_value(value).map_err(|e| ApiError::Validation(e.to_string()))
    }

    #[test]
    fn single_operator_decodes() {
        assert_eq!(decode(json!({"eq": "Gandalf"})).unwrap(), FilterValue::eq("Gandalf"));
        assert_eq!(decode(json!({"gt": 200})).unwrap(), FilterValue::gt(200));
        assert_eq!(decode(json!({"exists": true})).unwrap(), FilterValue::Exists);
        assert_eq!(decode(json!({"notExists": true})).unwrap(), FilterValue::NotExists);
        assert_eq!(
            decode(json!({"include": ["a", "b"]})).unwrap(),
            FilterValue::include(["a", "b"])
        );
    }

    #[test]
    fn regex_accepts_bare_pattern_and_flags_object() {
        assert_eq!(decode(json!({"regex": "Ring"})).unwrap(), FilterValue::regex("Ring"));
        assert_eq!(
            decode(json!({"regex": {"pattern": "ring", "flags": "i"}})).unwrap(),
            FilterValue::regex_with_flags("ring", "i")
        );
    }

    #[test]
    fn zero_operators_is_a_validation_error() {
        let err = decode(json!({})).unwrap_err();
        assert!(matches!(err, ApiError::Validation(msg) if msg.contains("found 0")));
    }

    #[test]
    fn two_operators_is_a_validation_error() {
        let err = decode(json!({"eq": "a", "ne": "b"})).unwrap_err();
        assert!(matches!(err, ApiError::Validation(msg) if msg.contains("found 2 [eq, ne]")));
    }

    #[test]
    fn unknown_operator_is_rejected() {
        assert!(decode(json!({"like": "a"})).is_err());
    }

    #[test]
    fn exists_false_is_rejected() {
        let err = decode(json!({"exists": false})).unwrap_err();
        assert!(matches!(err, ApiError::Validation(msg) if msg.contains("exists")));
    }

    #[test]
    fn list_params_decode_without_default_keys() {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
        #[serde(rename_all = "camelCase")]
        enum Key {
            Name,
        }

        let params = ListParams::<Key>::from_json(json!({
            "filters": [{"key": "name", "value": {"eq": "Gandalf"}}]
        }))
        .unwrap();
        assert_eq!(params, ListParams::new().filter(Key::Name, FilterValue::eq("Gandalf")));

        let empty = ListParams::<Key>::from_json(json!({})).unwrap();
        assert_eq!(empty, ListParams::new());
    }

    #[test]
    fn from_json_reports_the_validation_prefix_once() {
        let err = ListParams::<String>::from_json(json!({
            "filters": [{"key": "name", "value": {"eq": "a", "ne": "b"}}]
        }))
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("found 2 [eq, ne]"), "{message}");
        assert_eq!(message.matches("invalid request parameters").count(), 1, "{message}");
    }

    #[test]
    fn builder_accumulates_pagination() {
        let params: ListParams<&'static str> = ListParams::new().limit(5).page(2).offset(0);
        assert_eq!(
            params.pagination,
            Some(Pagination {
                limit: Some(5),
                page: Some(2),
                offset: Some(0),
            })
        );
        assert!(params.filters.is_empty());
        assert!(params.sort.is_none());
    }

    #[test]
    fn sort_replaces_previous_directive() {
        let params: ListParams<&'static str> = ListParams::new()
            .sort("name", SortOrder::Asc)
            .sort("dialog", SortOrder::Desc);
        assert_eq!(
            params.sort,
            Some(Sort {
                key: "dialog",
                order: SortOrder::Desc,
            })
        );
    }
}
