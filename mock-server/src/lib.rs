//! In-process stand-in for The One API, serving the bundled fixtures.
//!
//! Routes live under `/v2` like the real service. Every request needs
//! `Authorization: Bearer mock-token`. List routes understand the same
//! query fragments the client compiles: `key=v1,v2`, `key!=v`, `key`,
//! `!key`, `key<n` (and `<=`, `>`, `>=`), `key=/pattern/flags` (matched as a
//! substring), `sort=key:asc|desc`, `limit`, `page` and `offset`. When both
//! `page` and `offset` are given, `offset` wins.

use std::{cmp::Ordering, sync::Arc};

use axum::{
    extract::{Path, RawQuery, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;

pub const ACCESS_TOKEN: &str = "mock-token";
pub const DEFAULT_LIMIT: usize = 1000;

/// A wire document exactly as the real API returns it.
pub type Doc = Map<String, Value>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub docs: Vec<Doc>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub page: usize,
    pub pages: usize,
}

#[derive(Clone)]
pub struct Db {
    pub movies: Arc<Vec<Doc>>,
    pub quotes: Arc<Vec<Doc>>,
}

impl Db {
    pub fn fixtures() -> Self {
        Self {
            movies: Arc::new(load(include_str!("../../fixtures/movie.json"))),
            quotes: Arc::new(load(include_str!("../../fixtures/quote.json"))),
        }
    }
}

fn load(raw: &str) -> Vec<Doc> {
    serde_json::from_str::<Envelope>(raw)
        .map(|envelope| envelope.docs)
        .unwrap_or_default()
}

pub fn app() -> Router {
    app_with(Db::fixtures())
}

pub fn app_with(db: Db) -> Router {
    let api = Router::new()
        .route("/movie", get(list_movies))
        .route("/movie/{id}", get(get_movie))
        .route("/movie/{id}/quote", get(list_movie_quotes))
        .route("/quote", get(list_quotes))
        .route("/quote/{id}", get(get_quote))
        .layer(middleware::from_fn(require_token))
        .with_state(db);
    Router::new().nest("/v2", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_token(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        == Some(ACCESS_TOKEN);
    if !authorized {
        tracing::warn!(path = %request.uri().path(), "rejected request without a valid bearer token");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "message": "Unauthorized."})),
        )
            .into_response();
    }
    next.run(request).await
}

type Rejection = (StatusCode, Json<Value>);

fn bad_request(message: String) -> Rejection {
    tracing::debug!(%message, "bad query");
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"success": false, "message": message})),
    )
}

async fn list_movies(
    State(db): State<Db>,
    RawQuery(query): RawQuery,
) -> Result<Json<Envelope>, Rejection> {
    let query = Query::parse(query.as_deref()).map_err(bad_request)?;
    Ok(Json(query.apply(db.movies.iter().cloned())))
}

async fn get_movie(State(db): State<Db>, Path(id): Path<String>) -> Json<Envelope> {
    Json(by_id(&db.movies, "_id", &id))
}

async fn list_movie_quotes(
    State(db): State<Db>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Json<Envelope>, Rejection> {
    let query = Query::parse(query.as_deref()).map_err(bad_request)?;
    let quotes = db
        .quotes
        .iter()
        .filter(|quote| quote.get("movie").and_then(Value::as_str) == Some(id.as_str()))
        .cloned();
    Ok(Json(query.apply(quotes)))
}

async fn list_quotes(
    State(db): State<Db>,
    RawQuery(query): RawQuery,
) -> Result<Json<Envelope>, Rejection> {
    let query = Query::parse(query.as_deref()).map_err(bad_request)?;
    Ok(Json(query.apply(db.quotes.iter().cloned())))
}

async fn get_quote(State(db): State<Db>, Path(id): Path<String>) -> Json<Envelope> {
    Json(by_id(&db.quotes, "_id", &id))
}

/// Unknown ids answer 200 with empty `docs`, like the real API.
fn by_id(docs: &[Doc], field: &str, id: &str) -> Envelope {
    let docs = docs
        .iter()
        .filter(|doc| doc.get(field).and_then(Value::as_str) == Some(id))
        .cloned();
    Query::default().apply(docs)
}

#[derive(Debug, Clone, PartialEq)]
enum Condition {
    In(String, Vec<String>),
    NotIn(String, Vec<String>),
    Exists(String),
    Missing(String),
    Compare(String, &'static str, f64),
}

#[derive(Debug, Default, PartialEq)]
struct Query {
    conditions: Vec<Condition>,
    sort: Option<(String, bool)>,
    limit: Option<usize>,
    page: Option<usize>,
    offset: Option<usize>,
}

impl Query {
    fn parse(raw: Option<&str>) -> Result<Self, String> {
        let mut query = Query::default();
        for fragment in raw.unwrap_or_default().split('&').filter(|f| !f.is_empty()) {
            let fragment = percent_decode(fragment);
            if let Some(directive) = fragment.strip_prefix("sort=") {
                let (key, order) = directive
                    .split_once(':')
                    .ok_or_else(|| format!("bad sort `{directive}`"))?;
                let descending = match order {
                    "asc" => false,
                    "desc" => true,
                    other => return Err(format!("bad sort order `{other}`")),
                };
                query.sort = Some((key.to_string(), descending));
            } else if let Some(n) = fragment.strip_prefix("limit=") {
                query.limit = Some(number(n)?);
            } else if let Some(n) = fragment.strip_prefix("page=") {
                query.page = Some(number(n)?);
            } else if let Some(n) = fragment.strip_prefix("offset=") {
                query.offset = Some(number(n)?);
            } else {
                query.conditions.push(Condition::parse(&fragment)?);
            }
        }
        Ok(query)
    }

    fn apply(&self, docs: impl Iterator<Item = Doc>) -> Envelope {
        let mut docs: Vec<Doc> = docs
            .filter(|doc| self.conditions.iter().all(|c| c.matches(doc)))
            .collect();
        if let Some((key, descending)) = &self.sort {
            docs.sort_by(|a, b| {
                let ordering = compare(a.get(key), b.get(key));
                if *descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        let total = docs.len();
        let limit = self.limit.filter(|n| *n > 0).unwrap_or(DEFAULT_LIMIT);
        let offset = match (self.offset, self.page) {
            (Some(offset), _) => offset,
            (None, Some(page)) if page > 0 => (page - 1).saturating_mul(limit),
            _ => 0,
        };
        tracing::debug!(total, limit, offset, "serving page");
        Envelope {
            docs: docs.into_iter().skip(offset).take(limit).collect(),
            total,
            limit,
            offset,
            page: (offset / limit).saturating_add(1),
            pages: total.div_ceil(limit).max(1),
        }
    }
}

impl Condition {
    fn parse(fragment: &str) -> Result<Self, String> {
        if let Some(key) = fragment.strip_prefix('!') {
            if !key.contains(['!', '<', '>', '=']) {
                return Ok(Condition::Missing(key.to_string()));
            }
        }
        let Some(at) = fragment.find(['!', '<', '>', '=']) else {
            return Ok(Condition::Exists(fragment.to_string()));
        };
        let (key, rest) = fragment.split_at(at);
        let key = key.to_string();
        if let Some(values) = rest.strip_prefix("!=") {
            return Ok(Condition::NotIn(key, split_values(values)));
        }
        for op in ["<=", ">=", "<", ">"] {
            if let Some(n) = rest.strip_prefix(op) {
                let n = n
                    .parse::<f64>()
                    .map_err(|_| format!("bad number in `{fragment}`"))?;
                return Ok(Condition::Compare(key, op, n));
            }
        }
        match rest.strip_prefix('=') {
            Some(values) => Ok(Condition::In(key, split_values(values))),
            None => Err(format!("cannot parse `{fragment}`")),
        }
    }

    fn matches(&self, doc: &Doc) -> bool {
        match self {
            Condition::In(key, values) => doc
                .get(key)
                .is_some_and(|field| values.iter().any(|v| value_matches(field, v))),
            Condition::NotIn(key, values) => doc
                .get(key)
                .is_none_or(|field| !values.iter().any(|v| value_matches(field, v))),
            Condition::Exists(key) => doc.contains_key(key),
            Condition::Missing(key) => !doc.contains_key(key),
            Condition::Compare(key, op, n) => {
                let Some(field) = doc.get(key).and_then(Value::as_f64) else {
                    return false;
                };
                match *op {
                    "<" => field < *n,
                    "<=" => field <= *n,
                    ">" => field > *n,
                    _ => field >= *n,
                }
            }
        }
    }
}

/// `/pattern/flags` is a single regex operand, never a comma list.
fn split_values(values: &str) -> Vec<String> {
    if values.starts_with('/') && values[1..].contains('/') {
        return vec![values.to_string()];
    }
    values.split(',').map(str::to_string).collect()
}

fn value_matches(field: &Value, operand: &str) -> bool {
    let text = match field {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if let Some(body) = operand.strip_prefix('/') {
        if let Some((pattern, flags)) = body.rsplit_once('/') {
            return if flags.contains('i') {
                text.to_lowercase().contains(&pattern.to_lowercase())
            } else {
                text.contains(pattern)
            };
        }
    }
    match field {
        Value::Number(n) => operand.parse::<f64>().ok() == n.as_f64(),
        _ => text == operand,
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn number(raw: &str) -> Result<usize, String> {
    raw.parse().map_err(|_| format!("`{raw}` is not a non-negative integer"))
}

/// Decode `%XX` escapes; malformed escapes and invalid UTF-8 are kept lossily.
fn percent_decode(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned(),
    }
}
