//! Movie and quote facades.
//!
//! # Design
//! Both resources share two generic operations, `list` and `get`, that
//! compose the query compiler, the transport and the response validator.
//! The facades add nothing but endpoint paths; `Movies` also exposes the
//! `movie/{id}/quote` sub-resource.

use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::{ApiError, Result};
use crate::params::{FieldKey, ListParams};
use crate::query::to_query;
use crate::response::{validate_list, validate_single};
use crate::transport::Transport;
use crate::types::{ListResponse, Movie, MovieKey, Quote, QuoteKey};

const MOVIE_ENDPOINT: &str = "movie";
const QUOTE_ENDPOINT: &str = "quote";

/// List `D` documents at `endpoint`, compiling `params` against the key
/// set `K`.
pub fn list<T, K, D>(
    transport: &T,
    resource: &'static str,
    endpoint: &str,
    params: Option<&ListParams<K>>,
) -> Result<ListResponse<D>>
where
    T: Transport + ?Sized,
    K: FieldKey,
    D: DeserializeOwned,
{
    info!(resource, endpoint, params = ?params, "Listing");
    let query = to_query(params)?;
    let raw = transport.get(endpoint, &query)?;
    let response = validate_list::<D>(raw)?;
    info!(resource, total = response.total, "Listed");
    Ok(response)
}

/// Fetch the single `D` document at `{endpoint}/{id}`.
pub fn get<T, D>(transport: &T, resource: &'static str, endpoint: &str, id: &str) -> Result<D>
where
    T: Transport + ?Sized,
    D: DeserializeOwned,
{
    check_id(id)?;
    info!(resource, id, "Getting");
    let path = format!("{endpoint}/{id}");
    let raw = transport.get(&path, &[])?;
    validate_single(raw, &path)
}

/// Ids are interpolated into the path, so they must be one plain segment.
fn check_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(ApiError::Validation("id must not be empty".to_string()));
    }
    if id
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '?' | '#' | '%'))
    {
        return Err(ApiError::Validation(format!(
            "id `{id}` is not a single path segment"
        )));
    }
    Ok(())
}

/// Movies, and the quotes spoken in each.
#[derive(Debug)]
pub struct Movies<'a, T: ?Sized> {
    transport: &'a T,
}

impl<'a, T: Transport + ?Sized> Movies<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    pub fn list(&self, params: Option<&ListParams<MovieKey>>) -> Result<ListResponse<Movie>> {
        list(self.transport, "Movie", MOVIE_ENDPOINT, params)
    }

    pub fn get(&self, movie_id: &str) -> Result<Movie> {
        get(self.transport, "Movie", MOVIE_ENDPOINT, movie_id)
    }

    /// Quotes from one movie, filterable and sortable like `Quotes::list`.
    pub fn list_quotes(
        &self,
        movie_id: &str,
        params: Option<&ListParams<QuoteKey>>,
    ) -> Result<ListResponse<Quote>> {
        check_id(movie_id)?;
        info!(resource = "Movie", movie_id, "Listing movie quotes");
        let endpoint = format!("{MOVIE_ENDPOINT}/{movie_id}/{QUOTE_ENDPOINT}");
        list(self.transport, "Movie", &endpoint, params)
    }
}

/// Quotes across all movies.
#[derive(Debug)]
pub struct Quotes<'a, T: ?Sized> {
    transport: &'a T,
}

impl<'a, T: Transport + ?Sized> Quotes<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    pub fn list(&self, params: Option<&ListParams<QuoteKey>>) -> Result<ListResponse<Quote>> {
        list(self.transport, "Quote", QUOTE_ENDPOINT, params)
    }

    pub fn get(&self, quote_id: &str) -> Result<Quote> {
        get(self.transport, "Quote", QUOTE_ENDPOINT, quote_id)
    }
}
