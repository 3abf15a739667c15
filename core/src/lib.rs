//! Typed client for The One API's movie and quote resources.
//!
//! # Overview
//! Callers describe filters, a sort directive and pagination with typed
//! `ListParams`; the query compiler turns them into the exact ordered
//! fragments the API expects, a `Transport` performs the GET, and the
//! response validator decodes the JSON into normalized documents
//! (`_id` becomes `movieId`, `movie` becomes `movieId`, and so on).
//!
//! # Design
//! - `LotrClient` holds only its transport; every call is independent.
//! - The query compiler and the response validator are pure functions
//!   and are usable without a client.
//! - `HttpTransport` splits each round-trip into `build_request` and
//!   `parse_response`, with the ureq call (feature `http`) in between.
//! - Logging goes through `tracing` and is silent unless the host installs
//!   a subscriber.
//!
//! ```no_run
//! use lotr_core::{FilterValue, ListParams, LotrClient, MovieKey, SortOrder};
//!
//! # fn main() -> Result<(), lotr_core::ApiError> {
//! let client = LotrClient::from_env()?;
//! let params = ListParams::new()
//!     .filter(MovieKey::BudgetInMillions, FilterValue::gt(200))
//!     .sort(MovieKey::Name, SortOrder::Asc);
//! for movie in client.movies().list(Some(&params))?.docs {
//!     println!("{} ({} min)", movie.name, movie.runtime_in_minutes);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod params;
pub mod query;
pub mod resources;
pub mod response;
pub mod transport;
pub mod types;

pub use client::LotrClient;
pub use config::ClientConfig;
pub use error::{ApiError, Result};
pub use http::{HttpRequest, HttpResponse};
pub use params::{FieldKey, Filter, FilterValue, ListParams, Pagination, Sort, SortOrder};
pub use query::{compile_filter, compile_pagination, compile_sort, to_query};
pub use resources::{Movies, Quotes};
pub use response::{validate_list, validate_single};
pub use transport::{HttpTransport, Transport};
pub use types::{ListResponse, Movie, MovieKey, Quote, QuoteKey};
