//! Domain documents, their filterable key sets and the list envelope.
//!
//! # Design
//! Documents are decoded from private wire structs that mirror the API's
//! JSON exactly, then converted into the public shape (`_id` becomes
//! `movieId`, and so on). The conversion runs inside deserialization, so a
//! missing or mistyped wire field fails the whole decode and no partially
//! renamed document is ever produced. Serializing a document emits only
//! the domain names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::params::FieldKey;

/// Paged envelope every list endpoint returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<D> {
    pub docs: Vec<D>,
    pub total: u64,
    pub limit: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    pub page: u64,
    pub pages: u64,
}

/// A movie, keyed by `movieId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "wire::Movie")]
pub struct Movie {
    pub movie_id: String,
    pub name: String,
    pub runtime_in_minutes: u32,
    pub budget_in_millions: f64,
    pub box_office_revenue_in_millions: f64,
    pub academy_award_nominations: u32,
    pub academy_award_wins: u32,
    pub rotten_tomatoes_score: f64,
}

/// A line of dialog spoken by a character in a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "wire::Quote")]
pub struct Quote {
    pub quote_id: String,
    pub movie_id: String,
    pub character_id: String,
    pub dialog: String,
}

mod wire {
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Movie {
        #[serde(rename = "_id")]
        id: String,
        name: String,
        runtime_in_minutes: u32,
        budget_in_millions: f64,
        box_office_revenue_in_millions: f64,
        academy_award_nominations: u32,
        academy_award_wins: u32,
        rotten_tomatoes_score: f64,
    }

    impl From<Movie> for super::Movie {
        fn from(wire: Movie) -> Self {
            Self {
                movie_id: wire.id,
                name: wire.name,
                runtime_in_minutes: wire.runtime_in_minutes,
                budget_in_millions: wire.budget_in_millions,
                box_office_revenue_in_millions: wire.box_office_revenue_in_millions,
                academy_award_nominations: wire.academy_award_nominations,
                academy_award_wins: wire.academy_award_wins,
                rotten_tomatoes_score: wire.rotten_tomatoes_score,
            }
        }
    }

    /// `_id` duplicates `id`; it is required on the wire and then dropped.
    #[derive(Deserialize)]
    pub struct Quote {
        #[serde(rename = "_id")]
        #[allow(dead_code)]
        object_id: String,
        id: String,
        movie: String,
        character: String,
        dialog: String,
    }

    impl From<Quote> for super::Quote {
        fn from(wire: Quote) -> Self {
            Self {
                quote_id: wire.id,
                movie_id: wire.movie,
                character_id: wire.character,
                dialog: wire.dialog,
            }
        }
    }
}

/// Fields movies can be filtered and sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MovieKey {
    MovieId,
    Name,
    RuntimeInMinutes,
    BudgetInMillions,
    BoxOfficeRevenueInMillions,
    AcademyAwardNominations,
    AcademyAwardWins,
    RottenTomatoesScore,
}

impl FieldKey for MovieKey {
    const ALL: &'static [Self] = &[
        MovieKey::MovieId,
        MovieKey::Name,
        MovieKey::RuntimeInMinutes,
        MovieKey::BudgetInMillions,
        MovieKey::BoxOfficeRevenueInMillions,
        MovieKey::AcademyAwardNominations,
        MovieKey::AcademyAwardWins,
        MovieKey::RottenTomatoesScore,
    ];

    fn name(self) -> &'static str {
        match self {
            MovieKey::MovieId => "movieId",
            MovieKey::Name => "name",
            MovieKey::RuntimeInMinutes => "runtimeInMinutes",
            MovieKey::BudgetInMillions => "budgetInMillions",
            MovieKey::BoxOfficeRevenueInMillions => "boxOfficeRevenueInMillions",
            MovieKey::AcademyAwardNominations => "academyAwardNominations",
            MovieKey::AcademyAwardWins => "academyAwardWins",
            MovieKey::RottenTomatoesScore => "rottenTomatoesScore",
        }
    }

    fn wire_name(self) -> &'static str {
        match self {
            MovieKey::MovieId => "_id",
            other => other.name(),
        }
    }
}

/// Fields quotes can be filtered and sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuoteKey {
    QuoteId,
    MovieId,
    CharacterId,
    Dialog,
}

impl FieldKey for QuoteKey {
    const ALL: &'static [Self] = &[
        QuoteKey::QuoteId,
        QuoteKey::MovieId,
        QuoteKey::CharacterId,
        QuoteKey::Dialog,
    ];

    fn name(self) -> &'static str {
        match self {
            QuoteKey::QuoteId => "quoteId",
            QuoteKey::MovieId => "movieId",
            QuoteKey::CharacterId => "characterId",
            QuoteKey::Dialog => "dialog",
        }
    }

    fn wire_name(self) -> &'static str {
        match self {
            QuoteKey::QuoteId => "id",
            QuoteKey::MovieId => "movie",
            QuoteKey::CharacterId => "character",
            QuoteKey::Dialog => "dialog",
        }
    }
}

macro_rules! impl_key_text {
    ($($key:ty),*) => {$(
        impl FromStr for $key {
            type Err = ApiError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$key as FieldKey>::parse(s)
            }
        }

        impl fmt::Display for $key {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    )*};
}

impl_key_text!(MovieKey, QuoteKey);
