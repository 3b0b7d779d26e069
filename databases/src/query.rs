//! Query options for listing favorites
//!
//! Sort field and order are the only pieces of a favorites query that are
//! spliced into the Cypher text, so both are closed enums. Anything that
//! reaches the query string comes from [`MovieSort::property`] or
//! [`SortOrder::keyword`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::StoreError;

/// Movie properties a favorites list may be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MovieSort {
    #[default]
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "released")]
    Released,
    #[serde(rename = "year")]
    Year,
    #[serde(rename = "imdbRating")]
    ImdbRating,
    #[serde(rename = "imdbVotes")]
    ImdbVotes,
    #[serde(rename = "runtime")]
    Runtime,
    #[serde(rename = "budget")]
    Budget,
    #[serde(rename = "revenue")]
    Revenue,
    #[serde(rename = "tmdbId")]
    TmdbId,
}

impl MovieSort {
    pub const ALL: [MovieSort; 9] = [
        MovieSort::Title,
        MovieSort::Released,
        MovieSort::Year,
        MovieSort::ImdbRating,
        MovieSort::ImdbVotes,
        MovieSort::Runtime,
        MovieSort::Budget,
        MovieSort::Revenue,
        MovieSort::TmdbId,
    ];

    /// Property name on the `:Movie` node
    pub fn property(self) -> &'static str {
        match self {
            MovieSort::Title => "title",
            MovieSort::Released => "released",
            MovieSort::Year => "year",
            MovieSort::ImdbRating => "imdbRating",
            MovieSort::ImdbVotes => "imdbVotes",
            MovieSort::Runtime => "runtime",
            MovieSort::Budget => "budget",
            MovieSort::Revenue => "revenue",
            MovieSort::TmdbId => "tmdbId",
        }
    }
}

impl fmt::Display for MovieSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.property())
    }
}

impl FromStr for MovieSort {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MovieSort::ALL
            .into_iter()
            .find(|sort| sort.property() == s)
            .ok_or_else(|| StoreError::InvalidSort(s.to_string()))
    }
}

/// Direction of a favorites list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for SortOrder {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortOrder::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortOrder::Desc)
        } else {
            Err(StoreError::InvalidOrder(s.to_string()))
        }
    }
}

/// Ordering and paging for [`crate::FavoriteStore::all`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Property to order by
    pub sort: MovieSort,
    /// Direction
    pub order: SortOrder,
    /// Maximum number of movies returned
    pub limit: u32,
    /// Number of leading rows skipped
    pub skip: u32,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            sort: MovieSort::Title,
            order: SortOrder::Asc,
            limit: 6,
            skip: 0,
        }
    }
}

impl ListOptions {
    pub fn with_sort(mut self, sort: MovieSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_skip(mut self, skip: u32) -> Self {
        self.skip = skip;
        self
    }

    /// Build options from raw strings, rejecting anything off the allow-list
    pub fn parse(sort: &str, order: &str, limit: u32, skip: u32) -> Result<Self, StoreError> {
        Ok(Self {
            sort: sort.parse()?,
            order: order.parse()?,
            limit,
            skip,
        })
    }
}
