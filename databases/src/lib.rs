//! Neoflix Databases Module
//!
//! Data access for a user's favorite movies. The Neo4j implementation lives
//! in [`favorites`], driver setup and teardown in [`neo4j`], and an
//! in-process implementation of the same contract in [`memory`].

use async_trait::async_trait;

pub mod errors;
pub mod favorites;
pub mod memory;
pub mod movie;
pub mod neo4j;
pub mod query;

pub use errors::{Result, StoreError};
pub use favorites::FavoritesRepository;
pub use memory::InMemoryFavorites;
pub use movie::Movie;
pub use neo4j::{DriverLifecycle, Neo4jConfig, Neo4jHandle};
pub use query::{ListOptions, MovieSort, SortOrder};

/// A user's favorites list.
///
/// Every returned [`Movie`] carries `favorite` as it stands right after the
/// call: `true` from [`all`](FavoriteStore::all) and
/// [`add`](FavoriteStore::add), `false` from
/// [`remove`](FavoriteStore::remove).
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// One page of the user's favorites. Unknown users yield an empty list.
    async fn all(&self, user_id: &str, options: &ListOptions) -> Result<Vec<Movie>>;

    /// Mark a movie as favorite. Adding twice keeps a single relationship.
    ///
    /// Fails with [`StoreError::NotFound`] if the user or movie is missing.
    async fn add(&self, user_id: &str, movie_id: &str) -> Result<Movie>;

    /// Drop a movie from the favorites.
    ///
    /// Fails with [`StoreError::NotFound`] if the user, the movie or the
    /// favorite relationship is missing.
    async fn remove(&self, user_id: &str, movie_id: &str) -> Result<Movie>;
}
