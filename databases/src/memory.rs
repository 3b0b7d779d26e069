//! In-process favorites store
//!
//! Mirrors the Neo4j repository's contract without a server: same not-found
//! rules, same Cypher ordering for `ORDER BY`, same skip/limit paging.

use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::errors::{Result, StoreError};
use crate::movie::Movie;
use crate::query::{ListOptions, SortOrder};
use crate::FavoriteStore;

#[derive(Debug, Default)]
struct Catalog {
    users: HashSet<String>,
    /// Movies keyed by `tmdbId`
    movies: BTreeMap<String, Movie>,
    /// (userId, tmdbId) pairs
    favorites: BTreeSet<(String, String)>,
}

/// [`FavoriteStore`] held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryFavorites {
    catalog: Arc<RwLock<Catalog>>,
}

impl InMemoryFavorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user_id: impl Into<String>) {
        self.catalog.write().await.users.insert(user_id.into());
    }

    /// Store a movie. The stored copy never carries a favorite flag.
    pub async fn insert_movie(&self, movie: Movie) {
        let movie = movie.with_favorite(false);
        self.catalog
            .write()
            .await
            .movies
            .insert(movie.tmdb_id.clone(), movie);
    }

    /// Number of favorite relationships held for a user
    pub async fn favorite_count(&self, user_id: &str) -> usize {
        self.catalog
            .read()
            .await
            .favorites
            .iter()
            .filter(|(user, _)| user == user_id)
            .count()
    }
}

#[async_trait]
impl FavoriteStore for InMemoryFavorites {
    async fn all(&self, user_id: &str, options: &ListOptions) -> Result<Vec<Movie>> {
        let catalog = self.catalog.read().await;

        let mut movies: Vec<Movie> = catalog
            .favorites
            .iter()
            .filter(|(user, _)| user == user_id)
            .filter_map(|(_, tmdb_id)| catalog.movies.get(tmdb_id))
            .map(|movie| movie.clone().with_favorite(true))
            .collect();
        drop(catalog);

        let property = options.sort.property();
        movies.sort_by(|a, b| {
            let ordering = cypher_order(a.property(property).as_ref(), b.property(property).as_ref());
            match options.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let page: Vec<Movie> = movies
            .into_iter()
            .skip(options.skip as usize)
            .take(options.limit as usize)
            .collect();

        debug!("Found {} favorites for user {user_id} in memory", page.len());
        Ok(page)
    }

    async fn add(&self, user_id: &str, movie_id: &str) -> Result<Movie> {
        let mut catalog = self.catalog.write().await;

        if !catalog.users.contains(user_id) {
            return Err(StoreError::not_found(user_id, movie_id));
        }
        let movie = match catalog.movies.get(movie_id) {
            Some(movie) => movie.clone().with_favorite(true),
            None => return Err(StoreError::not_found(user_id, movie_id)),
        };

        if catalog
            .favorites
            .insert((user_id.to_string(), movie_id.to_string()))
        {
            info!("Added movie {movie_id} to favorites of user {user_id}");
        }
        Ok(movie)
    }

    async fn remove(&self, user_id: &str, movie_id: &str) -> Result<Movie> {
        let mut catalog = self.catalog.write().await;

        if !catalog
            .favorites
            .remove(&(user_id.to_string(), movie_id.to_string()))
        {
            return Err(StoreError::not_found(user_id, movie_id));
        }

        let movie = catalog
            .movies
            .get(movie_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(user_id, movie_id))?;

        info!("Removed movie {movie_id} from favorites of user {user_id}");
        Ok(movie.with_favorite(false))
    }
}

/// Rank of a value's type in Cypher's ascending `ORDER BY`.
fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        Some(Value::Object(_)) => 0,
        Some(Value::Array(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Bool(_)) => 3,
        Some(Value::Number(_)) => 4,
        Some(Value::Null) | None => 5,
    }
}

/// Ascending Cypher ordering: strings < booleans < numbers, nulls last.
fn cypher_order(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::Array(x)), Some(Value::Array(y))) => x
            .iter()
            .zip(y.iter())
            .map(|(x, y)| cypher_order(Some(x), Some(y)))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::MovieSort;
    use serde_json::json;

    async fn store_with_titles(user_id: &str, titles: &[&str]) -> InMemoryFavorites {
        let store = InMemoryFavorites::new();
        store.insert_user(user_id).await;
        for (i, title) in titles.iter().enumerate() {
            let tmdb_id = format!("{}", i + 1);
            store
                .insert_movie(Movie::new(tmdb_id.clone()).with_property("title", *title))
                .await;
            store.add(user_id, &tmdb_id).await.unwrap();
        }
        store
    }

    fn titles(movies: &[Movie]) -> Vec<&str> {
        movies.iter().filter_map(Movie::title).collect()
    }

    #[tokio::test]
    async fn test_unknown_user_has_no_favorites() {
        let store = InMemoryFavorites::new();
        let movies = store.all("nobody", &ListOptions::default()).await.unwrap();
        assert!(movies.is_empty());
    }

    #[tokio::test]
    async fn test_sort_skip_limit() {
        let store = store_with_titles("u1", &["B", "A", "C"]).await;
        let options = ListOptions::default().with_limit(2);

        let first = store.all("u1", &options).await.unwrap();
        assert_eq!(titles(&first), vec!["A", "B"]);
        assert!(first.iter().all(|m| m.favorite));

        let second = store.all("u1", &options.with_skip(1)).await.unwrap();
        assert_eq!(titles(&second), vec!["B", "C"]);

        let desc = store
            .all("u1", &ListOptions::default().with_order(SortOrder::Desc))
            .await
            .unwrap();
        assert_eq!(titles(&desc), vec!["C", "B", "A"]);
    }

    #[tokio::test]
    async fn test_default_limit_is_six() {
        let store = store_with_titles("u1", &["a", "b", "c", "d", "e", "f", "g", "h"]).await;
        let movies = store.all("u1", &ListOptions::default()).await.unwrap();
        assert_eq!(movies.len(), 6);
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let store = store_with_titles("u1", &["Heat"]).await;

        let again = store.add("u1", "1").await.unwrap();
        assert!(again.favorite);
        assert_eq!(store.favorite_count("u1").await, 1);
    }

    #[tokio::test]
    async fn test_add_requires_user_and_movie() {
        let store = store_with_titles("u1", &["Heat"]).await;

        let err = store.add("u1", "999").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { ref movie_id, .. } if movie_id == "999"));

        let err = store.add("ghost", "1").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.favorite_count("ghost").await, 0);
    }

    #[tokio::test]
    async fn test_remove_favorite() {
        let store = store_with_titles("u1", &["Heat", "Ronin"]).await;

        let removed = store.remove("u1", "1").await.unwrap();
        assert!(!removed.favorite);
        assert_eq!(removed.title(), Some("Heat"));

        let left = store.all("u1", &ListOptions::default()).await.unwrap();
        assert_eq!(titles(&left), vec!["Ronin"]);

        assert!(store.remove("u1", "1").await.unwrap_err().is_not_found());
        assert!(store.remove("u1", "404").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_numeric_sort_puts_missing_values_last() {
        let store = InMemoryFavorites::new();
        store.insert_user("u1").await;
        store
            .insert_movie(Movie::new("1").with_property("imdbRating", 7.1))
            .await;
        store
            .insert_movie(Movie::new("2").with_property("imdbRating", 8.7))
            .await;
        store.insert_movie(Movie::new("3")).await;
        for id in ["1", "2", "3"] {
            store.add("u1", id).await.unwrap();
        }

        let options = ListOptions::default().with_sort(MovieSort::ImdbRating);
        let asc: Vec<String> = store
            .all("u1", &options)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.tmdb_id)
            .collect();
        assert_eq!(asc, vec!["1", "2", "3"]);

        let desc: Vec<String> = store
            .all("u1", &options.with_order(SortOrder::Desc))
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.tmdb_id)
            .collect();
        assert_eq!(desc, vec!["3", "2", "1"]);
    }

    #[test]
    fn test_cypher_order_across_types() {
        assert_eq!(
            cypher_order(Some(&json!("zzz")), Some(&json!(1))),
            Ordering::Less
        );
        assert_eq!(cypher_order(Some(&json!(2)), None), Ordering::Less);
        assert_eq!(
            cypher_order(Some(&json!(["a", "b"])), Some(&json!(["a"]))),
            Ordering::Greater
        );
    }
}
