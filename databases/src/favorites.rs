//! Favorites repository backed by Neo4j
//!
//! A user's favorites are `(:User)-[:HAS_FAVORITE]->(:Movie)` relationships.
//! Every call checks one pooled connection out for the duration of a single
//! query or transaction.

use async_trait::async_trait;
use neo4rs::{query, Query, Txn};
use tracing::{debug, info, warn};

use crate::errors::{Result, StoreError};
use crate::movie::Movie;
use crate::neo4j::Neo4jHandle;
use crate::query::ListOptions;
use crate::FavoriteStore;

pub(crate) const ADD_FAVORITE: &str = "\
MATCH (u:User {userId: $userId})
MATCH (m:Movie {tmdbId: $movieId})
MERGE (u)-[r:HAS_FAVORITE]-(m)
RETURN m { .*, favorite: true } AS movie";

pub(crate) const REMOVE_FAVORITE: &str = "\
MATCH (u:User {userId: $userId})-[r:HAS_FAVORITE]->(m:Movie {tmdbId: $movieId})
DELETE r
RETURN m { .*, favorite: false } AS movie";

/// Cypher for one page of a user's favorites.
///
/// Only the allow-listed sort property and order keyword are spliced in;
/// `$userId`, `$skip` and `$limit` stay bound parameters.
pub(crate) fn list_favorites_query(options: &ListOptions) -> String {
    format!(
        "MATCH (u:User {{userId: $userId}})-[r:HAS_FAVORITE]->(m:Movie)
RETURN m {{ .*, favorite: true }} AS movie
ORDER BY m.`{}` {}
SKIP $skip
LIMIT $limit",
        options.sort.property(),
        options.order.keyword()
    )
}

/// Neo4j implementation of [`FavoriteStore`]
#[derive(Debug, Clone)]
pub struct FavoritesRepository {
    handle: Neo4jHandle,
}

impl FavoritesRepository {
    pub fn new(handle: Neo4jHandle) -> Self {
        Self { handle }
    }

    /// Run a single-row write in its own transaction.
    ///
    /// Commits when the query produced a row, otherwise rolls back.
    async fn write_single(&self, statement: Query) -> Result<Option<Movie>> {
        let mut txn = self.handle.graph().start_txn().await?;

        match Self::fetch_single(&mut txn, statement).await {
            Ok(Some(movie)) => {
                txn.commit().await?;
                Ok(Some(movie))
            }
            Ok(None) => {
                txn.rollback().await?;
                Ok(None)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!("Rollback after failed favorites write also failed: {rollback_err}");
                }
                Err(e)
            }
        }
    }

    async fn fetch_single(txn: &mut Txn, statement: Query) -> Result<Option<Movie>> {
        let mut stream = txn.execute(statement).await?;

        // Drain the stream so the transaction can be committed.
        let mut first = None;
        while let Some(row) = stream.next(txn.handle()).await? {
            if first.is_none() {
                first = Some(row.get::<Movie>("movie")?);
            }
        }
        Ok(first)
    }
}

#[async_trait]
impl FavoriteStore for FavoritesRepository {
    async fn all(&self, user_id: &str, options: &ListOptions) -> Result<Vec<Movie>> {
        let statement = query(&list_favorites_query(options))
            .param("userId", user_id)
            .param("skip", i64::from(options.skip))
            .param("limit", i64::from(options.limit));

        let mut result = self.handle.graph().execute(statement).await?;

        let mut movies = Vec::new();
        while let Some(row) = result.next().await? {
            movies.push(row.get::<Movie>("movie")?);
        }

        debug!(
            "Found {} favorites for user {user_id} (sort={}, order={}, skip={}, limit={})",
            movies.len(),
            options.sort,
            options.order,
            options.skip,
            options.limit
        );
        Ok(movies)
    }

    async fn add(&self, user_id: &str, movie_id: &str) -> Result<Movie> {
        let statement = query(ADD_FAVORITE)
            .param("userId", user_id)
            .param("movieId", movie_id);

        match self.write_single(statement).await? {
            Some(movie) => {
                info!("Added movie {movie_id} to favorites of user {user_id}");
                Ok(movie)
            }
            None => {
                warn!("Cannot favorite: user {user_id} or movie {movie_id} not found");
                Err(StoreError::not_found(user_id, movie_id))
            }
        }
    }

    async fn remove(&self, user_id: &str, movie_id: &str) -> Result<Movie> {
        let statement = query(REMOVE_FAVORITE)
            .param("userId", user_id)
            .param("movieId", movie_id);

        match self.write_single(statement).await? {
            Some(movie) => {
                info!("Removed movie {movie_id} from favorites of user {user_id}");
                Ok(movie)
            }
            None => {
                warn!("Cannot unfavorite: no favorite from user {user_id} to movie {movie_id}");
                Err(StoreError::not_found(user_id, movie_id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neo4j::{DriverLifecycle, Neo4jConfig};
    use crate::query::{MovieSort, SortOrder};

    #[test]
    fn test_list_query_uses_default_options() {
        let cypher = list_favorites_query(&ListOptions::default());
        assert!(cypher.contains("MATCH (u:User {userId: $userId})-[r:HAS_FAVORITE]->(m:Movie)"));
        assert!(cypher.contains("RETURN m { .*, favorite: true } AS movie"));
        assert!(cypher.contains("ORDER BY m.`title` ASC"));
        assert!(cypher.contains("SKIP $skip"));
        assert!(cypher.contains("LIMIT $limit"));
    }

    #[test]
    fn test_list_query_splices_only_allow_listed_fragments() {
        let options = ListOptions::default()
            .with_sort(MovieSort::ImdbRating)
            .with_order(SortOrder::Desc)
            .with_limit(100)
            .with_skip(20);
        let cypher = list_favorites_query(&options);

        assert!(cypher.contains("ORDER BY m.`imdbRating` DESC"));
        // paging stays parameterized
        assert!(!cypher.contains("100"));
        assert!(!cypher.contains("20"));
    }

    #[test]
    fn test_write_queries_bind_parameters() {
        for cypher in [ADD_FAVORITE, REMOVE_FAVORITE] {
            assert!(cypher.contains("$userId"));
            assert!(cypher.contains("$movieId"));
            assert!(cypher.contains("AS movie"));
        }
        assert!(ADD_FAVORITE.contains("MERGE (u)-[r:HAS_FAVORITE]-(m)"));
        assert!(ADD_FAVORITE.contains("favorite: true"));
        assert!(REMOVE_FAVORITE.contains("DELETE r"));
        assert!(REMOVE_FAVORITE.contains("favorite: false"));
    }

    async fn seeded_repository(user_id: &str, movies: &[(&str, &str)]) -> FavoritesRepository {
        let lifecycle = DriverLifecycle::new();
        let handle = lifecycle.init(&Neo4jConfig::default()).await.unwrap();

        handle
            .graph()
            .run(query("MERGE (:User {userId: $userId})").param("userId", user_id))
            .await
            .unwrap();
        for (tmdb_id, title) in movies {
            handle
                .graph()
                .run(
                    query("MERGE (m:Movie {tmdbId: $tmdbId}) SET m.title = $title")
                        .param("tmdbId", *tmdb_id)
                        .param("title", *title),
                )
                .await
                .unwrap();
        }

        FavoritesRepository::new(handle)
    }

    async fn cleanup(repository: &FavoritesRepository, user_id: &str, prefix: &str) {
        repository
            .handle
            .graph()
            .run(
                query(
                    "MATCH (n) WHERE n.userId = $userId OR n.tmdbId STARTS WITH $prefix \
                     DETACH DELETE n",
                )
                .param("userId", user_id)
                .param("prefix", prefix),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    #[ignore] // Integration test requiring Neo4j
    async fn test_favorites_integration() {
        let user_id = format!("test-user-{}", uuid::Uuid::new_v4());
        let prefix = format!("test-{}-", uuid::Uuid::new_v4());
        let ids: Vec<String> = (1..=3).map(|i| format!("{prefix}{i}")).collect();
        let repository = seeded_repository(
            &user_id,
            &[
                (ids[0].as_str(), "B"),
                (ids[1].as_str(), "A"),
                (ids[2].as_str(), "C"),
            ],
        )
        .await;

        assert!(repository
            .all(&user_id, &ListOptions::default())
            .await
            .unwrap()
            .is_empty());

        for id in &ids {
            let movie = repository.add(&user_id, id).await.unwrap();
            assert!(movie.favorite);
        }
        // merging the same favorite twice keeps a single relationship
        assert!(repository.add(&user_id, &ids[0]).await.unwrap().favorite);

        let options = ListOptions::default().with_limit(2);
        let titles = |movies: Vec<Movie>| {
            movies
                .iter()
                .map(|m| m.title().unwrap_or_default().to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(
            titles(repository.all(&user_id, &options).await.unwrap()),
            vec!["A", "B"]
        );
        assert_eq!(
            titles(repository.all(&user_id, &options.with_skip(1)).await.unwrap()),
            vec!["B", "C"]
        );
        assert_eq!(
            repository
                .all(&user_id, &ListOptions::default())
                .await
                .unwrap()
                .len(),
            3
        );

        let removed = repository.remove(&user_id, &ids[1]).await.unwrap();
        assert!(!removed.favorite);
        assert_eq!(
            titles(repository.all(&user_id, &ListOptions::default()).await.unwrap()),
            vec!["B", "C"]
        );

        assert!(repository
            .remove(&user_id, &ids[1])
            .await
            .unwrap_err()
            .is_not_found());
        assert!(repository
            .add(&user_id, &format!("{prefix}missing"))
            .await
            .unwrap_err()
            .is_not_found());

        cleanup(&repository, &user_id, &prefix).await;
    }
}
