//! Movie projection returned by the favorites stores.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A `:Movie` node's properties plus the computed `favorite` flag.
///
/// Only `tmdbId` and `favorite` are typed; every other property is kept as-is
/// in `properties` and flattened back out on serialization, so the JSON shape
/// is exactly the Cypher map projection `m { .*, favorite: ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "tmdbId")]
    pub tmdb_id: String,
    /// Whether the requesting user has the movie in their favorites.
    pub favorite: bool,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl Movie {
    pub fn new(tmdb_id: impl Into<String>) -> Self {
        Self {
            tmdb_id: tmdb_id.into(),
            favorite: false,
            properties: Map::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = favorite;
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.properties.get("title").and_then(Value::as_str)
    }

    /// Look up a property by its node property name, `tmdbId` included.
    pub fn property(&self, name: &str) -> Option<Value> {
        match name {
            "tmdbId" => Some(Value::String(self.tmdb_id.clone())),
            "favorite" => Some(Value::Bool(self.favorite)),
            _ => self.properties.get(name).cloned(),
        }
    }
}
