//! Client for the iTunes Search API.
//!
//! Only the two endpoints the catalog needs are covered: term search and
//! lookup by collection id. Records come back in the provider's own shape;
//! mapping them into albums and tracks is left to the catalog source.

use crate::api_client::{ApiError, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Kind of entity a search or lookup should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Album,
    Song,
}

impl Entity {
    fn as_str(self) -> &'static str {
        match self {
            Entity::Album => "album",
            Entity::Song => "song",
        }
    }
}

/// Envelope returned by both `/search` and `/lookup`.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "resultCount", default)]
    result_count: usize,
    #[serde(default)]
    results: Vec<ITunesRecord>,
}

/// One entry of a results array. Collections and tracks share the shape, so
/// every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ITunesRecord {
    pub wrapper_type: Option<String>,
    pub kind: Option<String>,
    pub artist_id: Option<u64>,
    pub artist_name: Option<String>,
    pub collection_id: Option<u64>,
    pub collection_name: Option<String>,
    pub artwork_url100: Option<String>,
    pub primary_genre_name: Option<String>,
    pub release_date: Option<String>,
    pub track_id: Option<u64>,
    pub track_name: Option<String>,
    pub disc_number: Option<u32>,
    pub track_number: Option<u32>,
    pub track_time_millis: Option<u64>,
    pub preview_url: Option<String>,
}

pub struct ITunesClient {
    client: Client,
    base_url: String,
}

impl ITunesClient {
    /// Creates a client against `base_url`, normally `https://itunes.apple.com`.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Searches the catalog for `term`, returning at most `limit` records.
    pub async fn search(
        &self,
        term: &str,
        entity: Entity,
        limit: usize,
    ) -> Result<Vec<ITunesRecord>, ApiError> {
        let url = format!("{}/search", self.base_url);
        let query = [
            ("term", term.to_string()),
            ("entity", entity.as_str().to_string()),
            ("limit", limit.to_string()),
        ];
        self.get(&url, &query).await
    }

    /// Looks up a collection and its children.
    ///
    /// The first record of the result is the collection itself, the rest are
    /// the `entity` records that belong to it.
    pub async fn lookup(&self, id: u64, entity: Entity) -> Result<Vec<ITunesRecord>, ApiError> {
        let url = format!("{}/lookup", self.base_url);
        let query = [
            ("id", id.to_string()),
            ("entity", entity.as_str().to_string()),
        ];
        self.get(&url, &query).await
    }

    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Vec<ITunesRecord>, ApiError> {
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body: SearchResponse = response.json().await?;
        debug!("{} returned {} results", url, body.result_count);
        Ok(body.results)
    }
}
