use crate::api_client::{ApiError, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

pub const LYRICS_NOT_FOUND: &str = "Lyrics not found for this song.";

#[derive(Debug, Deserialize)]
struct LyricsResponse {
    lyrics: Option<String>,
}

/// Client for the lyrics.ovh API.
pub struct LyricsClient {
    client: Client,
    base_url: String,
}

impl LyricsClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the lyrics of `song` by `artist`.
    ///
    /// A song the service does not know yields [`LYRICS_NOT_FOUND`] rather than
    /// an error.
    pub async fn fetch_lyrics(&self, artist: &str, song: &str) -> Result<String, ApiError> {
        let url = self.lyrics_url(artist, song);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(LYRICS_NOT_FOUND.to_string());
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body: LyricsResponse = response.json().await?;
        Ok(body
            .lyrics
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| LYRICS_NOT_FOUND.to_string()))
    }

    fn lyrics_url(&self, artist: &str, song: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            urlencoding::encode(artist),
            urlencoding::encode(song)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lyrics_url_encodes_segments() {
        let client = LyricsClient::new("https://api.lyrics.ovh/v1/").unwrap();

        assert_eq!(
            client.lyrics_url("AC/DC", "Back in Black"),
            "https://api.lyrics.ovh/v1/AC%2FDC/Back%20in%20Black"
        );
    }

    #[test]
    fn test_decode_missing_lyrics_field() {
        let body: LyricsResponse = serde_json::from_str(r#"{"error": "No lyrics found"}"#).unwrap();
        assert!(body.lyrics.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_request_error() {
        let client = LyricsClient::new("http://127.0.0.1:9").unwrap();

        let result = client.fetch_lyrics("Adele", "Hello").await;
        assert!(matches!(result, Err(ApiError::Request(_))));
    }
}
