use lyrics_logging::lyrics_debug;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::lookup::{
    build_client, join_endpoint, map_reqwest_error, parse_base_url, status_error, LookupSettings,
    LyricsLookup,
};
use crate::{FailureKind, LookupError, LyricsMatch, LyricsQuery};

pub const DEFAULT_LRCLIB_URL: &str = "https://lrclib.net";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LrclibRecord {
    plain_lyrics: Option<String>,
}

/// Exact-match lookup against the LRCLIB `/api/get` endpoint.
#[derive(Debug, Clone)]
pub struct LrclibLookup {
    client: reqwest::Client,
    base_url: Url,
}

impl LrclibLookup {
    pub fn new(base_url: &str, settings: &LookupSettings) -> Result<Self, LookupError> {
        Ok(Self {
            client: build_client(settings)?,
            base_url: parse_base_url(base_url)?,
        })
    }

    fn request_url(&self, query: &LyricsQuery) -> Result<Url, LookupError> {
        let mut url = join_endpoint(&self.base_url, "api/get")?;
        url.query_pairs_mut()
            .append_pair("track_name", &query.track)
            .append_pair("artist_name", &query.artist);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl LyricsLookup for LrclibLookup {
    async fn find_lyrics(&self, query: &LyricsQuery) -> Result<Option<LyricsMatch>, LookupError> {
        let url = self.request_url(query)?;
        lyrics_debug!("LRCLIB GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(status_error(status));
        }

        let body = response.text().await.map_err(map_reqwest_error)?;
        let record: LrclibRecord = serde_json::from_str(&body)
            .map_err(|err| LookupError::new(FailureKind::Decode, err.to_string()))?;

        Ok(record
            .plain_lyrics
            .filter(|lyrics| !lyrics.trim().is_empty())
            .map(|lyrics| LyricsMatch {
                lyrics,
                source_url: None,
            }))
    }
}
