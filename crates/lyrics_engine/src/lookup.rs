use std::time::Duration;

use url::Url;

use crate::{FailureKind, LookupError, LyricsMatch, LyricsQuery};

const DEFAULT_USER_AGENT: &str = concat!("lyrics_harvester/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct LookupSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Remote lyrics capability. `Ok(None)` means the service answered but has
/// no lyrics for the query; `Err` is a failed attempt worth retrying.
#[async_trait::async_trait]
pub trait LyricsLookup: Send + Sync {
    async fn find_lyrics(&self, query: &LyricsQuery) -> Result<Option<LyricsMatch>, LookupError>;
}

pub(crate) fn build_client(settings: &LookupSettings) -> Result<reqwest::Client, LookupError> {
    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .user_agent(settings.user_agent.clone())
        .build()
        .map_err(|err| LookupError::new(FailureKind::Network, err.to_string()))
}

/// Parses a service root, making sure relative joins append to its path.
pub(crate) fn parse_base_url(base: &str) -> Result<Url, LookupError> {
    let mut url =
        Url::parse(base).map_err(|err| LookupError::new(FailureKind::InvalidUrl, err.to_string()))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

pub(crate) fn join_endpoint(base: &Url, endpoint: &str) -> Result<Url, LookupError> {
    base.join(endpoint)
        .map_err(|err| LookupError::new(FailureKind::InvalidUrl, err.to_string()))
}

pub(crate) fn status_error(status: reqwest::StatusCode) -> LookupError {
    LookupError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string())
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> LookupError {
    if err.is_timeout() {
        return LookupError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return LookupError::new(FailureKind::Decode, err.to_string());
    }
    LookupError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash_for_joins() {
        let base = parse_base_url("http://localhost:8080/proxy").unwrap();
        let joined = join_endpoint(&base, "api/get").unwrap();
        assert_eq!(joined.as_str(), "http://localhost:8080/proxy/api/get");

        let base = parse_base_url("https://lrclib.net").unwrap();
        let joined = join_endpoint(&base, "api/get").unwrap();
        assert_eq!(joined.as_str(), "https://lrclib.net/api/get");
    }

    #[test]
    fn invalid_base_url_is_reported() {
        let err = parse_base_url("not a url").unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }
}
