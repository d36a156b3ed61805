use std::sync::Arc;
use std::time::Duration;

use lyrics_core::{FetchResult, WorkUnit};
use lyrics_logging::{lyrics_debug, lyrics_warn};

use crate::lookup::LyricsLookup;
use crate::LyricsQuery;

pub const DEFAULT_RETRY_LIMIT: u32 = 3;
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per unit, including the first.
    pub limit: u32,
    /// Fixed pause between attempts on the same unit.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            limit: DEFAULT_RETRY_LIMIT,
            backoff: DEFAULT_RETRY_BACKOFF,
        }
    }
}

/// Wraps a lookup with a bounded number of attempts.
pub struct RetryingFetcher {
    lookup: Arc<dyn LyricsLookup>,
    policy: RetryPolicy,
}

impl RetryingFetcher {
    pub fn new(lookup: Arc<dyn LyricsLookup>, policy: RetryPolicy) -> Self {
        Self { lookup, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Not-found answers are final and never retried; only failed attempts are.
    pub async fn fetch(&self, unit: &WorkUnit) -> FetchResult {
        let query = LyricsQuery::from_unit(unit);
        let limit = self.policy.limit.max(1);

        let mut attempt = 1;
        loop {
            lyrics_debug!(
                "Lookup attempt {}/{} for \"{}\" - {}",
                attempt,
                limit,
                query.track,
                query.artist
            );
            match self.lookup.find_lyrics(&query).await {
                Ok(Some(found)) => {
                    return FetchResult::Found {
                        lyrics: found.lyrics,
                        source_url: found.source_url,
                    }
                }
                Ok(None) => return FetchResult::NotFound,
                Err(err) => {
                    lyrics_warn!(
                        "Attempt {}/{} failed for \"{}\" - {}: {}",
                        attempt,
                        limit,
                        query.track,
                        query.artist,
                        err
                    );
                    if attempt >= limit {
                        return FetchResult::Error {
                            message: err.to_string(),
                        };
                    }
                    tokio::time::sleep(self.policy.backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}
