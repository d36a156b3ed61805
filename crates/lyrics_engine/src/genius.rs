use ego_tree::NodeRef;
use lyrics_logging::lyrics_debug;
use scraper::node::Node;
use scraper::{Html, Selector};
use serde::Deserialize;
use url::Url;

use crate::lookup::{
    build_client, join_endpoint, map_reqwest_error, parse_base_url, status_error, LookupSettings,
    LyricsLookup,
};
use crate::{FailureKind, LookupError, LyricsMatch, LyricsQuery};

pub const DEFAULT_GENIUS_API_URL: &str = "https://api.genius.com";

const LYRICS_CONTAINER_SELECTOR: &str =
    r#"div[data-lyrics-container], div[class^="Lyrics__Container"]"#;

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    response: SearchResponse,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    result: HitResult,
}

#[derive(Debug, Clone, Deserialize)]
struct HitResult {
    title: String,
    url: String,
    primary_artist: PrimaryArtist,
}

#[derive(Debug, Clone, Deserialize)]
struct PrimaryArtist {
    name: String,
}

/// Two-step lookup: search the Genius API, then scrape the song page.
#[derive(Debug, Clone)]
pub struct GeniusLookup {
    client: reqwest::Client,
    api_base: Url,
    token: String,
}

impl GeniusLookup {
    pub fn new(
        api_base: &str,
        token: impl Into<String>,
        settings: &LookupSettings,
    ) -> Result<Self, LookupError> {
        Ok(Self {
            client: build_client(settings)?,
            api_base: parse_base_url(api_base)?,
            token: token.into(),
        })
    }

    async fn search(&self, query: &LyricsQuery) -> Result<Option<String>, LookupError> {
        let mut url = join_endpoint(&self.api_base, "search")?;
        url.query_pairs_mut()
            .append_pair("q", &format!("{} {}", query.track, query.artist));
        lyrics_debug!("Genius search {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        if !response.status().is_success() {
            return Err(status_error(response.status()));
        }

        let body = response.text().await.map_err(map_reqwest_error)?;
        let envelope: SearchEnvelope = serde_json::from_str(&body)
            .map_err(|err| LookupError::new(FailureKind::Decode, err.to_string()))?;
        let hits: Vec<HitResult> = envelope
            .response
            .hits
            .into_iter()
            .map(|hit| hit.result)
            .collect();

        Ok(pick_hit(&hits, query).map(|hit| hit.url.clone()))
    }

    async fn scrape(&self, page_url: &str) -> Result<Option<String>, LookupError> {
        let url = Url::parse(page_url)
            .map_err(|err| LookupError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        if !response.status().is_success() {
            return Err(status_error(response.status()));
        }
        let html = response.text().await.map_err(map_reqwest_error)?;
        Ok(extract_lyrics(&html))
    }
}

#[async_trait::async_trait]
impl LyricsLookup for GeniusLookup {
    async fn find_lyrics(&self, query: &LyricsQuery) -> Result<Option<LyricsMatch>, LookupError> {
        let Some(page_url) = self.search(query).await? else {
            return Ok(None);
        };
        let lyrics = self.scrape(&page_url).await?;
        Ok(lyrics.map(|lyrics| LyricsMatch {
            lyrics,
            source_url: Some(page_url),
        }))
    }
}

/// Prefers a hit whose title and primary artist both contain the query;
/// falls back to the top hit.
fn pick_hit<'a>(hits: &'a [HitResult], query: &LyricsQuery) -> Option<&'a HitResult> {
    let track = clean_text(&query.track);
    let artist = clean_text(&query.artist);
    hits.iter()
        .find(|hit| {
            clean_text(&hit.title).contains(&track)
                && clean_text(&hit.primary_artist.name).contains(&artist)
        })
        .or_else(|| hits.first())
}

/// Normalizes a title or artist for fuzzy comparison: lower-case, without
/// bracketed parts, quotes, or featuring credits, punctuation folded to spaces.
fn clean_text(text: &str) -> String {
    let lowered = text.to_lowercase();

    let mut stripped = String::with_capacity(lowered.len());
    let mut closing: Option<char> = None;
    for ch in lowered.chars() {
        match (closing, ch) {
            (Some(close), c) if c == close => closing = None,
            (Some(_), _) => {}
            (None, '(') => closing = Some(')'),
            (None, '[') => closing = Some(']'),
            (None, '"' | '\'') => {}
            (None, c) => stripped.push(c),
        }
    }

    let without_credits = strip_featuring(&stripped);
    let folded: String = without_credits
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_featuring(text: &str) -> &str {
    let cut = ["feat.", "ft."]
        .iter()
        .filter_map(|marker| {
            text.match_indices(marker)
                .map(|(idx, _)| idx)
                .find(|&idx| idx == 0 || text[..idx].ends_with(char::is_whitespace))
        })
        .min();
    match cut {
        Some(idx) => &text[..idx],
        None => text,
    }
}

fn extract_lyrics(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(LYRICS_CONTAINER_SELECTOR).ok()?;

    let blocks: Vec<String> = document
        .select(&selector)
        .map(|container| {
            let mut text = String::new();
            for child in container.children() {
                collect_text(child, &mut text);
            }
            text
        })
        .collect();

    let lyrics = blocks.join("\n").trim().to_string();
    if lyrics.is_empty() {
        None
    } else {
        Some(lyrics)
    }
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(text),
        Node::Element(element) if element.name().eq_ignore_ascii_case("br") => out.push('\n'),
        Node::Element(_) => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(title: &str, artist: &str, url: &str) -> HitResult {
        HitResult {
            title: title.to_string(),
            url: url.to_string(),
            primary_artist: PrimaryArtist {
                name: artist.to_string(),
            },
        }
    }

    #[test]
    fn clean_text_drops_brackets_quotes_and_credits() {
        assert_eq!(clean_text("Don't Stop (2004 Remaster)"), "dont stop");
        assert_eq!(clean_text("Rain [Live] feat. Someone"), "rain");
        assert_eq!(clean_text("Song ft. Guest"), "song");
        assert_eq!(clean_text("Defeat.Me"), "defeat me");
        assert_eq!(clean_text("AC/DC"), "ac dc");
    }

    #[test]
    fn pick_hit_prefers_matching_title_and_artist() {
        let hits = vec![
            hit("The Chain (Cover)", "Tribute Band", "https://genius.com/a"),
            hit("The Chain", "Fleetwood Mac", "https://genius.com/b"),
        ];
        let query = LyricsQuery::new("The Chain", "Fleetwood Mac");
        assert_eq!(pick_hit(&hits, &query).unwrap().url, "https://genius.com/b");
    }

    #[test]
    fn pick_hit_falls_back_to_first() {
        let hits = vec![hit("Other", "Someone", "https://genius.com/a")];
        let query = LyricsQuery::new("The Chain", "Fleetwood Mac");
        assert_eq!(pick_hit(&hits, &query).unwrap().url, "https://genius.com/a");
        assert!(pick_hit(&[], &query).is_none());
    }

    #[test]
    fn extract_lyrics_joins_containers_and_breaks() {
        let html = r#"<html><body>
            <div data-lyrics-container="true">Line one<br>Line &amp; two</div>
            <div class="Lyrics__Container-sc-1 abc"><i>Line three</i><br/>Line four</div>
            <div class="Footer">Ignore me</div>
        </body></html>"#;
        assert_eq!(
            extract_lyrics(html).as_deref(),
            Some("Line one\nLine & two\nLine three\nLine four")
        );
    }

    #[test]
    fn extract_lyrics_without_container_is_none() {
        assert_eq!(extract_lyrics("<html><body><p>nothing</p></body></html>"), None);
    }
}
