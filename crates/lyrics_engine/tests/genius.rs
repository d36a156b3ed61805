use lyrics_engine::{GeniusLookup, LookupSettings, LyricsLookup, LyricsQuery};
use pretty_assertions::assert_eq;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "secret-token";

fn lookup(server: &MockServer) -> GeniusLookup {
    GeniusLookup::new(&server.uri(), TOKEN, &LookupSettings::default()).expect("valid base url")
}

fn search_body(hits: serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "meta": { "status": 200 }, "response": { "hits": hits } })
}

#[tokio::test]
async fn searches_then_scrapes_song_page() {
    let server = MockServer::start().await;
    let page_url = format!("{}/Fleetwood-mac-the-chain-lyrics", server.uri());

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "The Chain Fleetwood Mac"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(serde_json::json!([
            {
                "type": "song",
                "result": {
                    "title": "The Chain",
                    "url": page_url,
                    "primary_artist": { "name": "Fleetwood Mac" }
                }
            }
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/Fleetwood-mac-the-chain-lyrics"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><body>
                <div data-lyrics-container="true">Listen to the wind blow<br>Watch the sun rise</div>
            </body></html>"#,
            "text/html; charset=utf-8",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let found = lookup(&server)
        .find_lyrics(&LyricsQuery::new("The Chain", "Fleetwood Mac"))
        .await
        .expect("lookup ok")
        .expect("lyrics present");

    assert_eq!(found.lyrics, "Listen to the wind blow\nWatch the sun rise");
    assert_eq!(found.source_url.as_deref(), Some(page_url.as_str()));
}

#[tokio::test]
async fn no_search_hits_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(search_body(serde_json::json!([]))),
        )
        .mount(&server)
        .await;

    let result = lookup(&server)
        .find_lyrics(&LyricsQuery::new("Nope", "Nobody"))
        .await
        .expect("lookup ok");
    assert_eq!(result, None);
}

#[tokio::test]
async fn rejected_token_is_a_failed_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = lookup(&server)
        .find_lyrics(&LyricsQuery::new("The Chain", "Fleetwood Mac"))
        .await
        .expect_err("401 must fail");
    assert_eq!(err.kind, lyrics_engine::FailureKind::HttpStatus(401));
}
