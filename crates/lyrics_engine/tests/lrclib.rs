use lyrics_engine::{FailureKind, LookupSettings, LrclibLookup, LyricsLookup, LyricsQuery};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn lookup(server: &MockServer) -> LrclibLookup {
    LrclibLookup::new(&server.uri(), &LookupSettings::default()).expect("valid base url")
}

#[tokio::test]
async fn returns_plain_lyrics_for_exact_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/get"))
        .and(query_param("track_name", "The Chain"))
        .and(query_param("artist_name", "Fleetwood Mac"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1,
            "trackName": "The Chain",
            "artistName": "Fleetwood Mac",
            "plainLyrics": "Listen to the wind blow\nWatch the sun rise",
            "syncedLyrics": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let found = lookup(&server)
        .find_lyrics(&LyricsQuery::new("The Chain", "Fleetwood Mac"))
        .await
        .expect("lookup ok")
        .expect("lyrics present");

    assert_eq!(found.lyrics, "Listen to the wind blow\nWatch the sun rise");
    assert_eq!(found.source_url, None);
}

#[tokio::test]
async fn missing_track_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/get"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "code": 404,
            "name": "TrackNotFound",
            "message": "Failed to find specified track"
        })))
        .mount(&server)
        .await;

    let result = lookup(&server)
        .find_lyrics(&LyricsQuery::new("Nope", "Nobody"))
        .await
        .expect("404 is an answer, not a failure");
    assert_eq!(result, None);
}

#[tokio::test]
async fn instrumental_without_plain_lyrics_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "trackName": "Instrumental",
            "instrumental": true,
            "plainLyrics": null
        })))
        .mount(&server)
        .await;

    let result = lookup(&server)
        .find_lyrics(&LyricsQuery::new("Instrumental", "Band"))
        .await
        .expect("lookup ok");
    assert_eq!(result, None);
}

#[tokio::test]
async fn server_error_is_a_failed_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/get"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = lookup(&server)
        .find_lyrics(&LyricsQuery::new("The Chain", "Fleetwood Mac"))
        .await
        .expect_err("500 must fail");
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn malformed_body_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/get"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = lookup(&server)
        .find_lyrics(&LyricsQuery::new("The Chain", "Fleetwood Mac"))
        .await
        .expect_err("html body must fail");
    assert_eq!(err.kind, FailureKind::Decode);
}
