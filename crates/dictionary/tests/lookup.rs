use std::time::Duration;

use dictionary::{Dictionary, DictionaryError};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn dictionary_for(server: &MockServer) -> Dictionary {
    Dictionary::with_client(reqwest::Client::new(), format!("{}/entries/en", server.uri()))
}

fn hello_body() -> serde_json::Value {
    json!([
        {
            "word": "hello",
            "phonetic": "/həˈloʊ/",
            "phonetics": [{ "audio": "a.mp3" }],
            "meanings": [{
                "partOfSpeech": "exclamation",
                "definitions": [{ "definition": "A greeting." }],
                "synonyms": []
            }],
            "sourceUrls": ["https://example.com"]
        },
        {
            "word": "hello",
            "meanings": [{
                "partOfSpeech": "noun",
                "definitions": [{ "definition": "An utterance of hello." }]
            }]
        }
    ])
}

#[tokio::test]
async fn returns_the_first_entry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/entries/en/hello"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hello_body()))
        .expect(1)
        .mount(&server)
        .await;

    let word = dictionary_for(&server)
        .get_definition("hello")
        .await
        .expect("lookup should succeed");

    assert_eq!(word.word, "hello");
    assert_eq!(word.meanings.len(), 1);
    assert_eq!(word.meanings[0].part_of_speech, "exclamation");
    assert_eq!(word.source_url(), Some("https://example.com"));
}

#[tokio::test]
async fn not_found_carries_the_api_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/entries/en/zzzzz"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "title": "No Definitions Found",
            "message": "Sorry pal, we couldn't find definitions for the word you were looking for.",
            "resolution": "You can try the search again at later time or head to the web instead."
        })))
        .mount(&server)
        .await;

    let err = dictionary_for(&server)
        .get_definition("zzzzz")
        .await
        .unwrap_err();

    match err {
        DictionaryError::NotFound(not_found) => assert!(not_found
            .message()
            .starts_with("Sorry pal, we couldn't find definitions")),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_is_a_status_failure_regardless_of_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/entries/en/hello"))
        .respond_with(ResponseTemplate::new(500).set_body_json(hello_body()))
        .mount(&server)
        .await;

    let err = dictionary_for(&server)
        .get_definition("hello")
        .await
        .unwrap_err();

    assert!(matches!(err, DictionaryError::Status(status) if status.as_u16() == 500));
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/entries/en/hello"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = dictionary_for(&server)
        .get_definition("hello")
        .await
        .unwrap_err();

    assert!(matches!(err, DictionaryError::Deserialize(_)));
}

#[tokio::test]
async fn empty_array_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/entries/en/hello"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = dictionary_for(&server)
        .get_definition("hello")
        .await
        .unwrap_err();

    assert!(matches!(err, DictionaryError::Empty));
}

#[tokio::test]
async fn word_is_percent_encoded_in_the_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/entries/en/ice%20cream"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "word": "ice cream",
            "meanings": []
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let word = dictionary_for(&server)
        .get_definition("ice cream")
        .await
        .expect("lookup should succeed");

    assert_eq!(word.word, "ice cream");
}

#[tokio::test]
async fn slow_response_past_the_client_timeout_is_a_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/entries/en/hello"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(hello_body())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let dictionary = Dictionary::with_client(client, format!("{}/entries/en", server.uri()));

    let err = dictionary.get_definition("hello").await.unwrap_err();

    assert!(matches!(err, DictionaryError::Fetch(ref source) if source.is_timeout()), "{err:?}");
}
