use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use dictionary::Dictionary;
use lexicon::audio::{AudioPlayer, PlaybackState};
use lexicon::results::{plain_lines, FETCH_FAILED_MESSAGE, NO_SYNONYMS};
use lexicon::{App, AppChannels, Config, FetchStatus};
use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Clone, Default)]
struct SharedPlayer(Arc<Mutex<Vec<String>>>);

impl AudioPlayer for SharedPlayer {
    fn play(&mut self, src: &str) -> anyhow::Result<()> {
        self.0.lock().unwrap().push(format!("play {src}"));
        Ok(())
    }

    fn pause(&mut self) -> anyhow::Result<()> {
        self.0.lock().unwrap().push("pause".to_owned());
        Ok(())
    }
}

fn hello_body() -> serde_json::Value {
    json!([{
        "word": "hello",
        "phonetic": "/həˈloʊ/",
        "phonetics": [{ "audio": "a.mp3" }],
        "meanings": [{
            "partOfSpeech": "exclamation",
            "definitions": [{ "definition": "A greeting." }],
            "synonyms": []
        }],
        "sourceUrls": ["https://example.com"]
    }])
}

fn entry(word: &str) -> serde_json::Value {
    json!([{
        "word": word,
        "meanings": [{
            "partOfSpeech": "noun",
            "definitions": [{ "definition": format!("A {word}.") }],
            "synonyms": ["pet"]
        }]
    }])
}

async fn mount(server: &MockServer, word: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/entries/en/{word}")))
        .respond_with(response)
        .mount(server)
        .await;
}

fn app_for(server: &MockServer, player: SharedPlayer) -> (App<Dictionary>, AppChannels) {
    app_at(format!("{}/entries/en", server.uri()), player)
}

fn app_at(base_url: String, player: SharedPlayer) -> (App<Dictionary>, AppChannels) {
    let dictionary = Dictionary::with_client(reqwest::Client::new(), base_url);
    App::new(&Config::default(), dictionary, Box::new(player))
}

/// Forwards the latest published term to the pipeline, like the event loop.
fn react_to_term(app: &mut App<Dictionary>, channels: &mut AppChannels) {
    assert!(channels.terms.has_changed().unwrap());
    let term = channels.terms.borrow_and_update().clone();
    app.on_term(term);
}

async fn settle_next(app: &mut App<Dictionary>, channels: &mut AppChannels) {
    let settlement = tokio::time::timeout(Duration::from_secs(5), channels.settled.recv())
        .await
        .expect("lookup should settle")
        .expect("settlement channel open");
    app.on_settled(settlement);
}

fn rendered(app: &mut App<Dictionary>) -> Vec<String> {
    let view = app.view(Instant::now()).expect("boundary should not trip");
    plain_lines(&view.results)
}

#[tokio::test]
async fn hello_renders_headword_meaning_and_source() {
    let server = MockServer::start().await;
    mount(
        &server,
        "hello",
        ResponseTemplate::new(200).set_body_json(hello_body()),
    )
    .await;
    let (mut app, mut channels) = app_for(&server, SharedPlayer::default());

    assert!(app.submit_word("hello"));
    react_to_term(&mut app, &mut channels);
    settle_next(&mut app, &mut channels).await;

    let lines = rendered(&mut app);
    assert_eq!(lines[0], "hello");
    assert_eq!(lines[1], "/həˈloʊ/");
    assert!(lines.iter().any(|line| line == "── exclamation ──"));
    assert!(lines.iter().any(|line| line == "  • A greeting."));
    assert!(lines.iter().any(|line| line == &format!("  {NO_SYNONYMS}")));
    assert_eq!(lines.last().map(String::as_str), Some("https://example.com"));
}

#[tokio::test]
async fn not_found_renders_only_the_failure_message() {
    let server = MockServer::start().await;
    mount(
        &server,
        "zzzzz",
        ResponseTemplate::new(404).set_body_json(json!({
            "title": "No Definitions Found",
            "message": "Sorry pal, we couldn't find definitions for the word you were looking for."
        })),
    )
    .await;
    let (mut app, mut channels) = app_for(&server, SharedPlayer::default());

    app.submit_word("zzzzz");
    react_to_term(&mut app, &mut channels);
    settle_next(&mut app, &mut channels).await;

    assert_eq!(app.pipeline().status(), &FetchStatus::Failed);
    assert_eq!(rendered(&mut app), [FETCH_FAILED_MESSAGE]);
    assert_eq!(app.search_state().current().unwrap().as_str(), "zzzzz");
}

#[tokio::test]
async fn unreachable_api_renders_only_the_failure_message() {
    // Nothing listens on port 1, so the connection is refused.
    let (mut app, mut channels) = app_at(
        "http://127.0.0.1:1/entries/en".to_owned(),
        SharedPlayer::default(),
    );

    app.submit_word("hello");
    react_to_term(&mut app, &mut channels);
    settle_next(&mut app, &mut channels).await;

    assert_eq!(app.pipeline().status(), &FetchStatus::Failed);
    assert_eq!(rendered(&mut app), [FETCH_FAILED_MESSAGE]);
}

#[tokio::test]
async fn later_word_wins_over_slower_earlier_word() {
    let server = MockServer::start().await;
    mount(
        &server,
        "cat",
        ResponseTemplate::new(200)
            .set_body_json(entry("cat"))
            .set_delay(Duration::from_millis(400)),
    )
    .await;
    mount(
        &server,
        "dog",
        ResponseTemplate::new(200).set_body_json(entry("dog")),
    )
    .await;
    let (mut app, mut channels) = app_for(&server, SharedPlayer::default());

    app.submit_word("cat");
    react_to_term(&mut app, &mut channels);
    app.submit_word("dog");
    react_to_term(&mut app, &mut channels);
    settle_next(&mut app, &mut channels).await;

    assert_eq!(rendered(&mut app)[0], "dog");

    tokio::time::sleep(Duration::from_millis(800)).await;
    assert!(channels.settled.try_recv().is_err());
    assert_eq!(rendered(&mut app)[0], "dog");
}

#[tokio::test]
async fn previous_entry_stays_on_screen_while_next_loads() {
    let server = MockServer::start().await;
    mount(
        &server,
        "hello",
        ResponseTemplate::new(200).set_body_json(hello_body()),
    )
    .await;
    mount(
        &server,
        "dog",
        ResponseTemplate::new(200)
            .set_body_json(entry("dog"))
            .set_delay(Duration::from_millis(200)),
    )
    .await;
    let (mut app, mut channels) = app_for(&server, SharedPlayer::default());

    app.submit_word("hello");
    react_to_term(&mut app, &mut channels);
    settle_next(&mut app, &mut channels).await;

    app.submit_word("dog");
    react_to_term(&mut app, &mut channels);
    let view = app.view(Instant::now()).unwrap();
    assert!(view.loading);
    assert_eq!(plain_lines(&view.results)[0], "hello");

    settle_next(&mut app, &mut channels).await;
    assert_eq!(rendered(&mut app)[0], "dog");
}

#[tokio::test]
async fn playback_toggles_and_resets_on_new_entry() {
    let server = MockServer::start().await;
    mount(
        &server,
        "hello",
        ResponseTemplate::new(200).set_body_json(hello_body()),
    )
    .await;
    mount(
        &server,
        "dog",
        ResponseTemplate::new(200).set_body_json(entry("dog")),
    )
    .await;
    let player = SharedPlayer::default();
    let calls = Arc::clone(&player.0);
    let (mut app, mut channels) = app_for(&server, player);

    app.submit_word("hello");
    react_to_term(&mut app, &mut channels);
    settle_next(&mut app, &mut channels).await;

    let ctrl_p = Event::Key(KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL));
    app.handle_event(ctrl_p);
    assert_eq!(app.audio().state(), PlaybackState::Playing);
    assert!(rendered(&mut app)[2].ends_with("⏸ Pause"));

    app.submit_word("dog");
    react_to_term(&mut app, &mut channels);
    settle_next(&mut app, &mut channels).await;

    assert_eq!(app.audio().state(), PlaybackState::Paused);
    assert_eq!(app.audio().src(), None);
    assert_eq!(*calls.lock().unwrap(), ["play a.mp3", "pause"]);
}
