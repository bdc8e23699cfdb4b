use std::time::Instant;

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::text::Text;
use tokio::sync::{mpsc, watch};

use crate::audio::{AudioControl, AudioPlayer};
use crate::boundary::ErrorBoundary;
use crate::config::Config;
use crate::header::{Document, Header};
use crate::lookup::{LookupPipeline, LookupSource, Settlement, Shown};
use crate::results::{self, Palette};
use crate::search::{SearchInput, SearchState, SearchTerm};

/// Everything a frame needs, built under the error boundary.
#[derive(Debug, Clone)]
pub struct View {
    pub palette: Palette,
    pub logo: &'static str,
    pub theme_indicator: &'static str,
    pub font_label: &'static str,
    /// Knob offset in percent of the slider track.
    pub slider_offset: f32,
    pub search_text: String,
    pub search_error: Option<&'static str>,
    pub loading: bool,
    pub results: Text<'static>,
}

pub struct App<S> {
    document: Document,
    header: Header,
    search: SearchInput,
    search_state: SearchState,
    pipeline: LookupPipeline<S>,
    audio: AudioControl,
    player: Box<dyn AudioPlayer>,
    boundary: ErrorBoundary,
    should_quit: bool,
}

/// Channels the event loop waits on besides terminal input.
pub struct AppChannels {
    pub terms: watch::Receiver<Option<SearchTerm>>,
    pub settled: mpsc::UnboundedReceiver<Settlement>,
}

impl<S: LookupSource> App<S> {
    pub fn new(config: &Config, source: S, player: Box<dyn AudioPlayer>) -> (Self, AppChannels) {
        let mut document = Document::new();
        let header = Header::new(config.theme, config.font, &mut document);
        let search_state = SearchState::new();
        let terms = search_state.subscribe();
        let (pipeline, settled) = LookupPipeline::new(source);
        let app = Self {
            document,
            header,
            search: SearchInput::new(),
            search_state,
            pipeline,
            audio: AudioControl::default(),
            player,
            boundary: ErrorBoundary::new(),
            should_quit: false,
        };
        (app, AppChannels { terms, settled })
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn search(&self) -> &SearchInput {
        &self.search
    }

    pub fn search_state(&self) -> &SearchState {
        &self.search_state
    }

    pub fn pipeline(&self) -> &LookupPipeline<S> {
        &self.pipeline
    }

    pub fn audio(&self) -> &AudioControl {
        &self.audio
    }

    /// Types `word` into the search box and submits it.
    pub fn submit_word(&mut self, word: &str) -> bool {
        self.search.on_change(word);
        self.search.submit(&self.search_state)
    }

    pub fn on_term(&mut self, term: Option<SearchTerm>) {
        self.pipeline.on_term(term);
    }

    pub fn on_settled(&mut self, settlement: Settlement) {
        if !self.pipeline.on_settled(settlement) {
            return;
        }
        let src = match self.pipeline.shown() {
            Shown::Entry(word) => word.pronunciation_audio().map(str::to_owned),
            Shown::Nothing | Shown::Failed => None,
        };
        self.audio.replace(src.as_deref(), self.player.as_mut());
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.header.tick(now);
    }

    pub fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                self.handle_key(key);
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('t') if ctrl => self.header.toggle_theme(&mut self.document),
            KeyCode::Char('f') if ctrl => self.header.cycle_font(&mut self.document),
            KeyCode::Char('p') if ctrl => self.audio.toggle(self.player.as_mut()),
            KeyCode::Char(ch) if !ctrl => self.search.push(ch),
            KeyCode::Backspace => self.search.backspace(),
            KeyCode::Enter => {
                self.search.submit(&self.search_state);
            }
            _ => {}
        }
    }

    pub(crate) fn guard<T>(&mut self, run: impl FnOnce() -> T) -> Option<T> {
        self.boundary.guard(run)
    }

    /// Builds the frame contents; `None` once a render fault tripped the boundary.
    pub fn view(&mut self, now: Instant) -> Option<View> {
        let document = &self.document;
        let header = &self.header;
        let search = &self.search;
        let pipeline = &self.pipeline;
        let audio = &self.audio;
        self.boundary.guard(|| build_view(document, header, search, pipeline, audio, now))
    }
}

fn build_view<S: LookupSource>(
    document: &Document,
    header: &Header,
    search: &SearchInput,
    pipeline: &LookupPipeline<S>,
    audio: &AudioControl,
    now: Instant,
) -> View {
    let palette = Palette::for_document(document);
    let slider_offset = {
        let knob = header.slider_button().borrow();
        match knob.style.animation {
            Some(animation) => animation.slide.offset_at(animation.progress(now)),
            None => knob.computed_transform().map_or(0.0, |t| t.0),
        }
    };
    View {
        palette,
        logo: header.logo().glyph(),
        theme_indicator: header.theme_indicator().glyph(),
        font_label: header.font().label(),
        slider_offset,
        search_text: search.text().to_owned(),
        search_error: search.error_message(),
        loading: pipeline.in_flight().is_some(),
        results: results::render(pipeline.shown(), audio.state(), &palette),
    }
}
