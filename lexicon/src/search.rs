use std::fmt;

use tokio::sync::watch;

pub const EMPTY_SEARCH_MESSAGE: &str = "Please enter a word";

/// A word the user committed to look up. Never blank, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The current word, shared between the search box and the lookup pipeline.
///
/// Every publish notifies subscribers, even when the term equals the
/// previous one, so resubmitting a word looks it up again.
#[derive(Debug, Clone)]
pub struct SearchState {
    tx: watch::Sender<Option<SearchTerm>>,
}

impl SearchState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn publish(&self, term: SearchTerm) {
        tracing::debug!(term = %term, "search term published");
        self.tx.send_replace(Some(term));
    }

    pub fn current(&self) -> Option<SearchTerm> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<SearchTerm>> {
        self.tx.subscribe()
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

/// Text box with inline validation. Publishes only on submit.
#[derive(Debug, Default)]
pub struct SearchInput {
    text: String,
    buffer: String,
    has_error: bool,
}

impl SearchInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.has_error.then_some(EMPTY_SEARCH_MESSAGE)
    }

    pub fn on_change(&mut self, value: &str) {
        self.text.clear();
        self.text.push_str(value);
        if value.trim().is_empty() {
            self.has_error = true;
            self.buffer.clear();
        } else {
            self.has_error = false;
            self.buffer.clear();
            self.buffer.push_str(value);
        }
    }

    pub fn push(&mut self, ch: char) {
        let mut value = self.text.clone();
        value.push(ch);
        self.on_change(&value);
    }

    pub fn backspace(&mut self) {
        let mut value = self.text.clone();
        if value.pop().is_some() {
            self.on_change(&value);
        }
    }

    /// Returns whether a term was published.
    pub fn submit(&mut self, state: &SearchState) -> bool {
        match SearchTerm::new(self.buffer.as_str()) {
            Some(term) => {
                state.publish(term);
                true
            }
            None => {
                self.has_error = true;
                false
            }
        }
    }
}
