//! Reacts to committed search terms by fetching entries from a
//! [`LookupSource`], keeping at most one request live at a time.
//!
//! Each request runs on its own task under a child of the pipeline's
//! cancellation token. Starting a new term cancels the previous child, which
//! drops the in-flight request future. A settlement still racing through the
//! channel is rejected by [`LookupPipeline::on_settled`], which checks both
//! the generation and the token before touching any state.

use std::sync::Arc;

use dictionary::{Dictionary, DictionaryError, Word};
use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::search::SearchTerm;

/// Where the pipeline gets entries from.
pub trait LookupSource: Send + Sync + 'static {
    fn lookup(&self, term: &str) -> BoxFuture<'static, Result<Word, DictionaryError>>;
}

impl LookupSource for Dictionary {
    fn lookup(&self, term: &str) -> BoxFuture<'static, Result<Word, DictionaryError>> {
        let dictionary = self.clone();
        let term = term.to_owned();
        async move { dictionary.get_definition(&term).await }.boxed()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchStatus {
    Idle,
    Pending,
    Success(Arc<Word>),
    Failed,
}

/// What the results panel paints: the last settled outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Shown {
    Nothing,
    Entry(Arc<Word>),
    Failed,
}

/// Finished request, sent back to the event loop.
#[derive(Debug)]
pub struct Settlement {
    generation: u64,
    term: SearchTerm,
    outcome: Result<Arc<Word>, DictionaryError>,
}

impl Settlement {
    pub fn term(&self) -> &SearchTerm {
        &self.term
    }
}

struct InFlight {
    generation: u64,
    term: SearchTerm,
    token: CancellationToken,
}

/// Two-slot results state: the request status plus the last settled display.
#[derive(Debug, Clone, PartialEq)]
struct ResultsState {
    status: FetchStatus,
    shown: Shown,
}

impl Default for ResultsState {
    fn default() -> Self {
        Self {
            status: FetchStatus::Idle,
            shown: Shown::Nothing,
        }
    }
}

pub struct LookupPipeline<S> {
    source: Arc<S>,
    root: CancellationToken,
    generation: u64,
    current: Option<InFlight>,
    state: ResultsState,
    settled_tx: mpsc::UnboundedSender<Settlement>,
}

impl<S: LookupSource> LookupPipeline<S> {
    pub fn new(source: S) -> (Self, mpsc::UnboundedReceiver<Settlement>) {
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        let pipeline = Self {
            source: Arc::new(source),
            root: CancellationToken::new(),
            generation: 0,
            current: None,
            state: ResultsState::default(),
            settled_tx,
        };
        (pipeline, settled_rx)
    }

    pub fn status(&self) -> &FetchStatus {
        &self.state.status
    }

    pub fn shown(&self) -> &Shown {
        &self.state.shown
    }

    pub fn in_flight(&self) -> Option<&SearchTerm> {
        self.current.as_ref().map(|current| &current.term)
    }

    /// Reacts to a change of the shared search term. `None` does nothing.
    pub fn on_term(&mut self, term: Option<SearchTerm>) {
        let Some(term) = term else {
            return;
        };
        self.supersede();

        self.generation += 1;
        let generation = self.generation;
        let token = self.root.child_token();
        self.current = Some(InFlight {
            generation,
            term: term.clone(),
            token: token.clone(),
        });
        self.state.status = FetchStatus::Pending;
        tracing::info!(term = %term, generation, "looking up");

        let request = self.source.lookup(term.as_str());
        let settled_tx = self.settled_tx.clone();
        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => return,
                outcome = request => outcome,
            };
            if token.is_cancelled() {
                return;
            }
            let settlement = Settlement {
                generation,
                term,
                outcome: outcome.map(Arc::new),
            };
            // The receiver is gone only when the app is shutting down.
            let _ = settled_tx.send(settlement);
        });
    }

    /// Applies a settlement if it belongs to the live request.
    /// Returns whether the state changed.
    pub fn on_settled(&mut self, settlement: Settlement) -> bool {
        let is_current = self.current.as_ref().is_some_and(|current| {
            current.generation == settlement.generation && !current.token.is_cancelled()
        });
        if !is_current {
            tracing::debug!(
                term = %settlement.term,
                generation = settlement.generation,
                "discarding superseded lookup"
            );
            return false;
        }
        self.current = None;

        match settlement.outcome {
            Ok(word) => {
                tracing::info!(term = %settlement.term, word = %word.word, "lookup succeeded");
                self.state.status = FetchStatus::Success(Arc::clone(&word));
                self.state.shown = Shown::Entry(word);
            }
            Err(error) => {
                tracing::warn!(term = %settlement.term, %error, "lookup failed");
                self.state.status = FetchStatus::Failed;
                self.state.shown = Shown::Failed;
            }
        }
        true
    }

    fn supersede(&mut self) {
        if let Some(previous) = self.current.take() {
            tracing::debug!(
                term = %previous.term,
                generation = previous.generation,
                "cancelling superseded lookup"
            );
            previous.token.cancel();
        }
    }
}

impl<S> Drop for LookupPipeline<S> {
    fn drop(&mut self) {
        self.root.cancel();
    }
}
