use dictionary_api::get_definition;

mod dictionary;
mod dictionary_api;

pub use dictionary::{Phonetic, Word, WordDefinition, WordMeaning};
pub use dictionary_api::DICTIONARY_API_URL;

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("request failed: {0}")]
    Fetch(#[source] reqwest::Error),
    #[error("dictionary api answered with status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed dictionary response: {0}")]
    Deserialize(#[source] reqwest::Error),
    #[error("dictionary response contained no entries")]
    Empty,
    #[error(transparent)]
    NotFound(NotFoundError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct NotFoundError {
    message: String,
}

impl NotFoundError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone)]
pub struct Dictionary {
    client: reqwest::Client,
    base_url: String,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new(), DICTIONARY_API_URL)
    }

    /// Uses a preconfigured client (timeouts, user agent) against `base_url`,
    /// which must point at the `entries/<lang>` collection.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub async fn get_definition(&self, word: &str) -> Result<Word, DictionaryError> {
        get_definition(&self.client, &self.base_url, word).await
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}
