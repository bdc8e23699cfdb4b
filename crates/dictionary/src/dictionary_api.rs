use reqwest::StatusCode;
use serde::Deserialize;

use crate::{DictionaryError, NotFoundError, Word};

pub const DICTIONARY_API_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";

const NOT_FOUND_MESSAGE: &str = "No definitions found for the requested word.";

/// Body the API sends along with a 404.
#[derive(Debug, Deserialize)]
struct NotFoundBody {
    message: Option<String>,
}

pub(crate) fn entry_url(base_url: &str, word: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(word)
    )
}

pub(crate) async fn get_definition(
    client: &reqwest::Client,
    base_url: &str,
    word: &str,
) -> Result<Word, DictionaryError> {
    let url = entry_url(base_url, word);
    tracing::debug!(%url, "requesting definition");
    let res: reqwest::Response = client
        .get(&url)
        .send()
        .await
        .map_err(DictionaryError::Fetch)?;

    let status = res.status();
    if status == StatusCode::NOT_FOUND {
        let message = res
            .json::<NotFoundBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| NOT_FOUND_MESSAGE.to_owned());
        return Err(DictionaryError::NotFound(NotFoundError::new(message)));
    }
    if !status.is_success() {
        return Err(DictionaryError::Status(status));
    }

    let entries = res
        .json::<Vec<Word>>()
        .await
        .map_err(DictionaryError::Deserialize)?;
    tracing::debug!(word, entries = entries.len(), "definition received");
    entries.into_iter().next().ok_or(DictionaryError::Empty)
}
