use serde::Deserialize;

/// One entry of the dictionary API response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub word: String,
    #[serde(default)]
    pub phonetic: Option<String>,
    #[serde(default)]
    pub phonetics: Vec<Phonetic>,
    #[serde(default)]
    pub origin: Option<String>,
    pub meanings: Vec<WordMeaning>,
    #[serde(default)]
    pub source_urls: Vec<String>,
}

impl Word {
    /// Audio of the first phonetics entry, the one the results panel binds to.
    pub fn pronunciation_audio(&self) -> Option<&str> {
        self.phonetics.first().and_then(Phonetic::audio_url)
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source_urls.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Phonetic {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub audio: Option<String>,
}

impl Phonetic {
    /// The API sends `""` for entries without a recording.
    pub fn audio_url(&self) -> Option<&str> {
        self.audio.as_deref().filter(|audio| !audio.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordMeaning {
    pub part_of_speech: String,
    pub definitions: Vec<WordDefinition>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WordDefinition {
    pub definition: String,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
}
