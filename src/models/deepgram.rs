use serde::{Deserialize, Serialize};

/// Root response from the Deepgram pre-recorded `listen` API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramResponse {
    pub results: DeepgramResults,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramResults {
    pub channels: Vec<DeepgramChannel>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramChannel {
    pub alternatives: Vec<DeepgramAlternative>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramAlternative {
    #[serde(default)]
    pub words: Vec<DeepgramWord>,
    #[serde(default)]
    pub transcript: Option<String>,
}

/// A single recognized word
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramWord {
    pub word: String,
    /// Start timestamp in seconds
    pub start: f64,
    /// End timestamp in seconds
    pub end: f64,
    pub confidence: f64,
    /// Only present when diarization was requested
    #[serde(default)]
    pub speaker: Option<u32>,
    #[serde(default)]
    pub punctuated_word: Option<String>,
}

impl DeepgramResponse {
    /// Extract all words from the first channel's first alternative
    pub fn words(&self) -> &[DeepgramWord] {
        self.first_alternative()
            .map(|a| a.words.as_slice())
            .unwrap_or(&[])
    }

    /// Plain transcript text
    ///
    /// Prefers the service's own formatted transcript and falls back to
    /// joining (punctuated) words.
    pub fn transcript(&self) -> String {
        if let Some(text) = self
            .first_alternative()
            .and_then(|a| a.transcript.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            return text.to_string();
        }

        self.words()
            .iter()
            .map(|w| w.punctuated_word.as_deref().unwrap_or(&w.word))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn first_alternative(&self) -> Option<&DeepgramAlternative> {
        self.results
            .channels
            .first()
            .and_then(|c| c.alternatives.first())
    }
}
