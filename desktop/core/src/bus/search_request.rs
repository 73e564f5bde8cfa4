use serde::{Deserialize, Serialize};

/// Search modes whose results are rendered as an assistant answer.
const ASSISTANT_MODES: &[&str] = &["assistant", "ask"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presentation {
    #[default]
    Standard,
    Assistant,
}

impl Presentation {
    pub fn for_mode(mode: &str) -> Self {
        if ASSISTANT_MODES
            .iter()
            .any(|m| m.eq_ignore_ascii_case(mode.trim()))
        {
            Self::Assistant
        } else {
            Self::Standard
        }
    }
}

/// A query handed from the overlay to the main window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub mode: String,
    #[serde(default)]
    pub presentation: Presentation,
}

impl SearchRequest {
    /// Presentation is derived from the mode.
    pub fn new(query: impl Into<String>, mode: impl Into<String>) -> Self {
        let mode = mode.into();
        Self {
            query: query.into(),
            presentation: Presentation::for_mode(&mode),
            mode,
        }
    }

    pub fn with_presentation(mut self, presentation: Presentation) -> Self {
        self.presentation = presentation;
        self
    }
}
