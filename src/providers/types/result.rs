use serde::Serialize;

/// Running and final output of a response: the reasoning trace and the answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccumulatedResult {
    pub thinking: String,
    pub response: String,
    /// Whether the reasoning channel has been announced
    pub thinking_started: bool,
    /// Whether the answer channel has been announced
    pub response_started: bool,
}

impl AccumulatedResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_reply(self, include_thinking: bool) -> Reply {
        if include_thinking {
            Reply::WithThinking {
                thinking: self.thinking,
                response: self.response,
            }
        } else {
            Reply::Text(self.response)
        }
    }
}

/// What the caller gets back: the answer alone, or the answer with its reasoning trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Text(String),
    WithThinking { thinking: String, response: String },
}

impl Reply {
    pub fn response(&self) -> &str {
        match self {
            Self::Text(response) | Self::WithThinking { response, .. } => response,
        }
    }

    pub fn thinking(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::WithThinking { thinking, .. } => Some(thinking),
        }
    }
}
