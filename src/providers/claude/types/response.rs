use serde::Deserialize;

use crate::providers::AccumulatedResult;

/// Complete body returned by the Messages endpoint when not streaming.
#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    Thinking { thinking: String },
    #[serde(other)]
    Other,
}

/// Complete body returned by the legacy Text Completions endpoint.
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub completion: String,
    pub stop_reason: Option<String>,
}

impl From<MessageResponse> for AccumulatedResult {
    fn from(response: MessageResponse) -> Self {
        response
            .content
            .into_iter()
            .fold(Self::new(), |mut acc, block| {
                match block {
                    ContentBlock::Thinking { thinking } => {
                        acc.thinking_started = true;
                        acc.thinking.push_str(&thinking);
                    }
                    ContentBlock::Text { text } => {
                        acc.response_started = true;
                        acc.response.push_str(&text);
                    }
                    ContentBlock::Other => {}
                }
                acc
            })
    }
}

impl From<CompletionResponse> for AccumulatedResult {
    fn from(response: CompletionResponse) -> Self {
        Self {
            response_started: true,
            response: response.completion,
            ..Self::new()
        }
    }
}
