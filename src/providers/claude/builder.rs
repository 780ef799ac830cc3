use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;

use super::types::{CompletionRequest, Message, MessagesRequest, RequestBody};
use crate::core::{Config, LLMError};

const HUMAN_PROMPT: &str = "\n\nHuman:";
const AI_PROMPT: &str = "\n\nAssistant:";

/// Sampling defaults for the legacy shape, which always carries every field
const LEGACY_TEMPERATURE: f32 = 1.0;
const LEGACY_TOP_K: i32 = -1;
const LEGACY_TOP_P: f32 = -1.0;

static LEGACY_MODEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^claude-(instant|1|2)(\b|[.-])").expect("valid regex"));

/// Which request/response protocol a model speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolMode {
    /// Single `prompt` string against `/complete`
    Legacy,
    /// Role-tagged `messages` against `/messages`
    Messages,
}

impl ProtocolMode {
    pub fn for_model(model: &str) -> Self {
        if LEGACY_MODEL.is_match(model) {
            Self::Legacy
        } else {
            Self::Messages
        }
    }

    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Legacy => "complete",
            Self::Messages => "messages",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Text(String),
    Messages(Vec<Message>),
}

impl From<&str> for Prompt {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<Message>> for Prompt {
    fn from(messages: Vec<Message>) -> Self {
        Self::Messages(messages)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThinkingConfig {
    pub budget_tokens: u32,
}

/// Caller-supplied knobs for a single request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParams {
    pub model: String,
    pub prompt: Prompt,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    pub top_k: Option<i32>,
    pub top_p: Option<f32>,
    pub stop_sequences: Option<Vec<String>>,
    pub system: Option<String>,
    pub thinking: Option<ThinkingConfig>,
    pub stream: bool,
}

impl RequestParams {
    pub fn new(model: impl Into<String>, prompt: impl Into<Prompt>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            max_tokens,
            temperature: None,
            top_k: None,
            top_p: None,
            stop_sequences: None,
            system: None,
            thinking: None,
            stream: false,
        }
    }

    /// Seeds every knob from the config; the prompt is the only thing left to the caller.
    pub fn from_config(config: &Config, prompt: impl Into<Prompt>) -> Self {
        Self {
            temperature: config.temperature,
            top_k: config.top_k,
            top_p: config.top_p,
            stop_sequences: config.stop_sequences.clone(),
            system: config.system_prompt.clone(),
            thinking: config
                .thinking_budget
                .map(|budget_tokens| ThinkingConfig { budget_tokens }),
            stream: config.stream,
            ..Self::new(config.model.clone(), prompt, config.max_tokens)
        }
    }

    pub const fn with_thinking(mut self, budget_tokens: u32) -> Self {
        self.thinking = Some(ThinkingConfig { budget_tokens });
        self
    }

    pub const fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }
}

/// A validated request ready for the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltRequest {
    pub mode: ProtocolMode,
    pub body: RequestBody,
    /// Adjustments made to the caller's parameters, worth telling them about
    pub notices: Vec<String>,
}

impl BuiltRequest {
    pub fn is_streaming(&self) -> bool {
        self.body.is_streaming()
    }
}

/// Turns [`RequestParams`] into a typed body for the protocol the model speaks.
pub struct RequestBuilder;

impl RequestBuilder {
    pub fn build(params: RequestParams) -> Result<BuiltRequest, LLMError> {
        let mode = ProtocolMode::for_model(&params.model);
        debug!("[RequestBuilder] model: {}, mode: {mode:?}", params.model);
        match mode {
            ProtocolMode::Legacy => Self::build_completion(params),
            ProtocolMode::Messages => Self::build_messages(params),
        }
    }

    fn build_completion(params: RequestParams) -> Result<BuiltRequest, LLMError> {
        let Prompt::Text(prompt) = params.prompt else {
            return Err(LLMError::ConfigError(format!(
                "Model {} expects a single text prompt, not a list of messages",
                params.model
            )));
        };

        let mut notices = Vec::new();
        if params.thinking.is_some() {
            let notice = format!("Reasoning mode is not supported by {}; ignoring it", params.model);
            warn!("{notice}");
            notices.push(notice);
        }

        let body = CompletionRequest {
            prompt: Self::legacy_prompt(&prompt, params.system.as_deref()),
            model: params.model,
            max_tokens_to_sample: params.max_tokens,
            stop_sequences: params
                .stop_sequences
                .unwrap_or_else(|| vec![HUMAN_PROMPT.to_string()]),
            temperature: params.temperature.unwrap_or(LEGACY_TEMPERATURE),
            top_k: params.top_k.unwrap_or(LEGACY_TOP_K),
            top_p: params.top_p.unwrap_or(LEGACY_TOP_P),
        };

        Ok(BuiltRequest {
            mode: ProtocolMode::Legacy,
            body: RequestBody::Completion(body),
            notices,
        })
    }

    fn build_messages(params: RequestParams) -> Result<BuiltRequest, LLMError> {
        let Prompt::Messages(messages) = params.prompt else {
            return Err(LLMError::ConfigError(format!(
                "Model {} expects a list of role-tagged messages as prompt",
                params.model
            )));
        };
        if messages.is_empty() {
            return Err(LLMError::ConfigError(
                "Prompt must contain at least one message".to_string(),
            ));
        }

        let mut notices = Vec::new();
        let mut request = MessagesRequest::new(params.model, params.max_tokens, messages);

        request = match params.thinking {
            Some(ThinkingConfig { budget_tokens }) => {
                let required = budget_tokens.saturating_mul(2);
                if request.max_tokens < required {
                    let notice = format!(
                        "max_tokens ({}) must exceed the thinking budget ({budget_tokens}) by at least the budget; raising it to {required}",
                        request.max_tokens
                    );
                    warn!("{notice}");
                    notices.push(notice);
                    request.max_tokens = required;
                }
                // Reasoning mode only accepts the default sampling settings
                request
                    .with_temperature(Some(1.0))
                    .with_sampling(None, None)
                    .with_thinking(budget_tokens)
            }
            None => request
                .with_temperature(params.temperature)
                .with_sampling(params.top_k, params.top_p),
        };

        if let Some(system) = params.system {
            request = request.with_system(system);
        }
        if let Some(stop_sequences) = params.stop_sequences {
            request = request.with_stop_sequences(stop_sequences);
        }
        if params.stream {
            request = request.with_stream(true);
        }

        Ok(BuiltRequest {
            mode: ProtocolMode::Messages,
            body: RequestBody::Messages(request),
            notices,
        })
    }

    fn legacy_prompt(prompt: &str, system: Option<&str>) -> String {
        let turn = if prompt.starts_with(HUMAN_PROMPT) {
            prompt.to_string()
        } else {
            format!("{HUMAN_PROMPT} {prompt}{AI_PROMPT}")
        };
        match system {
            Some(system) => format!("{system}{turn}"),
            None => turn,
        }
    }
}
