pub mod cli;
pub mod core;
pub mod eventsource;
pub mod providers;

pub use crate::core::{Config, LLMError};
pub use providers::claude::{
    ClaudeClient, Prompt, RequestBuilder, RequestParams, StreamDecoder,
};
pub use providers::llm::LLMClient;
pub use providers::{AccumulatedResult, MessageChunk, Reply};
