pub mod builder;
pub mod client;
pub mod decoder;
pub mod types;

pub use builder::{BuiltRequest, Prompt, ProtocolMode, RequestBuilder, RequestParams, ThinkingConfig};
pub use client::{decode_stream, ClaudeClient};
pub use decoder::StreamDecoder;
