use crate::core::LLMError;
use crate::providers::claude::BuiltRequest;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use super::{AccumulatedResult, MessageChunk};

pub type BoxStream = Pin<Box<dyn Stream<Item = Result<MessageChunk, LLMError>> + Send + 'static>>;

#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Send the request and wait for the complete response
    async fn query(&self, request: &BuiltRequest) -> Result<AccumulatedResult, LLMError>;

    /// Send the request and receive the response as it is generated.
    ///
    /// The stream always finishes with [`MessageChunk::End`] unless the transport fails.
    async fn query_streaming(&self, request: &BuiltRequest) -> Result<BoxStream, LLMError>;
}
