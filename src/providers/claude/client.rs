use crate::core::LLMError;
use crate::providers::llm::{BoxStream, LLMClient};
use crate::providers::{AccumulatedResult, MessageChunk};
use async_stream::try_stream;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use log::debug;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Client,
};
use std::fmt::Display;

use super::builder::{BuiltRequest, ProtocolMode};
use super::decoder::StreamDecoder;
use super::types::{CompletionResponse, MessageResponse};

const API_VERSION: &str = "2023-06-01";
pub const API_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Client for interacting with the Claude API
pub struct ClaudeClient {
    api_key: String,
    client: Client,
    base_url: String,
}

impl ClaudeClient {
    /// Create a new Claude client with the given API key
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, API_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, mode: ProtocolMode) -> String {
        format!("{}/{}", self.base_url, mode.endpoint())
    }

    /// Build headers for API requests
    fn build_headers(&self, stream: bool) -> Result<HeaderMap, LLMError> {
        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&self.api_key)
            .map_err(|e| LLMError::ConfigError(format!("API key is not a valid header: {e}")))?;
        headers.insert("x-api-key", api_key);
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if stream {
            headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));
        }
        Ok(headers)
    }

    /// Sends the request and fails on any non-success status, before a single body byte is read.
    async fn send(&self, request: &BuiltRequest) -> Result<reqwest::Response, LLMError> {
        let headers = self.build_headers(request.is_streaming())?;
        let url = self.endpoint(request.mode);
        debug!("[ClaudeClient] POST {url} (stream: {})", request.is_streaming());

        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(&request.body)
            .send()
            .await
            .map_err(LLMError::Network)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(LLMError::from_status(status, error_text))
    }
}

/// Turns a raw byte stream into decoded chunks, closing with [`MessageChunk::End`].
///
/// A transport error ends the stream with [`LLMError::StreamError`].
pub fn decode_stream<S, B, E>(bytes: S) -> BoxStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    Box::pin(try_stream! {
        let mut bytes = Box::pin(bytes);
        let mut decoder = StreamDecoder::new();

        while let Some(chunk) = bytes.next().await {
            let chunk = chunk.map_err(|e| LLMError::StreamError(e.to_string()))?;
            for update in decoder.feed(chunk.as_ref()) {
                yield update;
            }
        }

        for update in decoder.flush() {
            yield update;
        }
        yield MessageChunk::End(decoder.finalize());
    })
}

#[async_trait]
impl LLMClient for ClaudeClient {
    async fn query(&self, request: &BuiltRequest) -> Result<AccumulatedResult, LLMError> {
        let response = self.send(request).await?;
        let result = match request.mode {
            ProtocolMode::Messages => response.json::<MessageResponse>().await.map(|body| {
                debug!("[ClaudeClient] message finished, stop_reason: {:?}", body.stop_reason);
                AccumulatedResult::from(body)
            }),
            ProtocolMode::Legacy => response.json::<CompletionResponse>().await.map(|body| {
                debug!("[ClaudeClient] completion finished, stop_reason: {:?}", body.stop_reason);
                AccumulatedResult::from(body)
            }),
        };
        result.map_err(|e| LLMError::ResponseFormat(format!("Failed to parse Claude response: {e}")))
    }

    async fn query_streaming(&self, request: &BuiltRequest) -> Result<BoxStream, LLMError> {
        if !request.is_streaming() {
            // The legacy shape cannot stream; serve it whole as a single update
            let result = self.query(request).await?;
            let chunks = vec![
                Ok(MessageChunk::Text(result.response.clone())),
                Ok(MessageChunk::End(result)),
            ];
            return Ok(futures::stream::iter(chunks).boxed());
        }

        let response = self.send(request).await?;
        Ok(decode_stream(response.bytes_stream()))
    }
}
