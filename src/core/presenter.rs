use std::io::Write;

use colored::Colorize;
use futures::StreamExt;
use log::debug;

use crate::core::LLMError;
use crate::providers::llm::BoxStream;
use crate::providers::{AccumulatedResult, MessageChunk};

const THINKING_HEADER: &str = "Thinking...";
const RESPONSE_HEADER: &str = "Response:";

/// Writes streamed chunks to a terminal as they arrive.
///
/// The reasoning trace is only shown when `show_thinking` is set; the answer
/// is always written.
pub struct Presenter<W: Write> {
    writer: W,
    show_thinking: bool,
}

impl<W: Write> Presenter<W> {
    pub const fn new(writer: W, show_thinking: bool) -> Self {
        Self {
            writer,
            show_thinking,
        }
    }

    pub fn write_chunk(&mut self, chunk: &MessageChunk) -> Result<(), LLMError> {
        match chunk {
            MessageChunk::ThinkingStart if self.show_thinking => {
                writeln!(self.writer, "{}", THINKING_HEADER.italic().dimmed())?;
            }
            MessageChunk::Thinking(text) if self.show_thinking => {
                write!(self.writer, "{}", text.as_str().dimmed())?;
            }
            MessageChunk::TextStart if self.show_thinking => {
                write!(self.writer, "\n\n{}\n", RESPONSE_HEADER.bold().green())?;
            }
            MessageChunk::Text(text) => write!(self.writer, "{text}")?,
            _ => return Ok(()),
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Writes a complete result the way the streamed chunks would have been written.
    pub fn write_result(&mut self, result: &AccumulatedResult) -> Result<(), LLMError> {
        if result.thinking_started {
            self.write_chunk(&MessageChunk::ThinkingStart)?;
            self.write_chunk(&MessageChunk::Thinking(result.thinking.clone()))?;
            self.write_chunk(&MessageChunk::TextStart)?;
        }
        self.write_chunk(&MessageChunk::Text(result.response.clone()))
    }

    /// Drains the stream, writing every chunk, and returns the final result.
    pub async fn render_stream(&mut self, mut stream: BoxStream) -> Result<AccumulatedResult, LLMError> {
        while let Some(chunk) = stream.next().await {
            match chunk? {
                MessageChunk::End(result) => {
                    debug!(
                        "[Presenter] stream finished: {} thinking bytes, {} response bytes",
                        result.thinking.len(),
                        result.response.len()
                    );
                    return Ok(result);
                }
                chunk => self.write_chunk(&chunk)?,
            }
        }
        Err(LLMError::StreamError(
            "stream closed before the response was complete".to_string(),
        ))
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
