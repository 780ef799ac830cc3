pub mod claude;
pub mod llm;
pub mod types;

pub use types::{AccumulatedResult, MessageChunk, Reply};
