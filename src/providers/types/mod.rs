pub mod message_chunk;
pub mod result;

pub use message_chunk::MessageChunk;
pub use result::{AccumulatedResult, Reply};
