use super::AccumulatedResult;

/// An incremental update surfaced while a response streams in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageChunk {
    /// The first reasoning fragment is about to follow
    ThinkingStart,
    /// A fragment of the reasoning trace
    Thinking(String),
    /// The answer begins after a reasoning trace
    TextStart,
    /// A fragment of the final answer
    Text(String),
    /// Stream end marker carrying everything accumulated
    End(AccumulatedResult),
}
