pub mod request;
pub mod response;
pub mod stream;

pub use request::{CompletionRequest, Message, MessagesRequest, RequestBody, Role, Thinking};
pub use response::{CompletionResponse, ContentBlock, MessageResponse};
pub use stream::{ContentBlockDelta, DeltaEvent, CONTENT_BLOCK_DELTA};
