mod config;
pub mod error;
pub mod presenter;

pub use config::Config;
pub use error::LLMError;
pub use presenter::Presenter;
