//! Model definitions.

pub mod capabilities;
pub mod openai;

pub use capabilities::ModelCapabilities;
pub use openai::OpenAiModel;
