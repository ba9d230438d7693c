//! Model capabilities descriptor.

use serde::{Deserialize, Serialize};

/// What a model accepts, checked when a provider is built for a role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelCapabilities {
    pub supports_vision: bool,
    pub supports_tools: bool,
}
