//! Per-call generation settings.

use bon::Builder;
use serde::{Deserialize, Serialize};

/// Settings controlling a single model call.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default, PartialEq)]
pub struct GenerationSettings {
    /// Whether the model may request several tool calls in one turn.
    /// Only sent when tools are attached to the request.
    pub parallel_tool_calls: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_leaves_unset_flags_empty() {
        let settings = GenerationSettings::builder().parallel_tool_calls(false).build();
        assert_eq!(settings.parallel_tool_calls, Some(false));
        assert_eq!(GenerationSettings::builder().build(), GenerationSettings::default());
    }
}
