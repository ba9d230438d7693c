//! Typed access to tool call arguments.

use crate::error::AlfredError;

/// Wrapper around tool call arguments providing typed extraction.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    /// Wrap raw arguments. A JSON-encoded string is decoded first; an
    /// undecodable string is kept as-is so validation can report it.
    pub fn new(value: serde_json::Value) -> Self {
        let value = match value {
            serde_json::Value::String(raw) => {
                serde_json::from_str(&raw).unwrap_or(serde_json::Value::String(raw))
            }
            other => other,
        };
        Self { value }
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str, AlfredError> {
        self.value
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| AlfredError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    /// Get a numeric argument. Integers are widened.
    pub fn get_f64(&self, key: &str) -> Result<f64, AlfredError> {
        self.value
            .get(key)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| AlfredError::InvalidArgument(format!("Missing number argument: {key}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_str_and_missing() {
        let args = ToolArguments::new(json!({"image_path": "uploads/a.png"}));
        assert_eq!(args.get_str("image_path").unwrap(), "uploads/a.png");
        let err = args.get_str("query").unwrap_err();
        assert!(err.to_string().contains("Missing string argument: query"));
    }

    #[test]
    fn get_f64_widens_integers() {
        let args = ToolArguments::new(json!({"a": 7, "b": 2.5}));
        assert_eq!(args.get_f64("a").unwrap(), 7.0);
        assert_eq!(args.get_f64("b").unwrap(), 2.5);
        assert!(args.get_f64("c").is_err());
    }

    #[test]
    fn json_string_arguments_are_decoded() {
        let args = ToolArguments::new(json!(r#"{"a": 1, "b": 2}"#));
        assert_eq!(args.get_f64("b").unwrap(), 2.0);
    }

    #[test]
    fn undecodable_string_is_kept() {
        let args = ToolArguments::new(json!("{oops"));
        assert_eq!(args.raw(), &json!("{oops"));
    }
}
