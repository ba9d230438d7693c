//! Text extraction from images through the vision model.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use tracing::{debug, error, info, Instrument};

use super::arguments::ToolArguments;
use super::tool::{Tool, ToolExecutionContext};
use super::types::AgentToolParameters;
use crate::error::AlfredError;
use crate::provider::{ModelProvider, ProviderRequest};
use crate::types::{GenerationSettings, ModelMessage};

pub const EXTRACT_TEXT: &str = "extract_text";

const INSTRUCTION: &str =
    "Extract all the text from this image. Return only the extracted text, no explanations";

/// Guess an image MIME type from the file extension.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" | "jpe" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        _ => return None,
    };
    Some(mime)
}

/// Transcribe the text in the image at `path`. Failures come back as text.
pub async fn extract_text(provider: &dyn ModelProvider, path: &Path) -> String {
    info!(path = %path.display(), "extract_text");
    if !path.exists() {
        error!(path = %path.display(), "Image file not found");
        return "Error: Image file not found".to_string();
    }
    let Some(mime) = mime_for_path(path) else {
        error!(path = %path.display(), "Unsupported image format");
        return "Error: Invalid or unsupported image format".to_string();
    };

    match transcribe(provider, path, mime).await {
        Ok(text) => {
            debug!(chars = text.len(), "extracted text");
            text
        }
        Err(e) => {
            error!(error = %e, "text extraction failed");
            format!("Error extracting text: {e}")
        }
    }
}

async fn transcribe(
    provider: &dyn ModelProvider,
    path: &Path,
    mime: &str,
) -> Result<String, AlfredError> {
    let bytes = tokio::fs::read(path).await?;
    let data = base64::engine::general_purpose::STANDARD.encode(bytes);
    let request = ProviderRequest {
        messages: vec![ModelMessage::user_with_image(INSTRUCTION, data, mime)],
        settings: GenerationSettings::default(),
        tools: None,
    };
    let response = provider.generate_text(&request).await?;
    Ok(response.text.trim().to_string())
}

/// The `extract_text(image_path)` tool, bound to a vision-capable provider.
pub struct ExtractTextTool {
    provider: Arc<dyn ModelProvider>,
    parameters: AgentToolParameters,
}

impl ExtractTextTool {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            provider,
            parameters: AgentToolParameters::object()
                .string("image_path", "Path to the image file", true)
                .build(),
        }
    }
}

impl std::fmt::Debug for ExtractTextTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractTextTool")
            .field("model", &self.provider.model_id())
            .finish()
    }
}

#[async_trait]
impl Tool for ExtractTextTool {
    fn name(&self) -> &str {
        EXTRACT_TEXT
    }

    fn description(&self) -> &str {
        "Extract text from an image using the vision model"
    }

    fn parameters(&self) -> &AgentToolParameters {
        &self.parameters
    }

    async fn execute(
        &self,
        args: &ToolArguments,
        ctx: &ToolExecutionContext,
    ) -> Result<String, AlfredError> {
        let path = args.get_str("image_path")?;
        Ok(extract_text(self.provider.as_ref(), Path::new(path))
            .instrument(ctx.span(EXTRACT_TEXT))
            .await)
    }
}
