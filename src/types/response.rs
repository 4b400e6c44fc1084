//! Uniform response shapes produced after request execution.

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::lossiness::LossinessReport;
use crate::types::prompt::StrictMode;

/// Why generation stopped, projected onto a uniform set of reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCall,
    EndConversation,
    Other,
}

/// One tool invocation extracted from a provider response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub arguments: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// A provider response (or fully-assembled stream) projected onto the
/// uniform shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniformResponse {
    pub model: String,
    pub content: String,
    pub finish_reason: FinishReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(default)]
    pub raw_metadata: Map<String, Value>,
}

/// One normalized streaming event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UniformStreamEvent {
    TextDelta { text: String },
    ToolCallDelta { name: Option<String>, arguments: Option<Value> },
    Finish,
}

/// The result of validating an arbitrary JSON value against the `PromptSpec`
/// or `ProviderSpec` schema. Never itself an error — every violation found
/// is listed in `errors`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn invalid(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Bookkeeping about how a `TranslationResult` was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationMetadata {
    pub provider: String,
    pub model: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    pub strict_mode: StrictMode,
}

/// The output of one `translate()` call: the provider-ready request, a full
/// accounting of what was lossy about producing it, and metadata about the
/// call itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResult {
    pub provider_request_json: Value,
    pub lossiness: LossinessReport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TranslationMetadata>,
}

impl TranslationResult {
    pub fn has_lossiness(&self) -> bool {
        self.lossiness.has_lossiness()
    }
}
