//! The declarative `ProviderSpec` and its nested types.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Provider-wide identity and transport defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub name: String,
    pub base_url: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
}

/// How the transport collaborator should authenticate (consumed, not
/// performed, by the engine — see spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub header: String,
    /// A template such as `"Bearer ${ANTHROPIC_API_KEY}"`; environment
    /// substitution is the transport collaborator's job.
    pub value_template: String,
}

/// One HTTP(S) endpoint a model is reachable at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub method: String,
    pub path: String,
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}

/// Sync and streaming endpoints for one model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    pub chat_completion: EndpointConfig,
    pub streaming_chat_completion: EndpointConfig,
}

/// Which uniform input shapes a model accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputModes {
    pub messages: bool,
    pub single_text: bool,
    pub images: bool,
}

/// Tool-calling support.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolingConfig {
    pub tools_supported: bool,
    pub parallel_tool_calls_default: bool,
    pub can_disable_parallel_tool_calls: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_switch: Option<Value>,
}

/// Native JSON-output support.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutputConfig {
    pub native_param: bool,
    pub strategy: String,
}

/// A single uniform-field parameter schema entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterSchema {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
}

/// Capability-adjacent flags gating [`crate::types::prompt::AdvancedParams`]
/// translation. Declared adjacent to `parameters` on a `ModelSpec` (spec
/// §4.5); grouped into their own struct here for clarity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub thinking_mode: bool,
    #[serde(default)]
    pub adaptive_reasoning: bool,
    #[serde(default)]
    pub deterministic_sampling: bool,
    #[serde(default)]
    pub advanced_coding: bool,
    #[serde(default)]
    pub balanced_performance: bool,
    #[serde(default)]
    pub agentic_tasks: bool,
}

/// Where a system message is encoded in the provider request (spec §4.3,
/// §9 Open Question (b): `message_role` and `first_message` are aliases).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemPromptLocation {
    First,
    FirstMessage,
    MessageRole,
    SeparateField,
}

impl SystemPromptLocation {
    /// Whether the system message is simply left as-is with its role.
    pub fn keeps_system_role(self) -> bool {
        matches!(
            self,
            SystemPromptLocation::MessageRole | SystemPromptLocation::FirstMessage
        )
    }
}

/// Size ceilings enforced by the constraint engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintLimits {
    pub max_tool_schema_bytes: usize,
    pub max_system_prompt_bytes: usize,
}

/// Model-level constraints (spec §4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constraints {
    pub system_prompt_location: SystemPromptLocation,
    #[serde(default)]
    pub forbid_unknown_top_level_fields: bool,
    #[serde(default)]
    pub mutually_exclusive: Vec<Vec<String>>,
    #[serde(default)]
    pub resolution_preferences: Vec<String>,
    pub limits: ConstraintLimits,
    /// Destination path the separated system prompt is written to when
    /// `system_prompt_location = separate_field`. Not in spec.md's literal
    /// field list; resolved here because `separate_field` needs somewhere
    /// concrete to write to (see DESIGN.md Open Question 2).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separate_system_field_path: Option<String>,
}

/// Source-path → destination-path projection table, plus literal flag
/// insertions. A `BTreeMap` (not `HashMap`) so iteration is
/// lexicographic-by-source-path for free, satisfying the mapper's
/// determinism contract (spec §4.4).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mappings {
    #[serde(default)]
    pub paths: BTreeMap<String, String>,
    #[serde(default)]
    pub flags: BTreeMap<String, Value>,
}

/// Sync-response projection rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncNormalization {
    pub content_path: String,
    pub finish_reason_path: String,
    #[serde(default)]
    pub finish_reason_map: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_name_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_args_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id_path: Option<String>,
}

/// One stream-event routing rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRoute {
    pub when: String,
    pub emit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args_path: Option<String>,
}

/// Dispatch table deciding which [`EventRoute`] handles a given stream
/// event payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSelector {
    pub type_path: String,
    #[serde(default)]
    pub routes: Vec<EventRoute>,
}

/// Streaming-response projection rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamNormalization {
    pub protocol: String,
    pub event_selector: EventSelector,
}

/// Both response-projection rule sets for one model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseNormalization {
    pub sync: SyncNormalization,
    pub stream: StreamNormalization,
}

/// One model offered by a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    pub id: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub family: String,
    pub endpoints: Endpoints,
    pub input_modes: InputModes,
    pub tooling: ToolingConfig,
    pub json_output: JsonOutputConfig,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterSchema>,
    #[serde(default)]
    pub capabilities: Capabilities,
    pub constraints: Constraints,
    pub mappings: Mappings,
    pub response_normalization: ResponseNormalization,
}

impl ModelSpec {
    /// Whether `candidate` matches this model's `id` or any `aliases` entry.
    pub fn matches(&self, candidate: &str) -> bool {
        self.id == candidate || self.aliases.iter().any(|alias| alias == candidate)
    }
}

/// A declarative description of one provider and its models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSpec {
    pub spec_version: String,
    pub provider: ProviderInfo,
    pub models: Vec<ModelSpec>,
}

impl ProviderSpec {
    /// Resolve `model_id` against each model's `id` then `aliases`, in
    /// declaration order; first match wins (DESIGN.md Open Question 4).
    pub fn resolve_model(&self, model_id: &str) -> Option<&ModelSpec> {
        self.models.iter().find(|model| model.id == model_id).or_else(|| {
            self.models
                .iter()
                .find(|model| model.aliases.iter().any(|alias| alias == model_id))
        })
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
