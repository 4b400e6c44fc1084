//! The data model: [`prompt`]'s provider-agnostic `PromptSpec`,
//! [`provider`]'s declarative `ProviderSpec`, and [`response`]'s uniform
//! response shapes.

pub mod prompt;
pub mod provider;
pub mod response;

pub use prompt::AdvancedParams;
pub use prompt::Limits;
pub use prompt::MediaConfig;
pub use prompt::Message;
pub use prompt::PromptSpec;
pub use prompt::ReasoningEffort;
pub use prompt::Role;
pub use prompt::SamplingParams;
pub use prompt::StrictMode;
pub use prompt::Tool;

pub use provider::AuthConfig;
pub use provider::Capabilities;
pub use provider::ConstraintLimits;
pub use provider::Constraints;
pub use provider::EndpointConfig;
pub use provider::Endpoints;
pub use provider::EventRoute;
pub use provider::EventSelector;
pub use provider::InputModes;
pub use provider::JsonOutputConfig;
pub use provider::Mappings;
pub use provider::ModelSpec;
pub use provider::ParameterSchema;
pub use provider::ProviderInfo;
pub use provider::ProviderSpec;
pub use provider::ResponseNormalization;
pub use provider::StreamNormalization;
pub use provider::SyncNormalization;
pub use provider::SystemPromptLocation;
pub use provider::ToolingConfig;

pub use response::FinishReason;
pub use response::ToolCall;
pub use response::TranslationMetadata;
pub use response::TranslationResult;
pub use response::UniformResponse;
pub use response::UniformStreamEvent;
pub use response::ValidationResult;
