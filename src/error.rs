//! Error types surfaced by the translation engine.
//!
//! Every variant corresponds to one of the error kinds in the spec's
//! error-handling design: validation failures are always aggregated (never
//! fail-fast), while everything else aborts the in-flight translation and
//! discards the partial request.

use thiserror::Error;

use crate::lossiness::Severity;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SpecadoError>;

/// Errors the engine can raise.
///
/// `E_TIMEOUT` and `E_TRANSPORT` are part of the error surface a transport
/// collaborator is expected to raise (see spec §6/§7) but the engine itself
/// never constructs them; they exist here so a caller can match on one
/// complete enum regardless of where an error originated.
#[derive(Debug, Error)]
pub enum SpecadoError {
    /// The `PromptSpec` failed validation.
    #[error("prompt spec is invalid: {}", errors.join("; "))]
    PromptInvalid {
        /// Every violation found, one per entry.
        errors: Vec<String>,
    },

    /// The `ProviderSpec` failed validation.
    #[error("provider spec is invalid: {}", errors.join("; "))]
    ProviderInvalid {
        /// Every violation found, one per entry.
        errors: Vec<String>,
    },

    /// `model_id` matched neither a model `id` nor any `aliases` entry.
    #[error("model not found: {model_id}")]
    ModelNotFound {
        /// The model id that was looked up.
        model_id: String,
    },

    /// A JSONPath string could not be parsed.
    #[error("invalid path syntax at '{path}': {reason}")]
    PathSyntax {
        /// The offending path string.
        path: String,
        /// Why it didn't parse.
        reason: String,
    },

    /// The parameter mapper found a destination whose existing type is
    /// incompatible with the type being written.
    #[error("type conflict writing to '{path}': {reason}")]
    TypeConflict {
        /// Destination path where the conflict occurred.
        path: String,
        /// Human-readable explanation.
        reason: String,
    },

    /// A size ceiling (tool schema bytes, system prompt bytes) was exceeded
    /// while `strict_mode = error`.
    #[error("size limit exceeded for {which}: {actual} bytes > {limit} bytes")]
    SizeLimit {
        /// Which limit was exceeded (`"tool_schema"` or `"system_prompt"`).
        which: &'static str,
        /// The configured ceiling.
        limit: usize,
        /// The actual size observed.
        actual: usize,
    },

    /// `strict_mode = error` (or `mode = "strict"`) and the translation
    /// produced lossiness at or above `warn`.
    #[error("strict mode translation failed: max lossiness severity is {max_severity:?}")]
    StrictLossiness {
        /// The highest severity recorded.
        max_severity: Severity,
    },

    /// `validate()` was called with an unrecognized schema selector.
    #[error("unknown schema selector: {selector}")]
    SchemaSelector {
        /// The selector string that was passed in.
        selector: String,
    },

    /// Raised only by the transport collaborator; the engine never
    /// constructs this variant.
    #[error("transport timeout: {0}")]
    Timeout(String),

    /// Raised only by the transport collaborator; the engine never
    /// constructs this variant.
    #[error("transport error: {0}")]
    Transport(String),
}

impl SpecadoError {
    /// Stable error-kind symbol matching spec §7 (e.g. `"E_MODEL_NOT_FOUND"`).
    pub fn code(&self) -> &'static str {
        match self {
            SpecadoError::PromptInvalid { .. } => "E_PROMPT_INVALID",
            SpecadoError::ProviderInvalid { .. } => "E_PROVIDER_INVALID",
            SpecadoError::ModelNotFound { .. } => "E_MODEL_NOT_FOUND",
            SpecadoError::PathSyntax { .. } => "E_PATH_SYNTAX",
            SpecadoError::TypeConflict { .. } => "E_TYPE_CONFLICT",
            SpecadoError::SizeLimit { .. } => "E_SIZE_LIMIT",
            SpecadoError::StrictLossiness { .. } => "E_STRICT_LOSSINESS",
            SpecadoError::SchemaSelector { .. } => "E_SCHEMA_SELECTOR",
            SpecadoError::Timeout(_) => "E_TIMEOUT",
            SpecadoError::Transport(_) => "E_TRANSPORT",
        }
    }
}

impl From<serde_json::Error> for SpecadoError {
    fn from(err: serde_json::Error) -> Self {
        SpecadoError::PromptInvalid {
            errors: vec![format!("malformed JSON: {err}")],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_spec_symbols() {
        assert_eq!(
            SpecadoError::ModelNotFound {
                model_id: "nope".into()
            }
            .code(),
            "E_MODEL_NOT_FOUND"
        );
        assert_eq!(
            SpecadoError::StrictLossiness {
                max_severity: Severity::Warn
            }
            .code(),
            "E_STRICT_LOSSINESS"
        );
    }

    #[test]
    fn model_not_found_message_contains_id() {
        let err = SpecadoError::ModelNotFound {
            model_id: "nope".into(),
        };
        assert!(err.to_string().contains("nope"));
    }
}
