//! Advanced-parameter handler: translates `PromptSpec.advanced` fields onto
//! the provider request, gated by a model's declared `capabilities`
//! (spec §4.5).
//!
//! Each advanced field maps to exactly one capability flag. A field whose
//! capability is unsupported on the target model is dropped with
//! `LOSS_CAPABILITY_UNSUPPORTED` (warn) rather than written — the general
//! strict-mode gate downstream decides whether that warning aborts the
//! translation, so this module never special-cases `strict_mode` itself.

use serde_json::Value;

use crate::error::Result;
use crate::json_path;
use crate::lossiness::LossinessCode;
use crate::lossiness::LossinessRecorder;
use crate::lossiness::Severity;
use crate::types::AdvancedParams;
use crate::types::Capabilities;

struct AdvancedField<'a> {
    name: &'static str,
    value: Option<Value>,
    capability_name: &'static str,
    supported: bool,
    destination: &'a str,
}

/// Apply `advanced` onto `request` according to `capabilities`, writing
/// destinations resolved from the model's own `mappings.flags`/`paths`
/// conventions — here the caller supplies the destination path per field
/// since these have no uniform source JSONPath of their own to look up.
pub fn apply(
    request: &mut Value,
    advanced: &AdvancedParams,
    capabilities: &Capabilities,
    destinations: &AdvancedDestinations,
    recorder: &mut LossinessRecorder,
) -> Result<()> {
    let fields = [
        AdvancedField {
            name: "seed",
            value: advanced.seed.map(Value::from),
            capability_name: "deterministic_sampling",
            supported: capabilities.deterministic_sampling,
            destination: &destinations.seed,
        },
        AdvancedField {
            name: "reasoning_effort",
            value: advanced
                .reasoning_effort
                .and_then(|e| serde_json::to_value(e).ok()),
            capability_name: "adaptive_reasoning",
            supported: capabilities.adaptive_reasoning,
            destination: &destinations.reasoning_effort,
        },
        AdvancedField {
            name: "reasoning_mode",
            value: advanced.reasoning_mode.clone().map(Value::from),
            capability_name: "adaptive_reasoning",
            supported: capabilities.adaptive_reasoning,
            destination: &destinations.reasoning_mode,
        },
        AdvancedField {
            name: "thinking",
            value: advanced.thinking.map(Value::from),
            capability_name: "thinking_mode",
            supported: capabilities.thinking_mode,
            destination: &destinations.thinking,
        },
        AdvancedField {
            name: "min_thinking_tokens",
            value: advanced.min_thinking_tokens.map(Value::from),
            capability_name: "thinking_mode",
            supported: capabilities.thinking_mode,
            destination: &destinations.min_thinking_tokens,
        },
        AdvancedField {
            name: "thinking_budget",
            value: advanced.thinking_budget.map(Value::from),
            capability_name: "thinking_mode",
            supported: capabilities.thinking_mode,
            destination: &destinations.thinking_budget,
        },
        AdvancedField {
            name: "verbosity",
            value: advanced.verbosity.clone().map(Value::from),
            capability_name: "balanced_performance",
            supported: capabilities.balanced_performance,
            destination: &destinations.verbosity,
        },
    ];

    for field in fields {
        let Some(value) = field.value else {
            continue;
        };
        let path = format!("$.advanced.{}", field.name);
        if !field.supported {
            recorder.record(
                LossinessCode::LossCapabilityUnsupported,
                path,
                format!(
                    "'{}' requires capability '{}', which this model does not declare",
                    field.name, field.capability_name
                ),
                Severity::Warn,
                Some(value),
                None,
            );
            continue;
        }
        let destination = json_path::parse(field.destination)?;
        json_path::write(request, &destination, value)?;
    }

    Ok(())
}

/// Where each advanced field is written when its capability is supported.
/// Resolved from the model's own mapping conventions rather than hardcoded
/// — constructed by the orchestrator from the `ModelSpec`.
#[derive(Debug, Clone)]
pub struct AdvancedDestinations {
    pub seed: String,
    pub reasoning_effort: String,
    pub reasoning_mode: String,
    pub thinking: String,
    pub min_thinking_tokens: String,
    pub thinking_budget: String,
    pub verbosity: String,
}

impl Default for AdvancedDestinations {
    fn default() -> Self {
        Self {
            seed: "$.seed".to_string(),
            reasoning_effort: "$.reasoning_effort".to_string(),
            reasoning_mode: "$.reasoning_mode".to_string(),
            thinking: "$.thinking.enabled".to_string(),
            min_thinking_tokens: "$.thinking.min_tokens".to_string(),
            thinking_budget: "$.thinking.budget_tokens".to_string(),
            verbosity: "$.verbosity".to_string(),
        }
    }
}
