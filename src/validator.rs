//! Schema validation for `PromptSpec` and `ProviderSpec` values.
//!
//! Every violation is surfaced in one pass — this never fail-fasts on the
//! first problem it finds, per spec §4.2. The only way this module raises
//! is an unrecognized selector string.

use serde_json::Value;

use crate::error::Result;
use crate::error::SpecadoError;
use crate::types::ValidationResult;

/// Which schema to validate a value against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Prompt,
    Provider,
}

impl Selector {
    fn parse(raw: &str) -> Result<Self> {
        match raw {
            "prompt" => Ok(Selector::Prompt),
            "provider" => Ok(Selector::Provider),
            other => Err(SpecadoError::SchemaSelector {
                selector: other.to_string(),
            }),
        }
    }
}

/// Validate `value` against the schema named by `selector` (`"prompt"` or
/// `"provider"`). The only failure mode is an unrecognized selector string
/// (`E_SCHEMA_SELECTOR`); every other outcome is a [`ValidationResult`].
pub fn validate(value: &Value, selector: &str) -> Result<ValidationResult> {
    let selector = Selector::parse(selector)?;
    Ok(validate_typed(value, selector))
}

/// Infallible validation once the selector is already known (used
/// internally by the orchestrator, which always knows which schema it's
/// checking).
pub fn validate_typed(value: &Value, selector: Selector) -> ValidationResult {
    let errors = match selector {
        Selector::Prompt => validate_prompt(value),
        Selector::Provider => validate_provider(value),
    };
    ValidationResult::invalid(errors)
}

const VALID_ROLES: [&str; 3] = ["system", "user", "assistant"];
const VALID_STRICT_MODES: [&str; 2] = ["warn", "error"];

fn validate_prompt(value: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    let Some(obj) = value.as_object() else {
        errors.push("$: expected a JSON object".to_string());
        return errors;
    };

    match obj.get("model_class") {
        Some(Value::String(s)) if !s.is_empty() => {}
        Some(Value::String(_)) => errors.push("$.model_class: must not be empty".to_string()),
        Some(_) => errors.push("$.model_class: must be a string".to_string()),
        None => errors.push("$.model_class: required field is missing".to_string()),
    }

    match obj.get("messages") {
        Some(Value::Array(messages)) => {
            if messages.is_empty() {
                errors.push("$.messages: must not be empty".to_string());
            }
            for (i, message) in messages.iter().enumerate() {
                validate_message(message, i, &mut errors);
            }
        }
        Some(_) => errors.push("$.messages: must be an array".to_string()),
        None => errors.push("$.messages: required field is missing".to_string()),
    }

    match obj.get("strict_mode") {
        Some(Value::String(s)) if VALID_STRICT_MODES.contains(&s.as_str()) => {}
        Some(Value::String(s)) => {
            errors.push(format!("$.strict_mode: unknown strict_mode '{s}'"))
        }
        Some(_) => errors.push("$.strict_mode: must be a string".to_string()),
        None => errors.push("$.strict_mode: required field is missing".to_string()),
    }

    if let Some(tools) = obj.get("tools") {
        match tools {
            Value::Array(tools) => validate_tools(tools, &mut errors),
            Value::Null => {}
            _ => errors.push("$.tools: must be an array".to_string()),
        }
    }

    if let Some(sampling) = obj.get("sampling") {
        if !sampling.is_null() {
            validate_sampling(sampling, &mut errors);
        }
    }

    errors
}

fn validate_message(message: &Value, index: usize, errors: &mut Vec<String>) {
    let prefix = format!("$.messages[{index}]");
    let Some(obj) = message.as_object() else {
        errors.push(format!("{prefix}: expected an object"));
        return;
    };

    match obj.get("role") {
        Some(Value::String(role)) if VALID_ROLES.contains(&role.as_str()) => {}
        Some(Value::String(role)) => {
            errors.push(format!("{prefix}.role: unknown role '{role}'"))
        }
        Some(_) => errors.push(format!("{prefix}.role: must be a string")),
        None => errors.push(format!("{prefix}.role: required field is missing")),
    }

    match obj.get("content") {
        Some(Value::String(s)) if !s.is_empty() => {}
        Some(Value::String(_)) => errors.push(format!("{prefix}.content: must not be empty")),
        Some(_) => errors.push(format!("{prefix}.content: must be a string")),
        None => errors.push(format!("{prefix}.content: required field is missing")),
    }
}

fn validate_tools(tools: &[Value], errors: &mut Vec<String>) {
    let mut seen_names = std::collections::HashSet::new();
    for (i, tool) in tools.iter().enumerate() {
        let prefix = format!("$.tools[{i}]");
        let Some(obj) = tool.as_object() else {
            errors.push(format!("{prefix}: expected an object"));
            continue;
        };
        match obj.get("name") {
            Some(Value::String(name)) if !name.is_empty() => {
                if !seen_names.insert(name.clone()) {
                    errors.push(format!("{prefix}.name: duplicate tool name '{name}'"));
                }
            }
            Some(Value::String(_)) => errors.push(format!("{prefix}.name: must not be empty")),
            Some(_) => errors.push(format!("{prefix}.name: must be a string")),
            None => errors.push(format!("{prefix}.name: required field is missing")),
        }
        if obj.get("json_schema").is_none() {
            errors.push(format!("{prefix}.json_schema: required field is missing"));
        }
    }
}

fn validate_sampling(sampling: &Value, errors: &mut Vec<String>) {
    let Some(obj) = sampling.as_object() else {
        errors.push("$.sampling: expected an object".to_string());
        return;
    };
    validate_range(obj, "temperature", "$.sampling.temperature", 0.0, 2.0, errors);
    validate_range(obj, "top_p", "$.sampling.top_p", 0.0, 1.0, errors);
}

fn validate_range(
    obj: &serde_json::Map<String, Value>,
    field: &str,
    path: &str,
    min: f64,
    max: f64,
    errors: &mut Vec<String>,
) {
    let Some(value) = obj.get(field) else {
        return;
    };
    if value.is_null() {
        return;
    }
    match value.as_f64() {
        Some(n) if n < min || n > max => {
            errors.push(format!("{path}: {n} is outside the range [{min}, {max}]"))
        }
        Some(_) => {}
        None => errors.push(format!("{path}: must be a number")),
    }
}

const REQUIRED_MODEL_FIELDS: [&str; 10] = [
    "family",
    "endpoints",
    "input_modes",
    "tooling",
    "json_output",
    "parameters",
    "constraints",
    "mappings",
    "response_normalization",
    "id",
];

fn validate_provider(value: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    let Some(obj) = value.as_object() else {
        errors.push("$: expected a JSON object".to_string());
        return errors;
    };

    if obj.get("spec_version").and_then(Value::as_str).is_none() {
        errors.push("$.spec_version: required field is missing".to_string());
    } else if let Some(version) = obj.get("spec_version").and_then(Value::as_str) {
        if semver::Version::parse(version).is_err() {
            errors.push(format!("$.spec_version: '{version}' is not valid semver"));
        }
    }

    match obj.get("provider") {
        Some(Value::Object(provider)) => {
            if provider.get("name").and_then(Value::as_str).is_none() {
                errors.push("$.provider.name: required field is missing".to_string());
            }
            if provider.get("base_url").and_then(Value::as_str).is_none() {
                errors.push("$.provider.base_url: required field is missing".to_string());
            }
            if provider.get("headers").is_none() {
                errors.push("$.provider.headers: required field is missing".to_string());
            }
        }
        Some(_) => errors.push("$.provider: expected an object".to_string()),
        None => errors.push("$.provider: required field is missing".to_string()),
    }

    match obj.get("models") {
        Some(Value::Array(models)) => {
            if models.is_empty() {
                errors.push("$.models: must not be empty".to_string());
            }
            for (i, model) in models.iter().enumerate() {
                validate_model(model, i, &mut errors);
            }
        }
        Some(_) => errors.push("$.models: must be an array".to_string()),
        None => errors.push("$.models: required field is missing".to_string()),
    }

    errors
}

fn validate_model(model: &Value, index: usize, errors: &mut Vec<String>) {
    let prefix = format!("$.models[{index}]");
    let Some(obj) = model.as_object() else {
        errors.push(format!("{prefix}: expected an object"));
        return;
    };
    for field in REQUIRED_MODEL_FIELDS {
        if obj.get(field).is_none() {
            errors.push(format!("{prefix}.{field}: required field is missing"));
        }
    }
}
