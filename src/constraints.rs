//! Constraint engine: mutual-exclusion resolution, unknown-field policy,
//! system-prompt relocation, byte-size limits, and range clamping
//! (spec §4.3). Runs after the parameter mapper and advanced-parameter
//! handler have finished writing into the request.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde_json::Value;

use crate::error::Result;
use crate::error::SpecadoError;
use crate::json_path;
use crate::lossiness::LossinessCode;
use crate::lossiness::LossinessRecorder;
use crate::lossiness::Severity;
use crate::types::Constraints;
use crate::types::ParameterSchema;
use crate::types::SystemPromptLocation;
use crate::types::Tool;

/// Run every constraint rule against `request` in place.
///
/// `messages_destination` is the path the mapper wrote the message array to
/// (needed for system-prompt relocation); `tools` are the original prompt
/// tools, used for schema-size accounting; `known_top_level_fields` is the
/// set of destination top-level keys this model's mapping/advanced/flags
/// conventions can legitimately produce.
#[allow(clippy::too_many_arguments)]
pub fn constrain(
    request: &mut Value,
    constraints: &Constraints,
    parameters: &BTreeMap<String, ParameterSchema>,
    messages_destination: Option<&str>,
    tools: Option<&[Tool]>,
    known_top_level_fields: &BTreeSet<String>,
    mode_is_strict: bool,
    recorder: &mut LossinessRecorder,
) -> Result<()> {
    resolve_mutual_exclusion(request, constraints, recorder);
    enforce_unknown_fields(request, constraints, known_top_level_fields, recorder);
    if let Some(destination) = messages_destination {
        relocate_system_prompt(request, destination, constraints, recorder)?;
    }
    enforce_tool_schema_limit(tools, constraints, mode_is_strict, recorder)?;
    enforce_system_prompt_limit(request, messages_destination, constraints, mode_is_strict, recorder)?;
    clamp_ranges(request, parameters, recorder);
    Ok(())
}

/// For each mutually-exclusive group, keep at most one present field —
/// the earliest-listed in `resolution_preferences` wins; a field absent
/// from `resolution_preferences` is treated as lowest priority, and among
/// those, the first listed in the group itself is the tiebreak
/// (DESIGN.md Open Question 1).
fn resolve_mutual_exclusion(request: &mut Value, constraints: &Constraints, recorder: &mut LossinessRecorder) {
    let Some(map) = request.as_object_mut() else {
        return;
    };

    for group in &constraints.mutually_exclusive {
        let present: Vec<&String> = group.iter().filter(|field| map.contains_key(*field)).collect();
        if present.len() < 2 {
            continue;
        }

        let rank = |field: &str| -> usize {
            constraints
                .resolution_preferences
                .iter()
                .position(|preferred| preferred == field)
                .unwrap_or(usize::MAX)
        };

        let Some(winner) = present
            .iter()
            .min_by_key(|field| {
                let r = rank(field);
                let tiebreak = group.iter().position(|f| &f == *field).unwrap_or(usize::MAX);
                (r, tiebreak)
            })
            .map(|field| field.to_string())
        else {
            continue;
        };

        let losers: Vec<String> = present
            .into_iter()
            .filter(|field| **field != winner)
            .cloned()
            .collect();

        for field in losers {
            let before = map.remove(&field);
            recorder.record(
                LossinessCode::LossMutexResolved,
                format!("$.{field}"),
                format!("'{field}' conflicts with '{winner}'; '{winner}' was kept"),
                Severity::Warn,
                before,
                None,
            );
        }
    }
}

fn enforce_unknown_fields(
    request: &mut Value,
    constraints: &Constraints,
    known_top_level_fields: &BTreeSet<String>,
    recorder: &mut LossinessRecorder,
) {
    if !constraints.forbid_unknown_top_level_fields {
        return;
    }
    let Value::Object(map) = request else {
        return;
    };
    let unknown: Vec<String> = map
        .keys()
        .filter(|key| !known_top_level_fields.contains(key.as_str()))
        .cloned()
        .collect();
    for key in unknown {
        let before = map.remove(&key);
        recorder.record(
            LossinessCode::LossUnknownFieldDropped,
            format!("$.{key}"),
            format!("'{key}' is not a recognized field for this model"),
            Severity::Warn,
            before,
            None,
        );
    }
}

fn relocate_system_prompt(
    request: &mut Value,
    messages_destination: &str,
    constraints: &Constraints,
    recorder: &mut LossinessRecorder,
) -> Result<()> {
    if constraints.system_prompt_location.keeps_system_role() {
        return Ok(());
    }

    let path = json_path::parse(messages_destination)?;
    let Some(Value::Array(messages)) = json_path::read(request, &path).cloned() else {
        return Ok(());
    };

    let system_indices: Vec<usize> = messages
        .iter()
        .enumerate()
        .filter(|(_, m)| m.get("role").and_then(Value::as_str) == Some("system"))
        .map(|(i, _)| i)
        .collect();
    if system_indices.is_empty() {
        return Ok(());
    }

    let system_content: String = system_indices
        .iter()
        .filter_map(|i| messages[*i].get("content").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut remaining: Vec<Value> = messages
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !system_indices.contains(i))
        .map(|(_, m)| m)
        .collect();

    match constraints.system_prompt_location {
        SystemPromptLocation::SeparateField => {
            if let Some(field_path) = &constraints.separate_system_field_path {
                let dest = json_path::parse(field_path)?;
                json_path::write(request, &dest, Value::from(system_content.clone()))?;
            }
        }
        SystemPromptLocation::First => {
            if let Some(first) = remaining.first_mut() {
                if let Some(content) = first.get("content").and_then(Value::as_str) {
                    let merged = format!("{system_content}\n\n{content}");
                    first["content"] = Value::from(merged);
                }
            } else {
                remaining.push(serde_json::json!({"role": "user", "content": system_content}));
            }
        }
        SystemPromptLocation::MessageRole | SystemPromptLocation::FirstMessage => unreachable!(),
    }

    json_path::write(request, &path, Value::Array(remaining))?;
    recorder.record(
        LossinessCode::LossSystemRelocated,
        messages_destination.to_string(),
        format!(
            "system message relocated per system_prompt_location = {:?}",
            constraints.system_prompt_location
        ),
        Severity::Info,
        None,
        None,
    );
    Ok(())
}

fn enforce_tool_schema_limit(
    tools: Option<&[Tool]>,
    constraints: &Constraints,
    mode_is_strict: bool,
    recorder: &mut LossinessRecorder,
) -> Result<()> {
    let Some(tools) = tools else {
        return Ok(());
    };
    let limit = constraints.limits.max_tool_schema_bytes;
    for tool in tools {
        let size = tool.schema_byte_size();
        if size <= limit {
            continue;
        }
        if mode_is_strict {
            return Err(SpecadoError::SizeLimit {
                which: "tool_schema",
                limit,
                actual: size,
            });
        }
        recorder.record(
            LossinessCode::LossToolOverflow,
            format!("$.tools[{}].json_schema", tool.name),
            format!("tool '{}' schema is {size} bytes, exceeding the {limit}-byte limit", tool.name),
            Severity::Warn,
            None,
            None,
        );
    }
    Ok(())
}

fn enforce_system_prompt_limit(
    request: &Value,
    messages_destination: Option<&str>,
    constraints: &Constraints,
    mode_is_strict: bool,
    recorder: &mut LossinessRecorder,
) -> Result<()> {
    let Some(destination) = messages_destination else {
        return Ok(());
    };
    let limit = constraints.limits.max_system_prompt_bytes;
    let path = json_path::parse(destination)?;
    let Some(Value::Array(messages)) = json_path::read(request, &path) else {
        return Ok(());
    };
    for message in messages {
        if message.get("role").and_then(Value::as_str) != Some("system") {
            continue;
        }
        let Some(content) = message.get("content").and_then(Value::as_str) else {
            continue;
        };
        let size = content.len();
        if size <= limit {
            continue;
        }
        if mode_is_strict {
            return Err(SpecadoError::SizeLimit {
                which: "system_prompt",
                limit,
                actual: size,
            });
        }
        recorder.record(
            LossinessCode::LossSystemOverflow,
            destination.to_string(),
            format!("system prompt is {size} bytes, exceeding the {limit}-byte limit"),
            Severity::Warn,
            None,
            None,
        );
    }
    Ok(())
}

/// Clamp numeric top-level fields into `[minimum, maximum]` per the
/// model's `parameters` schema. Idempotent: a value already in range is
/// left untouched and produces no lossiness item.
fn clamp_ranges(
    request: &mut Value,
    parameters: &BTreeMap<String, ParameterSchema>,
    recorder: &mut LossinessRecorder,
) {
    let Value::Object(map) = request else {
        return;
    };
    for (name, schema) in parameters {
        let Some(current) = map.get(name).and_then(Value::as_f64) else {
            continue;
        };
        let mut clamped = current;
        if let Some(min) = schema.minimum {
            clamped = clamped.max(min);
        }
        if let Some(max) = schema.maximum {
            clamped = clamped.min(max);
        }
        if (clamped - current).abs() < f64::EPSILON {
            continue;
        }
        let before = map.get(name).cloned();
        map.insert(name.clone(), Value::from(clamped));
        recorder.record(
            LossinessCode::LossClamped,
            format!("$.{name}"),
            format!("'{name}' clamped from {current} to {clamped}"),
            Severity::Warn,
            before,
            Some(Value::from(clamped)),
        );
    }
}
