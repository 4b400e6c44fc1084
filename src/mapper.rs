//! Parameter mapper: projects `PromptSpec` fields onto the provider request
//! shape using a `ModelSpec`'s declarative `mappings` table (spec §4.4).
//!
//! Iteration over `mappings.paths` is lexicographic by source path — the
//! table is a `BTreeMap`, so this falls out of normal iteration rather than
//! needing an explicit sort. That ordering, plus canonical (sorted) JSON
//! object keys from `serde_json`'s default map, is what makes translation
//! deterministic (spec §9).

use serde_json::Value;

use crate::error::Result;
use crate::error::SpecadoError;
use crate::json_path;
use crate::lossiness::LossinessCode;
use crate::lossiness::LossinessRecorder;
use crate::lossiness::Severity;
use crate::types::Mappings;

/// Apply `mappings` to `prompt`, writing into a fresh request value.
///
/// Returns the set of source paths that were actually read, so the caller
/// can report `LOSS_UNMAPPED` for uniform fields nothing consumed.
pub fn map(
    prompt: &Value,
    mappings: &Mappings,
    mode_is_strict: bool,
    recorder: &mut LossinessRecorder,
) -> Result<Value> {
    let mut request = Value::Object(serde_json::Map::new());

    for (source, destination) in &mappings.paths {
        let source_path = json_path::parse(source)?;
        let Some(value) = json_path::read(prompt, &source_path) else {
            continue;
        };

        let destination_path = json_path::parse(destination)?;
        match json_path::write(&mut request, &destination_path, value.clone()) {
            Ok(()) => {}
            Err(SpecadoError::TypeConflict { path, reason }) => {
                if mode_is_strict {
                    return Err(SpecadoError::TypeConflict { path, reason });
                }
                recorder.record(
                    LossinessCode::LossTypeConflict,
                    source.clone(),
                    format!("could not write to '{destination}': {reason}"),
                    Severity::Error,
                    Some(value.clone()),
                    None,
                );
            }
            Err(other) => return Err(other),
        }
    }

    for (flag_path, flag_value) in &mappings.flags {
        let path = json_path::parse(flag_path)?;
        json_path::write(&mut request, &path, flag_value.clone())?;
    }

    Ok(request)
}

/// Record `LOSS_UNMAPPED` for every top-level uniform field present in
/// `prompt` whose path never appears as a source in `mappings.paths`.
pub fn record_unmapped_fields(
    prompt: &Value,
    mappings: &Mappings,
    recorder: &mut LossinessRecorder,
) {
    const TRACKED_FIELDS: [&str; 7] = [
        "tools",
        "tool_choice",
        "response_format",
        "limits",
        "advanced",
        "media",
        "sampling",
    ];

    let Some(obj) = prompt.as_object() else {
        return;
    };

    for field in TRACKED_FIELDS {
        if obj.get(field).map(Value::is_null).unwrap_or(true) {
            continue;
        }
        let field_path = format!("$.{field}");
        let mapped = mappings
            .paths
            .keys()
            .any(|source| source == &field_path || source.starts_with(&format!("{field_path}.")));
        if !mapped {
            recorder.record(
                LossinessCode::LossUnmapped,
                field_path,
                format!("'{field}' has no destination in this model's mappings"),
                Severity::Info,
                obj.get(field).cloned(),
                None,
            );
        }
    }
}
