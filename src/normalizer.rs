//! Response normalizer: projects a raw provider response (or one streaming
//! event) onto the uniform shapes in [`crate::types::response`] (spec §4.6).

use serde_json::Value;

use crate::json_path;
use crate::lossiness::LossinessCode;
use crate::lossiness::LossinessRecorder;
use crate::lossiness::Severity;
use crate::types::EventSelector;
use crate::types::FinishReason;
use crate::types::SyncNormalization;
use crate::types::ToolCall;
use crate::types::UniformResponse;
use crate::types::UniformStreamEvent;

/// Project one complete, non-streamed provider response.
pub fn normalize_sync(raw: &Value, model: &str, sync: &SyncNormalization, recorder: &mut LossinessRecorder) -> UniformResponse {
    let content = read_path_str(raw, &sync.content_path).unwrap_or_else(|| {
        recorder.record(
            LossinessCode::LossContentMissing,
            sync.content_path.clone(),
            "response content path produced no value".to_string(),
            Severity::Error,
            None,
            None,
        );
        String::new()
    });

    let raw_finish_reason = read_path_str(raw, &sync.finish_reason_path);
    let finish_reason = raw_finish_reason
        .as_deref()
        .and_then(|reason| sync.finish_reason_map.get(reason))
        .and_then(|mapped| parse_finish_reason(mapped))
        .unwrap_or_else(|| {
            if let Some(reason) = &raw_finish_reason {
                recorder.record(
                    LossinessCode::LossFinishReasonUnknown,
                    sync.finish_reason_path.clone(),
                    format!("finish reason '{reason}' has no mapping; defaulted to 'other'"),
                    Severity::Info,
                    Some(Value::from(reason.clone())),
                    Some(Value::from("other")),
                );
            }
            FinishReason::Other
        });

    let tool_calls = extract_tool_calls(raw, sync);

    UniformResponse {
        model: model.to_string(),
        content,
        finish_reason,
        tool_calls,
        raw_metadata: raw.as_object().cloned().unwrap_or_default(),
    }
}

fn parse_finish_reason(mapped: &str) -> Option<FinishReason> {
    match mapped {
        "stop" => Some(FinishReason::Stop),
        "length" => Some(FinishReason::Length),
        "tool_call" => Some(FinishReason::ToolCall),
        "end_conversation" => Some(FinishReason::EndConversation),
        "other" => Some(FinishReason::Other),
        _ => None,
    }
}

fn extract_tool_calls(raw: &Value, sync: &SyncNormalization) -> Option<Vec<ToolCall>> {
    let calls_path = sync.tool_calls_path.as_ref()?;
    let name_path = sync.tool_call_name_path.as_ref()?;
    let args_path = sync.tool_call_args_path.as_ref()?;

    let path = json_path::parse(calls_path).ok()?;
    let Some(Value::Array(entries)) = json_path::read(raw, &path) else {
        return None;
    };

    let mut calls = Vec::new();
    for entry in entries {
        let name = read_relative_str(entry, name_path)?;
        let arguments = read_relative(entry, args_path).cloned().unwrap_or(Value::Null);
        let id = sync
            .tool_call_id_path
            .as_ref()
            .and_then(|p| read_relative_str(entry, p));
        calls.push(ToolCall { name, arguments, id });
    }
    Some(calls)
}

/// Read a field path relative to one tool-call entry, stripping the
/// configured path down to its final segment (entries are plain
/// provider-shaped objects, not full response trees).
fn read_relative_str(entry: &Value, field: &str) -> Option<String> {
    read_relative(entry, field)?.as_str().map(str::to_string)
}

fn read_relative<'a>(entry: &'a Value, field: &str) -> Option<&'a Value> {
    let key = field.rsplit('.').next().unwrap_or(field);
    entry.get(key)
}

fn read_path_str(raw: &Value, path: &str) -> Option<String> {
    let parsed = json_path::parse(path).ok()?;
    json_path::read(raw, &parsed)?.as_str().map(str::to_string)
}

/// Project one streaming event payload. Returns `None` (with a recorded
/// `LOSS_STREAM_UNKNOWN_EVENT`) when no route in `selector.routes` matches.
pub fn normalize_stream_event(
    raw: &Value,
    selector: &EventSelector,
    recorder: &mut LossinessRecorder,
) -> Option<UniformStreamEvent> {
    let type_path = json_path::parse(&selector.type_path).ok()?;
    let event_type = json_path::read(raw, &type_path)?.as_str()?.to_string();

    let route = selector.routes.iter().find(|route| route.when == event_type);
    let Some(route) = route else {
        recorder.record(
            LossinessCode::LossStreamUnknownEvent,
            selector.type_path.clone(),
            format!("stream event type '{event_type}' has no matching route"),
            Severity::Info,
            Some(Value::from(event_type.clone())),
            None,
        );
        return None;
    };

    match route.emit.as_str() {
        "text_delta" => {
            let text = route
                .text_path
                .as_deref()
                .and_then(|p| read_path_str(raw, p))
                .unwrap_or_default();
            Some(UniformStreamEvent::TextDelta { text })
        }
        "tool_call_delta" => {
            let name = route.name_path.as_deref().and_then(|p| read_path_str(raw, p));
            let arguments = route.args_path.as_deref().and_then(|p| {
                let parsed = json_path::parse(p).ok()?;
                json_path::read(raw, &parsed).cloned()
            });
            Some(UniformStreamEvent::ToolCallDelta { name, arguments })
        }
        "finish" => Some(UniformStreamEvent::Finish),
        _ => {
            recorder.record(
                LossinessCode::LossStreamUnknownEvent,
                selector.type_path.clone(),
                format!("route for '{event_type}' emits unrecognized kind '{}'", route.emit),
                Severity::Info,
                None,
                None,
            );
            None
        }
    }
}
