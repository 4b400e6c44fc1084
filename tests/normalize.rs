//! Response normalization: sync projection and stream event routing.

mod common;

use common::fixtures;
use specado_core::normalize_stream_event;
use specado_core::normalize_sync_response;
use specado_core::types::EventRoute;
use specado_core::types::EventSelector;
use specado_core::types::FinishReason;
use specado_core::types::UniformStreamEvent;

#[test]
fn normalizes_a_sync_response() {
    let provider = fixtures::sample_provider();
    let raw = serde_json::json!({
        "choices": [{
            "message": {"content": "The weather is sunny."},
            "finish_reason": "stop",
        }]
    });

    let (response, report) = normalize_sync_response(&raw, &provider, "test-model").unwrap();

    assert_eq!(response.content, "The weather is sunny.");
    assert_eq!(response.finish_reason, FinishReason::Stop);
    assert!(!report.has_lossiness());
}

#[test]
fn unmapped_finish_reason_falls_back_to_other_and_is_recorded() {
    let provider = fixtures::sample_provider();
    let raw = serde_json::json!({
        "choices": [{
            "message": {"content": "..."},
            "finish_reason": "content_filter",
        }]
    });

    let (response, report) = normalize_sync_response(&raw, &provider, "test-model").unwrap();

    assert_eq!(response.finish_reason, FinishReason::Other);
    assert!(report.items.iter().any(|i| i.code.as_str() == "LOSS_FINISH_REASON_UNKNOWN"));
}

#[test]
fn missing_content_is_recorded_as_lossy() {
    let provider = fixtures::sample_provider();
    let raw = serde_json::json!({"choices": [{"finish_reason": "stop"}]});

    let (response, report) = normalize_sync_response(&raw, &provider, "test-model").unwrap();

    assert_eq!(response.content, "");
    assert!(report.items.iter().any(|i| i.code.as_str() == "LOSS_CONTENT_MISSING"));
}

#[test]
fn unknown_model_id_is_reported() {
    let provider = fixtures::sample_provider();
    let raw = serde_json::json!({"choices": [{"finish_reason": "stop"}]});

    let err = normalize_sync_response(&raw, &provider, "does-not-exist").unwrap_err();

    assert_eq!(err.code(), "E_MODEL_NOT_FOUND");
}

fn anthropic_style_selector() -> EventSelector {
    EventSelector {
        type_path: "$.type".to_string(),
        routes: vec![
            EventRoute {
                when: "content_block_delta".to_string(),
                emit: "text_delta".to_string(),
                text_path: Some("$.delta.text".to_string()),
                name_path: None,
                args_path: None,
            },
            EventRoute {
                when: "message_stop".to_string(),
                emit: "finish".to_string(),
                text_path: None,
                name_path: None,
                args_path: None,
            },
        ],
    }
}

#[test]
fn routes_a_text_delta_event() {
    let selector = anthropic_style_selector();
    let raw = serde_json::json!({"type": "content_block_delta", "delta": {"text": "Sun"}});

    let (event, report) = normalize_stream_event(&raw, &selector);

    match event {
        Some(UniformStreamEvent::TextDelta { text }) => assert_eq!(text, "Sun"),
        other => panic!("expected a text delta, got {other:?}"),
    }
    assert!(!report.has_lossiness());
}

#[test]
fn routes_a_finish_event() {
    let selector = anthropic_style_selector();
    let raw = serde_json::json!({"type": "message_stop"});

    let (event, _report) = normalize_stream_event(&raw, &selector);

    assert!(matches!(event, Some(UniformStreamEvent::Finish)));
}

#[test]
fn unknown_event_type_is_dropped_and_recorded() {
    let selector = anthropic_style_selector();
    let raw = serde_json::json!({"type": "ping"});

    let (event, report) = normalize_stream_event(&raw, &selector);

    assert!(event.is_none());
    assert!(report.items.iter().any(|i| i.code.as_str() == "LOSS_STREAM_UNKNOWN_EVENT"));
}
