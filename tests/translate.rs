//! End-to-end translation scenarios.

mod common;

use common::fixtures;
use pretty_assertions::assert_eq;
use specado_core::translate;
use specado_core::types::AdvancedParams;
use specado_core::types::Message;
use specado_core::types::PromptSpec;
use specado_core::types::SamplingParams;
use specado_core::types::StrictMode;
use specado_core::validate;
use specado_core::Mode;
use specado_core::TranslateOptions;

#[test]
fn minimal_chat_translates_cleanly() {
    let prompt = fixtures::sample_prompt();
    let provider = fixtures::sample_provider();

    let result = translate(&prompt, &provider, "test-model", &TranslateOptions::new()).unwrap();

    assert_eq!(result.provider_request_json["model"], "test-model");
    assert_eq!(result.provider_request_json["messages"][0]["content"], "Hello, world!");
    assert!(!result.has_lossiness());
}

#[test]
fn out_of_range_temperature_is_clamped_and_recorded() {
    // 1.8 is a perfectly valid uniform temperature ([0, 2]); this model's
    // own maximum is tighter, so the constraint engine still has to clamp.
    let prompt = PromptSpec::new(
        "test-model",
        vec![Message::user("hi")],
        StrictMode::Warn,
    )
    .with_sampling(SamplingParams {
        temperature: Some(1.8),
        ..Default::default()
    });
    let provider = fixtures::provider_with_temperature_max(1.0);

    let result = translate(&prompt, &provider, "test-model", &TranslateOptions::new()).unwrap();

    assert_eq!(result.provider_request_json["temperature"], 1.0);
    let clamped = result
        .lossiness
        .items
        .iter()
        .find(|item| item.code.as_str() == "LOSS_CLAMPED")
        .unwrap();
    assert_eq!(clamped.before, Some(serde_json::json!(1.8)));
    assert_eq!(clamped.after, Some(serde_json::json!(1.0)));
}

#[test]
fn mutually_exclusive_fields_resolve_to_one_winner() {
    let mut provider = fixtures::sample_provider();
    let model = &mut provider.models[0];
    model.mappings.paths.insert("$.sampling.top_p".to_string(), "$.top_p".to_string());
    model.constraints.mutually_exclusive = vec![vec!["temperature".to_string(), "top_p".to_string()]];
    model.constraints.resolution_preferences = vec!["top_p".to_string(), "temperature".to_string()];

    let prompt = PromptSpec::new("test-model", vec![Message::user("hi")], StrictMode::Warn).with_sampling(
        SamplingParams {
            temperature: Some(0.5),
            top_p: Some(0.9),
            ..Default::default()
        },
    );

    let result = translate(&prompt, &provider, "test-model", &TranslateOptions::new()).unwrap();

    assert_eq!(result.provider_request_json.get("temperature"), None);
    assert_eq!(result.provider_request_json["top_p"], 0.9);
    assert!(result
        .lossiness
        .items
        .iter()
        .any(|item| item.code.as_str() == "LOSS_MUTEX_RESOLVED"));
}

#[test]
fn strict_mode_fails_closed_on_lossiness() {
    let prompt = PromptSpec::new(
        "test-model",
        vec![Message::user("hi")],
        StrictMode::Warn,
    )
    .with_sampling(SamplingParams {
        temperature: Some(1.8),
        ..Default::default()
    });
    let provider = fixtures::provider_with_temperature_max(1.0);

    let err = translate(&prompt, &provider, "test-model", &TranslateOptions::new().with_mode(Mode::Strict)).unwrap_err();

    assert_eq!(err.code(), "E_STRICT_LOSSINESS");
}

#[test]
fn unknown_model_is_reported() {
    let prompt = PromptSpec::new("Chat", vec![Message::user("hi")], StrictMode::Warn);
    let provider = fixtures::sample_provider();

    let err = translate(&prompt, &provider, "does-not-exist", &TranslateOptions::new()).unwrap_err();

    assert_eq!(err.code(), "E_MODEL_NOT_FOUND");
}

#[test]
fn alias_resolves_to_the_right_model_in_a_multi_model_provider() {
    let prompt = PromptSpec::new("Chat", vec![Message::user("hi")], StrictMode::Warn);
    let provider = fixtures::multi_model_provider();

    let result = translate(&prompt, &provider, "test-model-3-alias", &TranslateOptions::new()).unwrap();

    assert_eq!(result.metadata.unwrap().model, "test-model-3");
}

#[test]
fn translation_is_deterministic() {
    let prompt = fixtures::complex_prompt();
    let provider = fixtures::sample_provider();

    let first = translate(&prompt, &provider, "test-model", &TranslateOptions::new()).unwrap();
    let second = translate(&prompt, &provider, "test-model", &TranslateOptions::new()).unwrap();

    assert_eq!(
        first.provider_request_json.to_string(),
        second.provider_request_json.to_string()
    );
}

#[test]
fn unsupported_advanced_capability_is_dropped_not_written() {
    let prompt = fixtures::prompt_with_advanced(AdvancedParams {
        thinking: Some(true),
        ..Default::default()
    });
    let provider = fixtures::sample_provider();

    let result = translate(&prompt, &provider, "test-model", &TranslateOptions::new()).unwrap();

    assert!(result.provider_request_json.get("thinking").is_none());
    assert!(result
        .lossiness
        .items
        .iter()
        .any(|item| item.code.as_str() == "LOSS_CAPABILITY_UNSUPPORTED"));
}

#[test]
fn validate_and_translate_agree_on_prompt_invalidity() {
    let provider = fixtures::sample_provider();

    let valid = fixtures::sample_prompt();
    assert!(validate(&valid.to_value(), "prompt").unwrap().is_valid);
    assert!(translate(&valid, &provider, "test-model", &TranslateOptions::new()).is_ok());

    let invalid = serde_json::json!({
        "model_class": "test-model",
        "messages": [],
        "strict_mode": "warn",
    });
    assert!(!validate(&invalid, "prompt").unwrap().is_valid);

    let invalid_prompt: PromptSpec = serde_json::from_value(invalid).unwrap();
    let err = translate(&invalid_prompt, &provider, "test-model", &TranslateOptions::new()).unwrap_err();
    assert_eq!(err.code(), "E_PROMPT_INVALID");
}
