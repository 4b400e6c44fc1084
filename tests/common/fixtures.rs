//! Shared builders for integration tests: a minimal prompt, a prompt using
//! every optional field, and a provider with one or several declared
//! models.

#![allow(dead_code)]

use std::collections::BTreeMap;

use specado_core::types::AdvancedParams;
use specado_core::types::Capabilities;
use specado_core::types::ConstraintLimits;
use specado_core::types::Constraints;
use specado_core::types::EndpointConfig;
use specado_core::types::Endpoints;
use specado_core::types::EventSelector;
use specado_core::types::InputModes;
use specado_core::types::JsonOutputConfig;
use specado_core::types::Limits;
use specado_core::types::Mappings;
use specado_core::types::Message;
use specado_core::types::ModelSpec;
use specado_core::types::ParameterSchema;
use specado_core::types::ProviderInfo;
use specado_core::types::ProviderSpec;
use specado_core::types::PromptSpec;
use specado_core::types::ResponseNormalization;
use specado_core::types::SamplingParams;
use specado_core::types::StreamNormalization;
use specado_core::types::StrictMode;
use specado_core::types::SyncNormalization;
use specado_core::types::SystemPromptLocation;
use specado_core::types::Tool;
use specado_core::types::ToolingConfig;

pub fn sample_message() -> Message {
    Message::user("Hello, world!")
}

pub fn sample_system_message() -> Message {
    Message::system("You are a helpful assistant.")
}

pub fn sample_prompt() -> PromptSpec {
    PromptSpec::new("test-model", vec![sample_message()], StrictMode::Warn)
}

pub fn complex_prompt() -> PromptSpec {
    let messages = vec![
        Message::system("You are a helpful assistant."),
        Message::user("What's the weather like?"),
        Message::assistant("I'd need your location to check the weather."),
        Message::user("I'm in San Francisco."),
    ];

    let tool = Tool::new(
        "get_weather",
        serde_json::json!({
            "type": "object",
            "properties": {"location": {"type": "string", "description": "City name"}},
            "required": ["location"]
        }),
    );

    let sampling = SamplingParams {
        temperature: Some(0.7),
        top_p: Some(0.9),
        top_k: None,
        frequency_penalty: Some(0.1),
        presence_penalty: Some(0.1),
    };

    let limits = Limits {
        max_output_tokens: Some(1000),
        reasoning_tokens: Some(500),
        max_prompt_tokens: None,
    };

    PromptSpec::new("test-model", messages, StrictMode::Warn)
        .with_tools(vec![tool])
        .with_sampling(sampling)
        .with_limits(limits)
}

pub fn prompt_with_advanced(advanced: AdvancedParams) -> PromptSpec {
    sample_prompt().with_advanced(advanced)
}

pub fn sample_provider_info() -> ProviderInfo {
    ProviderInfo {
        name: "test-provider".to_string(),
        base_url: "https://api.test-provider.com".to_string(),
        headers: BTreeMap::from([("Authorization".to_string(), "Bearer test-token".to_string())]),
        auth: None,
    }
}

pub fn sample_model_spec() -> ModelSpec {
    model_spec_with_id("test-model", vec!["test-model-alias".to_string()])
}

fn model_spec_with_id(id: &str, aliases: Vec<String>) -> ModelSpec {
    let endpoint = EndpointConfig {
        method: "POST".to_string(),
        path: "/v1/chat/completions".to_string(),
        protocol: "https".to_string(),
        query: None,
        headers: None,
    };

    let mut mappings = Mappings::default();
    mappings.paths.insert("$.model_class".to_string(), "$.model".to_string());
    mappings.paths.insert("$.messages".to_string(), "$.messages".to_string());
    mappings
        .paths
        .insert("$.sampling.temperature".to_string(), "$.temperature".to_string());

    let mut parameters = BTreeMap::new();
    parameters.insert(
        "temperature".to_string(),
        ParameterSchema {
            param_type: Some("number".to_string()),
            minimum: Some(0.0),
            maximum: Some(2.0),
        },
    );

    ModelSpec {
        id: id.to_string(),
        aliases,
        family: "test".to_string(),
        endpoints: Endpoints {
            chat_completion: endpoint.clone(),
            streaming_chat_completion: endpoint,
        },
        input_modes: InputModes {
            messages: true,
            single_text: false,
            images: false,
        },
        tooling: ToolingConfig {
            tools_supported: true,
            parallel_tool_calls_default: true,
            can_disable_parallel_tool_calls: true,
            disable_switch: None,
        },
        json_output: JsonOutputConfig {
            native_param: true,
            strategy: "response_format".to_string(),
        },
        parameters,
        capabilities: Capabilities::default(),
        constraints: Constraints {
            system_prompt_location: SystemPromptLocation::First,
            forbid_unknown_top_level_fields: false,
            mutually_exclusive: Vec::new(),
            resolution_preferences: vec!["temperature".to_string(), "top_p".to_string()],
            limits: ConstraintLimits {
                max_tool_schema_bytes: 10_000,
                max_system_prompt_bytes: 5_000,
            },
            separate_system_field_path: None,
        },
        mappings,
        response_normalization: ResponseNormalization {
            sync: SyncNormalization {
                content_path: "$.choices[0].message.content".to_string(),
                finish_reason_path: "$.choices[0].finish_reason".to_string(),
                finish_reason_map: BTreeMap::from([
                    ("stop".to_string(), "stop".to_string()),
                    ("length".to_string(), "length".to_string()),
                    ("tool_calls".to_string(), "tool_call".to_string()),
                ]),
                tool_calls_path: None,
                tool_call_name_path: None,
                tool_call_args_path: None,
                tool_call_id_path: None,
            },
            stream: StreamNormalization {
                protocol: "sse".to_string(),
                event_selector: EventSelector {
                    type_path: "$.type".to_string(),
                    routes: Vec::new(),
                },
            },
        },
    }
}

pub fn sample_provider() -> ProviderSpec {
    ProviderSpec {
        spec_version: "1.0.0".to_string(),
        provider: sample_provider_info(),
        models: vec![sample_model_spec()],
    }
}

/// A provider whose single model declares a `temperature` maximum tighter
/// than the uniform spec's own `[0, 2]` sanity range, so tests can exercise
/// clamping without producing a `PromptSpec` the schema validator itself
/// would reject.
pub fn provider_with_temperature_max(max: f64) -> ProviderSpec {
    let mut provider = sample_provider();
    if let Some(schema) = provider.models[0].parameters.get_mut("temperature") {
        schema.maximum = Some(max);
    }
    provider
}

pub fn multi_model_provider() -> ProviderSpec {
    let mut models = vec![sample_model_spec()];
    for i in 2..5 {
        models.push(model_spec_with_id(
            &format!("test-model-{i}"),
            vec![format!("test-model-{i}-alias")],
        ));
    }
    ProviderSpec {
        spec_version: "1.0.0".to_string(),
        provider: sample_provider_info(),
        models,
    }
}

/// A provider with no mappings/tooling at all, for edge-case tests.
pub fn mock_provider() -> ProviderSpec {
    let endpoint = EndpointConfig {
        method: "POST".to_string(),
        path: "/mock/chat".to_string(),
        protocol: "https".to_string(),
        query: None,
        headers: None,
    };
    let model = ModelSpec {
        id: "mock-model".to_string(),
        aliases: Vec::new(),
        family: "mock".to_string(),
        endpoints: Endpoints {
            chat_completion: endpoint.clone(),
            streaming_chat_completion: endpoint,
        },
        input_modes: InputModes {
            messages: true,
            single_text: false,
            images: false,
        },
        tooling: ToolingConfig {
            tools_supported: false,
            parallel_tool_calls_default: false,
            can_disable_parallel_tool_calls: false,
            disable_switch: None,
        },
        json_output: JsonOutputConfig {
            native_param: false,
            strategy: "none".to_string(),
        },
        parameters: BTreeMap::new(),
        capabilities: Capabilities::default(),
        constraints: Constraints {
            system_prompt_location: SystemPromptLocation::First,
            forbid_unknown_top_level_fields: false,
            mutually_exclusive: Vec::new(),
            resolution_preferences: Vec::new(),
            limits: ConstraintLimits {
                max_tool_schema_bytes: 1000,
                max_system_prompt_bytes: 1000,
            },
            separate_system_field_path: None,
        },
        mappings: Mappings::default(),
        response_normalization: ResponseNormalization {
            sync: SyncNormalization {
                content_path: "$.content".to_string(),
                finish_reason_path: "$.finish_reason".to_string(),
                finish_reason_map: BTreeMap::new(),
                tool_calls_path: None,
                tool_call_name_path: None,
                tool_call_args_path: None,
                tool_call_id_path: None,
            },
            stream: StreamNormalization {
                protocol: "sse".to_string(),
                event_selector: EventSelector {
                    type_path: "$.type".to_string(),
                    routes: Vec::new(),
                },
            },
        },
    };
    ProviderSpec {
        spec_version: "1.0.0".to_string(),
        provider: ProviderInfo {
            name: "mock-provider".to_string(),
            base_url: "https://mock.api.com".to_string(),
            headers: BTreeMap::new(),
            auth: None,
        },
        models: vec![model],
    }
}
