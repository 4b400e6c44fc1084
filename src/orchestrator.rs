//! Translation orchestrator: the ordered pipeline from `PromptSpec` +
//! `ProviderSpec` to a `TranslationResult` (spec §4.7).
//!
//! validate prompt → validate provider → resolve model → modality check →
//! map → advanced → constrain → strict gate → finalize.

use std::collections::BTreeSet;
use std::time::Instant;

use chrono::Utc;
use tracing::debug_span;
use tracing::instrument;

use crate::advanced;
use crate::constraints;
use crate::error::Result;
use crate::error::SpecadoError;
use crate::lossiness::LossinessCode;
use crate::lossiness::LossinessRecorder;
use crate::lossiness::Severity;
use crate::mapper;
use crate::normalizer;
use crate::types::EventSelector;
use crate::types::ModelSpec;
use crate::types::ProviderSpec;
use crate::types::PromptSpec;
use crate::types::StrictMode;
use crate::types::TranslationMetadata;
use crate::types::TranslationResult;
use crate::types::UniformResponse;
use crate::types::UniformStreamEvent;
use crate::validator;
use crate::validator::Selector;

/// Translation mode; overrides `PromptSpec.strict_mode` when set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Standard,
    Strict,
}

/// Caller-controlled translation knobs.
#[derive(Debug, Clone, Default)]
pub struct TranslateOptions {
    mode: Option<Mode>,
}

impl TranslateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// Translate `prompt` into a provider-ready request for `model_id`, using
/// `provider`'s declarative model spec, producing a full lossiness
/// accounting. `model_id` is matched against each `ModelSpec`'s `id` then
/// `aliases` (spec §4.7 step 3) — it is independent of
/// `prompt.model_class`, which names the interaction class (e.g. `"Chat"`),
/// not a specific model.
#[instrument(skip_all, fields(model_id = %model_id, provider = %provider.provider.name))]
pub fn translate(
    prompt: &PromptSpec,
    provider: &ProviderSpec,
    model_id: &str,
    options: &TranslateOptions,
) -> Result<TranslationResult> {
    let started = Instant::now();
    let mut recorder = LossinessRecorder::new();

    let prompt_value = prompt.to_value();
    let provider_value = provider.to_value();
    {
        let _span = debug_span!("validate").entered();
        let prompt_validation = validator::validate_typed(&prompt_value, Selector::Prompt);
        if !prompt_validation.is_valid {
            return Err(SpecadoError::PromptInvalid {
                errors: prompt_validation.errors,
            });
        }

        let provider_validation = validator::validate_typed(&provider_value, Selector::Provider);
        if !provider_validation.is_valid {
            return Err(SpecadoError::ProviderInvalid {
                errors: provider_validation.errors,
            });
        }
    }

    let model = {
        let _span = debug_span!("resolve_model").entered();
        resolve_model(provider, model_id)?
    };

    let mode_is_strict = match options.mode {
        Some(Mode::Strict) => true,
        Some(Mode::Standard) => false,
        None => prompt.strict_mode == StrictMode::Error,
    };

    check_modality(prompt, model, &mut recorder);

    let mut request = {
        let _span = debug_span!("map").entered();
        let request = mapper::map(&prompt_value, &model.mappings, mode_is_strict, &mut recorder)?;
        mapper::record_unmapped_fields(&prompt_value, &model.mappings, &mut recorder);
        request
    };

    if let Some(advanced_params) = &prompt.advanced {
        let _span = debug_span!("advanced").entered();
        advanced::apply(
            &mut request,
            advanced_params,
            &model.capabilities,
            &advanced::AdvancedDestinations::default(),
            &mut recorder,
        )?;
    }

    {
        let _span = debug_span!("constrain").entered();
        let messages_destination = model.mappings.paths.get("$.messages").map(String::as_str);
        let known_fields = known_top_level_fields(model);
        constraints::constrain(
            &mut request,
            &model.constraints,
            &model.parameters,
            messages_destination,
            prompt.tools.as_deref(),
            &known_fields,
            mode_is_strict,
            &mut recorder,
        )?;
    }

    let _span = debug_span!("finalize").entered();
    let max_severity = recorder.max_severity();
    if mode_is_strict && max_severity >= Severity::Warn {
        return Err(SpecadoError::StrictLossiness { max_severity });
    }

    let lossiness = recorder.close();
    let metadata = TranslationMetadata {
        provider: provider.provider.name.clone(),
        model: model.id.clone(),
        timestamp: Utc::now(),
        duration_ms: Some(started.elapsed().as_millis() as u64),
        strict_mode: if mode_is_strict {
            StrictMode::Error
        } else {
            StrictMode::Warn
        },
    };

    Ok(TranslationResult {
        provider_request_json: request,
        lossiness,
        metadata: Some(metadata),
    })
}

fn resolve_model<'a>(provider: &'a ProviderSpec, model_id: &str) -> Result<&'a ModelSpec> {
    provider.resolve_model(model_id).ok_or_else(|| SpecadoError::ModelNotFound {
        model_id: model_id.to_string(),
    })
}

fn check_modality(prompt: &PromptSpec, model: &ModelSpec, recorder: &mut LossinessRecorder) {
    let Some(media) = &prompt.media else {
        return;
    };
    if media.input_images.is_some() && !model.input_modes.images {
        recorder.record(
            LossinessCode::LossModalityDropped,
            "$.media.input_images",
            "model does not declare support for image input".to_string(),
            Severity::Warn,
            None,
            None,
        );
    }
}

/// The top-level keys this model's mapping/advanced conventions can
/// legitimately produce, used by the constraint engine's unknown-field
/// policy.
fn known_top_level_fields(model: &ModelSpec) -> BTreeSet<String> {
    let mut fields = BTreeSet::new();
    for destination in model.mappings.paths.values() {
        if let Some(top) = top_level_field(destination) {
            fields.insert(top.to_string());
        }
    }
    for destination in model.mappings.flags.keys() {
        if let Some(top) = top_level_field(destination) {
            fields.insert(top.to_string());
        }
    }
    let destinations = advanced::AdvancedDestinations::default();
    for destination in [
        &destinations.seed,
        &destinations.reasoning_effort,
        &destinations.reasoning_mode,
        &destinations.thinking,
        &destinations.min_thinking_tokens,
        &destinations.thinking_budget,
        &destinations.verbosity,
    ] {
        if let Some(top) = top_level_field(destination) {
            fields.insert(top.to_string());
        }
    }
    if let Some(path) = &model.constraints.separate_system_field_path {
        if let Some(top) = top_level_field(path) {
            fields.insert(top.to_string());
        }
    }
    fields
}

fn top_level_field(path: &str) -> Option<&str> {
    let rest = path.strip_prefix("$.")?;
    Some(rest.split(['.', '[']).next().unwrap_or(rest))
}

/// Project one complete provider response onto the uniform shape, using
/// `model_id`'s `response_normalization.sync` rules (spec §6:
/// `normalize_sync_response(raw, provider, model_id) → UniformResponse`).
#[instrument(skip_all, fields(model_id = %model_id, provider = %provider.provider.name))]
pub fn normalize_sync_response(
    raw: &serde_json::Value,
    provider: &ProviderSpec,
    model_id: &str,
) -> Result<(UniformResponse, crate::lossiness::LossinessReport)> {
    let model = resolve_model(provider, model_id)?;
    let mut recorder = LossinessRecorder::new();
    let response = normalizer::normalize_sync(raw, &model.id, &model.response_normalization.sync, &mut recorder);
    Ok((response, recorder.close()))
}

/// Project one streaming event payload.
pub fn normalize_stream_event(raw: &serde_json::Value, selector: &EventSelector) -> (Option<UniformStreamEvent>, crate::lossiness::LossinessReport) {
    let mut recorder = LossinessRecorder::new();
    let event = normalizer::normalize_stream_event(raw, selector, &mut recorder);
    (event, recorder.close())
}
