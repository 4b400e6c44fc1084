//! Append-only lossiness log: every parameter dropped, clamped, reshaped,
//! emulated, or conflicted during translation is recorded here, never
//! silently discarded.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use tracing::trace;

/// How serious a piece of lossiness is.
///
/// `None` only ever appears as [`LossinessReport::max_severity`] when no
/// items were recorded; individual items are always `Info`, `Warn`, or
/// `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Nothing was recorded.
    None,
    /// Informational: a deliberate, lossless-in-practice reshaping.
    Info,
    /// A value changed or a field was dropped in a way that alters meaning.
    Warn,
    /// A conflict that prevents faithful translation of that field.
    Error,
}

/// Stable lossiness codes from spec §7. Never raised as errors — always
/// recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LossinessCode {
    LossClamped,
    LossMutexResolved,
    LossUnknownFieldDropped,
    LossSystemRelocated,
    LossToolOverflow,
    LossSystemOverflow,
    LossTypeConflict,
    LossUnmapped,
    LossCapabilityUnsupported,
    LossModalityDropped,
    LossContentMissing,
    LossFinishReasonUnknown,
    LossStreamUnknownEvent,
}

impl LossinessCode {
    /// The stable symbol string, e.g. `"LOSS_CLAMPED"`.
    pub fn as_str(self) -> &'static str {
        match self {
            LossinessCode::LossClamped => "LOSS_CLAMPED",
            LossinessCode::LossMutexResolved => "LOSS_MUTEX_RESOLVED",
            LossinessCode::LossUnknownFieldDropped => "LOSS_UNKNOWN_FIELD_DROPPED",
            LossinessCode::LossSystemRelocated => "LOSS_SYSTEM_RELOCATED",
            LossinessCode::LossToolOverflow => "LOSS_TOOL_OVERFLOW",
            LossinessCode::LossSystemOverflow => "LOSS_SYSTEM_OVERFLOW",
            LossinessCode::LossTypeConflict => "LOSS_TYPE_CONFLICT",
            LossinessCode::LossUnmapped => "LOSS_UNMAPPED",
            LossinessCode::LossCapabilityUnsupported => "LOSS_CAPABILITY_UNSUPPORTED",
            LossinessCode::LossModalityDropped => "LOSS_MODALITY_DROPPED",
            LossinessCode::LossContentMissing => "LOSS_CONTENT_MISSING",
            LossinessCode::LossFinishReasonUnknown => "LOSS_FINISH_REASON_UNKNOWN",
            LossinessCode::LossStreamUnknownEvent => "LOSS_STREAM_UNKNOWN_EVENT",
        }
    }
}

impl std::fmt::Display for LossinessCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded divergence between the uniform `PromptSpec` and the
/// produced provider request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LossinessItem {
    pub code: LossinessCode,
    /// JSONPath into the source `PromptSpec` (or a synthetic path for
    /// provider-level concerns such as unknown top-level fields).
    pub path: String,
    pub message: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
}

/// Summary counts closed into a [`LossinessReport`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LossinessSummary {
    pub total_items: usize,
    pub by_severity: BTreeMap<String, usize>,
    pub by_code: BTreeMap<String, usize>,
}

/// The closed, read-only result of a translation's lossiness recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LossinessReport {
    pub items: Vec<LossinessItem>,
    pub max_severity: Severity,
    pub summary: LossinessSummary,
}

impl LossinessReport {
    /// Whether any lossiness was recorded at all.
    pub fn has_lossiness(&self) -> bool {
        !self.items.is_empty()
    }

    /// An empty report (`items = []`, `max_severity = none`).
    pub fn empty() -> Self {
        LossinessRecorder::new().close()
    }
}

/// Append-only recorder. Owns exactly one translation's worth of lossiness
/// items; items accumulate in pipeline-step order, never insertion-sorted
/// or reordered by discovery order within a step.
#[derive(Debug, Default)]
pub struct LossinessRecorder {
    items: Vec<LossinessItem>,
}

impl LossinessRecorder {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record one lossiness item.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &mut self,
        code: LossinessCode,
        path: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        before: Option<Value>,
        after: Option<Value>,
    ) {
        let path = path.into();
        let message = message.into();
        trace!(code = code.as_str(), %path, %message, ?severity, "lossiness recorded");
        self.items.push(LossinessItem {
            code,
            path,
            message,
            severity,
            before,
            after,
        });
    }

    /// Highest severity recorded so far, or `None` if nothing was recorded.
    pub fn max_severity(&self) -> Severity {
        self.items
            .iter()
            .map(|item| item.severity)
            .max()
            .unwrap_or(Severity::None)
    }

    /// Close the recorder into a summarized, read-only report.
    pub fn close(self) -> LossinessReport {
        let max_severity = self.max_severity();
        let mut by_severity: BTreeMap<String, usize> = BTreeMap::new();
        let mut by_code: BTreeMap<String, usize> = BTreeMap::new();
        for item in &self.items {
            *by_severity
                .entry(format!("{:?}", item.severity).to_lowercase())
                .or_insert(0) += 1;
            *by_code.entry(item.code.as_str().to_string()).or_insert(0) += 1;
        }
        LossinessReport {
            summary: LossinessSummary {
                total_items: self.items.len(),
                by_severity,
                by_code,
            },
            items: self.items,
            max_severity,
        }
    }
}
