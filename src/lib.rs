//! Provider-agnostic LLM request translation.
//!
//! `specado_core` turns a provider-agnostic [`PromptSpec`](types::PromptSpec)
//! into a concrete provider request body, guided by a declarative
//! [`ProviderSpec`](types::ProviderSpec) that describes one provider's
//! models, constraints, and response shapes. Every place the translation
//! can't be perfectly faithful — a clamped value, a dropped unknown field, a
//! relocated system prompt — is recorded in a [`LossinessReport`], never
//! silently swallowed.
//!
//! This crate does no I/O: it is a pure function from prompt + provider spec
//! to request JSON. Sending that request, and parsing the response bytes off
//! the wire, is left to the caller; [`normalize_sync_response`] and
//! [`normalize_stream_event`] only need the response already decoded into
//! [`serde_json::Value`].
//!
//! # Quick Start
//!
//! ```no_run
//! use specado_core::types::{Message, PromptSpec, ProviderSpec, StrictMode};
//! use specado_core::{translate, TranslateOptions};
//!
//! # fn load_provider_spec() -> ProviderSpec { unimplemented!() }
//! let prompt = PromptSpec::new(
//!     "Chat",
//!     vec![Message::user("hello")],
//!     StrictMode::Warn,
//! );
//! let provider = load_provider_spec();
//!
//! let result = translate(&prompt, &provider, "gpt-4o", &TranslateOptions::new())?;
//! println!("{}", result.provider_request_json);
//! # Ok::<(), specado_core::error::SpecadoError>(())
//! ```

pub mod advanced;
pub mod constraints;
pub mod error;
pub mod json_path;
pub mod lossiness;
pub mod mapper;
pub mod normalizer;
pub mod orchestrator;
pub mod types;
pub mod validator;

pub use error::Result;
pub use error::SpecadoError;
pub use lossiness::LossinessCode;
pub use lossiness::LossinessItem;
pub use lossiness::LossinessReport;
pub use lossiness::Severity;
pub use orchestrator::normalize_stream_event;
pub use orchestrator::normalize_sync_response;
pub use orchestrator::translate;
pub use orchestrator::Mode;
pub use orchestrator::TranslateOptions;
pub use validator::validate;
