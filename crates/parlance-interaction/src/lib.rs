//! Parlance interaction: external collaborator interfaces.
//!
//! The pipeline treats speech-to-text and AI-provider generation as opaque
//! collaborators behind the traits in this crate. Each collaborator owns its
//! own transport, timeout, and retry policy; this core only distinguishes
//! "unavailable" from "rejected".

pub mod error;
pub mod provider;
pub mod transcription;

pub use error::CollaboratorError;
pub use provider::{InvokeOptions, ProviderAgent, StaticProviderAgent};
pub use transcription::{StaticTranscriber, Transcriber, Transcript};
