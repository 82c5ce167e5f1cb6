//! crates/scriptforge_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete text-generation API it talks to.

use async_trait::async_trait;
use serde_json::Value;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, auth, quota).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Upstream service error: {0}")]
    Upstream(String),
    #[error("Upstream service returned no content: {0}")]
    EmptyResponse(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Declared Output Shape
//=========================================================================================

/// A named JSON schema the generation service is asked to conform to.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    pub name: String,
    pub schema: Value,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait ScriptGenerationService: Send + Sync {
    /// Sends a single instruction with a declared output schema and returns the
    /// raw text of the answer, which is expected (but not guaranteed) to be JSON.
    async fn generate_structured(&self, prompt: &str, schema: &OutputSchema) -> PortResult<String>;
}
