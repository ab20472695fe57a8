//! Answer generation service port.
//!
//! The generation service accepts free-text input and returns an answer plus
//! a renderable 3D description. It is an opaque remote dependency; this port
//! is the only surface the pipeline sees.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::visualization::VisualizationDescriptor;

/// The generation service's response to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedVisualization {
    /// The generated answer text
    pub answer: String,
    /// The renderable 3D description accompanying the answer
    pub descriptor: VisualizationDescriptor,
}

/// Error produced by the answer generation service.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("answer generation failed: {0}")]
pub struct GenerationError(pub String);

/// An abstract client for the answer generation service.
///
/// The call has no side effects on failure; the pipeline attempts it exactly
/// once per request.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Generates an answer and visualization descriptor for a question.
    async fn generate(&self, question: &str) -> Result<GeneratedVisualization, GenerationError>;
}
