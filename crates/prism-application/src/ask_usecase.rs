//! Ask use case: the visualization request pipeline.
//!
//! Executes one "ask a question" request to completion or reports where it
//! failed, without leaving partial records. The use case owns no persistent
//! state; it is parameterized by the caller's session on every call.

use std::sync::Arc;

use thiserror::Error;

use prism_core::error::PrismError;
use prism_core::generation::{AnswerGenerator, GeneratedVisualization};
use prism_core::identity::Session;
use prism_core::visualization::{
    NewVisualizationRecord, VisualizationDescriptor, VisualizationRecord, VisualizationStore,
};

/// The history portion of a pipeline result.
///
/// A refresh failure does not invalidate the just-created record, so it is
/// carried alongside the otherwise-successful outcome instead of replacing
/// it.
#[derive(Debug, Clone, PartialEq)]
pub enum AskHistory {
    /// The owner's full history, newest first, including the new record.
    Refreshed(Vec<VisualizationRecord>),
    /// The refresh failed; the wrapped error is `HistoryRefreshFailed`.
    RefreshFailed(PrismError),
}

impl AskHistory {
    /// Returns the refreshed records, if the refresh succeeded.
    pub fn records(&self) -> Option<&[VisualizationRecord]> {
        match self {
            AskHistory::Refreshed(records) => Some(records),
            AskHistory::RefreshFailed(_) => None,
        }
    }

    /// Returns the refresh error, if the refresh failed.
    pub fn refresh_error(&self) -> Option<&PrismError> {
        match self {
            AskHistory::Refreshed(_) => None,
            AskHistory::RefreshFailed(e) => Some(e),
        }
    }
}

/// Result of a successful `ask` call.
#[derive(Debug, Clone, PartialEq)]
pub struct AskOutcome {
    /// The generated answer text
    pub answer: String,
    /// The renderable 3D description
    pub descriptor: VisualizationDescriptor,
    /// The record persisted for this question
    pub record: VisualizationRecord,
    /// The owner's refreshed history, or the non-fatal refresh failure
    pub history: AskHistory,
}

/// Failure of an `ask` call.
///
/// `kind` is always exactly one taxonomy kind. When generation succeeded
/// before the failure (`PersistenceFailed`), `unsaved` carries the generated
/// answer so the caller can still display it even though history will not
/// show it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct AskError {
    /// The taxonomy kind this request failed with
    pub kind: PrismError,
    /// The generated-but-unsaved answer, when generation had succeeded
    pub unsaved: Option<GeneratedVisualization>,
}

impl AskError {
    fn new(kind: PrismError) -> Self {
        Self {
            kind,
            unsaved: None,
        }
    }

    fn with_unsaved(kind: PrismError, generated: GeneratedVisualization) -> Self {
        Self {
            kind,
            unsaved: Some(generated),
        }
    }
}

/// Orchestrates one end-to-end "ask a question" operation.
///
/// Each step is attempted exactly once per call; there are no retries and no
/// mutual exclusion across overlapping calls (concurrent history refreshes
/// are last-refresh-wins).
pub struct AskUseCase {
    /// Client for the answer generation service
    generator: Arc<dyn AnswerGenerator>,
    /// Store holding the visualization records
    visualizations: Arc<dyn VisualizationStore>,
}

impl AskUseCase {
    /// Creates a new `AskUseCase` over the given collaborators.
    pub fn new(
        generator: Arc<dyn AnswerGenerator>,
        visualizations: Arc<dyn VisualizationStore>,
    ) -> Self {
        Self {
            generator,
            visualizations,
        }
    }

    /// Runs the submit → generate → persist → refresh pipeline.
    ///
    /// # Arguments
    ///
    /// * `session` - The caller's session; `None` is rejected before any
    ///   network interaction
    /// * `question` - The question text; must be non-empty after trimming
    ///
    /// # Errors
    ///
    /// - `NotAuthenticated` / `BlankQuestion`: precondition failures, no
    ///   collaborator called
    /// - `GenerationFailed`: step 1 failed, nothing persisted
    /// - `PersistenceFailed`: step 2 failed; the error carries the generated
    ///   answer in `unsaved`
    ///
    /// A step-3 refresh failure is non-fatal and reported inside the
    /// returned outcome as `AskHistory::RefreshFailed`.
    pub async fn ask(
        &self,
        session: Option<&Session>,
        question: &str,
    ) -> Result<AskOutcome, AskError> {
        let session = session.ok_or_else(|| AskError::new(PrismError::NotAuthenticated))?;

        let question = question.trim();
        if question.is_empty() {
            return Err(AskError::new(PrismError::BlankQuestion));
        }

        let owner_id = session.identity_id();
        tracing::debug!("[AskUseCase] generating answer for {}", owner_id);

        // Step 1: generate. The call has no side effects on failure.
        let generated = self
            .generator
            .generate(question)
            .await
            .map_err(|e| AskError::new(PrismError::generation(e.to_string())))?;

        // Step 2: persist. The generated answer is not discarded on failure.
        let new = NewVisualizationRecord {
            owner_id: owner_id.to_string(),
            question: question.to_string(),
            answer: generated.answer.clone(),
            descriptor: generated.descriptor.clone(),
        };
        let record = match self.visualizations.insert(new).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("[AskUseCase] persistence failed for {}: {}", owner_id, e);
                return Err(AskError::with_unsaved(
                    PrismError::persistence(e.to_string()),
                    generated,
                ));
            }
        };

        // Step 3: refresh. A failure here does not invalidate the record.
        let history = match self.visualizations.list_by_owner(owner_id).await {
            Ok(records) => AskHistory::Refreshed(records),
            Err(e) => {
                tracing::warn!(
                    "[AskUseCase] history refresh failed for {}: {}",
                    owner_id,
                    e
                );
                AskHistory::RefreshFailed(PrismError::history_refresh(e.to_string()))
            }
        };

        Ok(AskOutcome {
            answer: generated.answer,
            descriptor: generated.descriptor,
            record,
            history,
        })
    }

    /// Lists the caller's full history, newest first.
    pub async fn history(
        &self,
        session: Option<&Session>,
    ) -> prism_core::error::Result<Vec<VisualizationRecord>> {
        let session = session.ok_or(PrismError::NotAuthenticated)?;

        self.visualizations
            .list_by_owner(session.identity_id())
            .await
            .map_err(|e| PrismError::history_refresh(e.to_string()))
    }

    /// Finds one of the caller's records by id.
    ///
    /// Records owned by other identities are reported as absent.
    pub async fn find_visualization(
        &self,
        session: Option<&Session>,
        id: &str,
    ) -> prism_core::error::Result<Option<VisualizationRecord>> {
        let session = session.ok_or(PrismError::NotAuthenticated)?;

        let record = self
            .visualizations
            .find_by_id(id)
            .await
            .map_err(|e| PrismError::unexpected(e.to_string()))?;

        Ok(record.filter(|r| r.owner_id == session.identity_id()))
    }
}
