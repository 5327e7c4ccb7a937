//! Asking the display layer for a decision
//!
//! [`settle`] waits for an approve/reject answer on a pending review without
//! holding the session lock, then applies it.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::proposal::ProposalRecord;
use crate::review::Transition;
use crate::session::SharedSession;

/// A user's answer to a proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Add it to the gallery
    Approve,
    /// Discard it
    Reject,
}

/// Source of decisions for pending proposals
#[async_trait]
pub trait DecisionSource: Send + Sync {
    /// Ask for a decision. `Ok(None)` means the proposal was abandoned.
    async fn decide(
        &self,
        review_id: &str,
        record: &ProposalRecord,
    ) -> anyhow::Result<Option<Decision>>;
}

/// Rejects every proposal
pub struct RejectAll;

#[async_trait]
impl DecisionSource for RejectAll {
    async fn decide(
        &self,
        _review_id: &str,
        _record: &ProposalRecord,
    ) -> anyhow::Result<Option<Decision>> {
        Ok(Some(Decision::Reject))
    }
}

/// Request sent to the channel source
#[derive(Debug)]
pub struct DecisionRequest {
    /// Review being decided
    pub review_id: String,
    /// What the user is looking at
    pub record: ProposalRecord,
    /// Responder channel
    responder: tokio::sync::oneshot::Sender<Decision>,
}

impl DecisionRequest {
    /// Answer the request. Returns false if the asker stopped waiting.
    pub fn respond(self, decision: Decision) -> bool {
        self.responder.send(decision).is_ok()
    }
}

/// A source that forwards requests over a channel
pub struct ChannelDecisionSource {
    sender: tokio::sync::mpsc::Sender<DecisionRequest>,
}

impl ChannelDecisionSource {
    /// Create a new channel source
    pub fn new(sender: tokio::sync::mpsc::Sender<DecisionRequest>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl DecisionSource for ChannelDecisionSource {
    async fn decide(
        &self,
        review_id: &str,
        record: &ProposalRecord,
    ) -> anyhow::Result<Option<Decision>> {
        let (tx, rx) = tokio::sync::oneshot::channel();

        let request = DecisionRequest {
            review_id: review_id.to_string(),
            record: record.clone(),
            responder: tx,
        };

        self.sender
            .send(request)
            .await
            .map_err(|_| Error::decision_channel("Decision channel closed"))?;

        // A dropped request means the user walked away
        Ok(rx.await.ok())
    }
}

/// Wait for a decision on a review and apply it.
///
/// Returns the no-op transition straight away when the review is unknown,
/// already decided or not yet complete.
pub async fn settle(
    session: &SharedSession,
    review_id: &str,
    source: &dyn DecisionSource,
) -> Result<Transition> {
    let record = {
        let session = session.lock();
        let Some(review) = session.review(review_id) else {
            return Ok(match session.retired(review_id) {
                Some(state) => Transition::AlreadyDecided(state.clone()),
                None => Transition::UnknownProposal,
            });
        };
        if let Some(blocked) = review.blocked() {
            return Ok(blocked);
        }
        match review.record() {
            Some(record) => record.clone(),
            None => return Ok(Transition::Inactive),
        }
    };

    let decision = source
        .decide(review_id, &record)
        .await
        .map_err(|e| {
            e.downcast::<Error>()
                .unwrap_or_else(|e| Error::decision_channel(e.to_string()))
        })?;

    let transition = match decision {
        Some(Decision::Approve) => session.lock().approve(review_id),
        Some(Decision::Reject) => session.lock().reject(review_id),
        None => {
            info!(review_id, "Proposal abandoned");
            Transition::Abandoned
        }
    };
    debug!(review_id, ?transition, "Review settled");
    Ok(transition)
}
