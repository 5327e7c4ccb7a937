//! Review of a single proposal
//!
//! ```text
//!  (streaming) ──complete──▶ pending ──approve──▶ approved
//!                               └─────reject───▶ rejected
//! ```
//!
//! Decisions are accepted once the tool call is complete and only while the
//! review is pending. Everything else is a no-op reported as a [`Transition`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::ImageCatalog;
use crate::gallery::{ApprovedHaiku, Gallery};
use crate::proposal::{handle_proposal, HaikuProposal, ProposalOutcome, ProposalRecord};

/// Progress of the tool call that carries the proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallStatus {
    /// Arguments are still streaming in
    InProgress,
    /// The call finished; its arguments are final
    Complete,
}

/// Decision state of a review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReviewState {
    /// Waiting for the user
    Pending,
    /// Added to the gallery
    Approved {
        /// Id of the gallery entry created by the approval
        haiku_id: String,
    },
    /// Discarded
    Rejected,
}

/// What an approve/reject request did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The proposal joined the gallery and is now displayed
    Approved(ApprovedHaiku),
    /// The proposal was discarded
    Rejected,
    /// A decision was already made; nothing changed
    AlreadyDecided(ReviewState),
    /// Controls are not active yet (still streaming, or nothing to show)
    Inactive,
    /// No review with that id
    UnknownProposal,
    /// Nobody answered; the review stays pending
    Abandoned,
}

impl Transition {
    /// Whether the request changed the review state
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Approved(_) | Self::Rejected)
    }
}

/// One proposal under review
#[derive(Debug, Clone)]
pub struct ProposalReview {
    id: String,
    status: CallStatus,
    draft: HaikuProposal,
    outcome: Option<ProposalOutcome>,
    state: ReviewState,
}

impl ProposalReview {
    /// Start reviewing a proposal whose arguments are still streaming
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: CallStatus::InProgress,
            draft: HaikuProposal::default(),
            outcome: None,
            state: ReviewState::Pending,
        }
    }

    /// Review id (the tool call id)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Tool-call status
    pub fn status(&self) -> CallStatus {
        self.status
    }

    /// Decision state
    pub fn state(&self) -> &ReviewState {
        &self.state
    }

    /// Arguments received so far
    pub fn draft(&self) -> &HaikuProposal {
        &self.draft
    }

    /// Handler outcome, available once the call is complete
    pub fn outcome(&self) -> Option<&ProposalOutcome> {
        self.outcome.as_ref()
    }

    /// Validated record, available once the call is complete
    pub fn record(&self) -> Option<&ProposalRecord> {
        self.outcome.as_ref().map(|outcome| &outcome.record)
    }

    /// Merge a streamed snapshot. Ignored once the call is complete.
    pub fn update(&mut self, snapshot: HaikuProposal) -> bool {
        if self.status == CallStatus::Complete {
            debug!(review_id = %self.id, "Ignoring snapshot for completed call");
            return false;
        }
        self.draft.merge(snapshot);
        true
    }

    /// Finish the call and run the proposal handler. Repeated calls return the
    /// first outcome.
    pub fn complete(&mut self, catalog: &ImageCatalog) -> &ProposalOutcome {
        self.status = CallStatus::Complete;
        self.outcome
            .get_or_insert_with(|| handle_proposal(&self.draft, catalog))
    }

    /// Whether approve/reject would take effect right now
    pub fn controls_active(&self) -> bool {
        self.blocked().is_none()
    }

    /// The no-op a decision would produce, if any
    pub fn blocked(&self) -> Option<Transition> {
        if self.state != ReviewState::Pending {
            return Some(Transition::AlreadyDecided(self.state.clone()));
        }
        match self.record() {
            Some(record) if self.status == CallStatus::Complete && record.is_renderable() => None,
            _ => Some(Transition::Inactive),
        }
    }

    /// Approve into the gallery
    pub fn approve(&mut self, gallery: &mut Gallery) -> Transition {
        if let Some(blocked) = self.blocked() {
            debug!(review_id = %self.id, ?blocked, "Approve ignored");
            return blocked;
        }
        let Some(record) = self.record() else {
            return Transition::Inactive;
        };
        let haiku = gallery.approve(record).clone();
        self.state = ReviewState::Approved {
            haiku_id: haiku.id.clone(),
        };
        Transition::Approved(haiku)
    }

    /// Reject; the gallery only logs it
    pub fn reject(&mut self, gallery: &Gallery) -> Transition {
        if let Some(blocked) = self.blocked() {
            debug!(review_id = %self.id, ?blocked, "Reject ignored");
            return blocked;
        }
        let Some(record) = self.record() else {
            return Transition::Inactive;
        };
        gallery.reject(record);
        self.state = ReviewState::Rejected;
        Transition::Rejected
    }
}
