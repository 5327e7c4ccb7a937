//! Garden session - owner of the gallery and of every open review
//!
//! The agent layer feeds tool-call arguments in, the display layer sends
//! decisions and selections, and both can watch [`GardenEvent`]s.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::catalog::ImageCatalog;
use crate::config::GardenConfig;
use crate::gallery::{ApprovedHaiku, Gallery, Selection};
use crate::proposal::{handle_proposal, HaikuProposal, ProposalOutcome};
use crate::review::{ProposalReview, ReviewState, Transition};

/// A session shared between the tool surface and the display layer
pub type SharedSession = Arc<parking_lot::Mutex<GardenSession>>;

/// Events emitted by a session
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum GardenEvent {
    /// New arguments arrived for a proposal still in progress
    ProposalStreaming { review_id: String },
    /// The tool call completed and the proposal awaits a decision
    ProposalReady {
        review_id: String,
        confirmation: String,
    },
    /// The requested image was replaced by the catalog fallback
    ImageFallback {
        review_id: String,
        requested: Option<String>,
        resolved: String,
    },
    /// A proposal was approved into the gallery
    Approved {
        review_id: String,
        haiku: ApprovedHaiku,
    },
    /// A proposal was rejected
    Rejected { review_id: String },
    /// A gallery entry was put on display
    Selected { haiku_id: String },
}

/// State of one user's garden
pub struct GardenSession {
    catalog: ImageCatalog,
    gallery: Gallery,
    reviews: Vec<ProposalReview>,
    /// Decisions of pruned reviews, keyed by tool call id
    retired: HashMap<String, ReviewState>,
    events: broadcast::Sender<GardenEvent>,
}

impl GardenSession {
    /// Create a session using the built-in image catalog
    pub fn new(config: &GardenConfig) -> Self {
        Self::with_catalog(config, ImageCatalog::builtin())
    }

    /// Create a session with a specific catalog
    pub fn with_catalog(config: &GardenConfig, catalog: ImageCatalog) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            catalog,
            gallery: Gallery::new(config.image_base_path.clone()),
            reviews: Vec::new(),
            retired: HashMap::new(),
            events,
        }
    }

    /// Wrap the session for sharing across tasks
    pub fn into_shared(self) -> SharedSession {
        Arc::new(parking_lot::Mutex::new(self))
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<GardenEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: GardenEvent) {
        if let Err(e) = self.events.send(event) {
            debug!("Failed to emit event (no receivers): {}", e);
        }
    }

    /// The image catalog
    pub fn catalog(&self) -> &ImageCatalog {
        &self.catalog
    }

    /// The gallery
    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    /// Look up a review by tool call id
    pub fn review(&self, review_id: &str) -> Option<&ProposalReview> {
        self.reviews.iter().find(|review| review.id() == review_id)
    }

    /// All reviews in arrival order
    pub fn reviews(&self) -> &[ProposalReview] {
        &self.reviews
    }

    /// Decision of a review that was pruned
    pub fn retired(&self, review_id: &str) -> Option<&ReviewState> {
        self.retired.get(review_id)
    }

    /// Reviews still waiting for a decision
    pub fn pending_reviews(&self) -> impl Iterator<Item = &ProposalReview> {
        self.reviews.iter().filter(|review| review.controls_active())
    }

    fn open_review(&mut self, review_id: &str) -> &mut ProposalReview {
        match self.reviews.iter().position(|review| review.id() == review_id) {
            Some(index) => &mut self.reviews[index],
            None => {
                debug!(review_id, "Opening review");
                self.reviews.push(ProposalReview::new(review_id));
                let last = self.reviews.len() - 1;
                &mut self.reviews[last]
            }
        }
    }

    /// Feed a streaming fragment of tool-call arguments.
    ///
    /// Fragments that cannot be decoded yet leave the draft as it was.
    pub fn stream_arguments(&mut self, review_id: &str, fragment: &str) {
        if self.retired.contains_key(review_id) {
            debug!(review_id, "Ignoring fragment for decided call");
            return;
        }
        match HaikuProposal::from_partial(fragment) {
            Some(snapshot) => self.apply_snapshot(review_id, snapshot),
            None => {
                self.open_review(review_id);
                debug!(review_id, "Fragment not decodable yet");
            }
        }
    }

    /// Merge an already-decoded snapshot into the draft
    pub fn apply_snapshot(&mut self, review_id: &str, snapshot: HaikuProposal) {
        if self.retired.contains_key(review_id) {
            debug!(review_id, "Ignoring snapshot for decided call");
            return;
        }
        if self.open_review(review_id).update(snapshot) {
            self.emit(GardenEvent::ProposalStreaming {
                review_id: review_id.to_string(),
            });
        }
    }

    /// Complete the tool call with its final arguments and run the proposal
    /// handler. A repeated completion returns the first outcome unchanged.
    ///
    /// A call whose review was already decided and pruned is validated again
    /// but does not reopen a review.
    pub fn complete_proposal(&mut self, review_id: &str, arguments: &str) -> ProposalOutcome {
        let catalog = self.catalog;
        if self.retired.contains_key(review_id) {
            debug!(review_id, "Call already decided, not reopening review");
            return handle_proposal(&HaikuProposal::from_arguments(arguments), &catalog);
        }
        let review = self.open_review(review_id);
        if let Some(outcome) = review.outcome() {
            debug!(review_id, "Proposal already complete");
            return outcome.clone();
        }

        review.update(HaikuProposal::from_arguments(arguments));
        let requested = review.draft().selected_image_id.clone();
        let outcome = review.complete(&catalog).clone();

        if outcome.image_fallback {
            self.emit(GardenEvent::ImageFallback {
                review_id: review_id.to_string(),
                requested,
                resolved: outcome.record.image_id.clone(),
            });
        }
        self.emit(GardenEvent::ProposalReady {
            review_id: review_id.to_string(),
            confirmation: outcome.confirmation.clone(),
        });
        outcome
    }

    /// Approve a proposal into the gallery
    pub fn approve(&mut self, review_id: &str) -> Transition {
        let Some(index) = self.reviews.iter().position(|review| review.id() == review_id) else {
            return self.missing_review(review_id);
        };
        let transition = self.reviews[index].approve(&mut self.gallery);
        if let Transition::Approved(haiku) = &transition {
            self.emit(GardenEvent::Approved {
                review_id: review_id.to_string(),
                haiku: haiku.clone(),
            });
        }
        transition
    }

    /// Reject a proposal
    pub fn reject(&mut self, review_id: &str) -> Transition {
        let Some(index) = self.reviews.iter().position(|review| review.id() == review_id) else {
            return self.missing_review(review_id);
        };
        let transition = self.reviews[index].reject(&self.gallery);
        if transition == Transition::Rejected {
            self.emit(GardenEvent::Rejected {
                review_id: review_id.to_string(),
            });
        }
        transition
    }

    /// Transition for a decision on an id with no open review
    fn missing_review(&self, review_id: &str) -> Transition {
        match self.retired.get(review_id) {
            Some(state) => {
                debug!(review_id, ?state, "Decision for pruned review ignored");
                Transition::AlreadyDecided(state.clone())
            }
            None => {
                debug!(review_id, "Decision for unknown proposal");
                Transition::UnknownProposal
            }
        }
    }

    /// Display a previously approved haiku
    pub fn select(&mut self, haiku_id: &str) -> Selection {
        let selection = self.gallery.select(haiku_id);
        if selection == Selection::Selected {
            info!(haiku_id, "Haiku selected");
            self.emit(GardenEvent::Selected {
                haiku_id: haiku_id.to_string(),
            });
        }
        selection
    }

    /// Drop reviews that reached a decision, keeping pending ones.
    ///
    /// Only the decision of a pruned review is kept, so the same call can
    /// never be decided twice.
    pub fn prune_decided(&mut self) -> usize {
        let (pending, decided): (Vec<_>, Vec<_>) = std::mem::take(&mut self.reviews)
            .into_iter()
            .partition(|review| review.state() == &ReviewState::Pending);
        self.reviews = pending;

        let pruned = decided.len();
        for review in decided {
            self.retired.insert(review.id().to_string(), review.state().clone());
        }
        pruned
    }
}

impl Default for GardenSession {
    fn default() -> Self {
        Self::new(&GardenConfig::default())
    }
}
