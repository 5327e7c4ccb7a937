//! Prelude: Re-exports common types for convenience
//!
//! # Usage
//! ```
//! use haiku_core::prelude::*;
//! ```

pub use crate::error::{Error, Result};

// Workflow
pub use crate::catalog::{ImageCatalog, ImageChoice};
pub use crate::gallery::{ApprovedHaiku, Gallery, Selection};
pub use crate::proposal::{handle_proposal, HaikuProposal, ProposalOutcome, ProposalRecord};
pub use crate::review::{CallStatus, ProposalReview, ReviewState, Transition};
pub use crate::session::{GardenEvent, GardenSession, SharedSession};

// Agent surface
pub use crate::approval::{settle, ChannelDecisionSource, Decision, DecisionRequest, DecisionSource};
pub use crate::tool::{GenerateHaikuTool, Tool, ToolDefinition, ToolSet};

// Infra
pub use crate::config::{GardenConfig, LogConfig};
