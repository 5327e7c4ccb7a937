//! # Haiku Core - proposal review for an agent-driven haiku garden
//!
//! An external agent proposes haiku through a tool call; the user approves or
//! rejects each proposal; approved haiku collect in a session gallery.
//!
//! This crate provides:
//! - Image catalog (`catalog`) - Fixed set of illustrations with fallback
//! - Proposals (`proposal`) - Lenient decoding and the proposal handler
//! - Review (`review`) - Per-proposal approve/reject state machine
//! - Gallery (`gallery`) - Approved haiku and the active selection
//! - Session (`session`) - Owner of gallery and reviews, with events
//! - Tools (`tool`) - The `generateHaiku` tool for the agent layer
//! - Approval (`approval`) - Waiting on the display layer for decisions
//! - Configuration (`config`) and logging (`logging`)

pub mod approval;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gallery;
pub mod logging;
pub mod prelude;
pub mod proposal;
pub mod review;
pub mod session;
pub mod tool;
