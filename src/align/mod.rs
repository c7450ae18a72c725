//! Alignment of scene-graph tuples onto phrase tokens
//!
//! - [`locate`]: exact, word-boundary span search
//! - [`match_synonym`]: greedy synonym-overlap fallback
//! - [`Aligner`]: the two-round orchestration
//! - [`finalize`]: root assignment and the self-loop guard

mod finalize;
mod locate;
mod orchestrator;
mod synonym;


pub use finalize::{finalize, AlignedPhrase};
pub use locate::locate;
pub use orchestrator::{Aligner, Alignment, AlignmentReport, Round};
pub use synonym::match_synonym;

use crate::graph::TokenId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Whether structurally corrupt phrases are dropped or passed through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignMode {
    /// Drop phrases containing a self-referential token
    #[default]
    Training,
    /// Emit every phrase as aligned
    Evaluation,
}

/// Errors that make a phrase unusable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignError {
    #[error("token {token} is its own parent in phrase \"{phrase}\"")]
    SelfLoop { token: TokenId, phrase: String },
}
