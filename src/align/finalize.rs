//! Tree finalization: root assignment and the training-mode self-loop guard

use super::orchestrator::{Alignment, AlignmentReport};
use super::{AlignError, AlignMode};
use crate::graph::{AnchorMap, Parent, Role, Token};
use tracing::debug;

/// A finished dependency tree over one phrase, ready to serialize
#[derive(Debug, Clone)]
pub struct AlignedPhrase {
    pub phrase: String,
    /// Exactly one entry per normalized phrase token, in id order
    pub tokens: Vec<Token>,
    pub anchors: AnchorMap,
    pub report: AlignmentReport,
}

impl AlignedPhrase {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Attach unparented objects to the root and, in training mode, reject
/// any phrase containing a token that is its own parent.
pub fn finalize(alignment: Alignment, mode: AlignMode) -> Result<AlignedPhrase, AlignError> {
    let Alignment {
        phrase,
        mut table,
        anchors,
        report,
    } = alignment;

    for token in table.iter_mut() {
        if token.role == Some(Role::Obj) && token.parent.is_none() {
            token.parent = Some(Parent::Root);
        }
    }

    if mode == AlignMode::Training {
        if let Some(token) = table.iter().find(|t| t.is_self_loop()) {
            debug!(phrase = %phrase, token = %token.id, "discarding phrase with self-loop");
            return Err(AlignError::SelfLoop {
                token: token.id,
                phrase,
            });
        }
    }

    Ok(AlignedPhrase {
        phrase,
        tokens: table.into_tokens(),
        anchors,
        report,
    })
}
