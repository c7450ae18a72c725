//! Two-round alignment of objects, attributes and relations onto tokens
//!
//! Round 1 resolves objects by exact span only, then attaches attributes
//! and relations to whatever got anchored. Round 2 resolves the remaining
//! objects by synonym overlap and re-runs attribute and relation
//! attachment so late anchors can still collect their dependents. Within
//! a round the order objects → attributes → relations is fixed: later
//! steps read anchors written by earlier ones.

use super::finalize::{finalize, AlignedPhrase};
use super::locate::locate;
use super::synonym::match_synonym;
use super::{AlignError, AlignMode};
use crate::corpus::RegionGraph;
use crate::graph::{AnchorMap, Parent, ProcessedGraph, Relation, Role, TokenId, TokenTable};
use crate::lexicon::LexicalOracle;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, trace};

/// Which of the two passes is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Round {
    /// Objects by exact span only
    Exact,
    /// Remaining objects by synonym overlap
    Synonym,
}

/// Per-phrase alignment counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlignmentReport {
    /// Objects anchored by an exact span in round 1
    pub objects_exact: usize,
    /// Objects anchored by synonym overlap in round 2
    pub objects_synonym: usize,
    /// Attribute attachments (a word re-attached in round 2 counts again)
    pub attributes_attached: usize,
    /// Relation attachments (a relation re-attached in round 2 counts again)
    pub relations_attached: usize,
    /// Attributes or relations skipped because their token held another role
    pub role_conflicts: usize,
}

impl AlignmentReport {
    pub fn objects_resolved(&self) -> usize {
        self.objects_exact + self.objects_synonym
    }
}

/// Token table and anchors after both rounds, before finalization
#[derive(Debug, Clone)]
pub struct Alignment {
    pub phrase: String,
    pub table: TokenTable,
    pub anchors: AnchorMap,
    pub report: AlignmentReport,
}

/// Aligns region graphs onto their phrase tokens.
///
/// Holds no per-phrase state; one aligner can serve many phrases
/// concurrently.
pub struct Aligner {
    oracle: Arc<dyn LexicalOracle>,
    mode: AlignMode,
}

impl Aligner {
    /// Create an aligner in training mode
    pub fn new(oracle: Arc<dyn LexicalOracle>) -> Self {
        Self {
            oracle,
            mode: AlignMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: AlignMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> AlignMode {
        self.mode
    }

    pub fn oracle(&self) -> &dyn LexicalOracle {
        self.oracle.as_ref()
    }

    /// Normalize, align and finalize one region graph
    pub fn align(&self, graph: &RegionGraph) -> Result<AlignedPhrase, AlignError> {
        let processed = ProcessedGraph::from_region(graph);
        finalize(self.align_processed(&processed), self.mode)
    }

    /// Run both rounds over a normalized graph
    pub fn align_processed(&self, graph: &ProcessedGraph) -> Alignment {
        let mut state = RoundState {
            graph,
            oracle: self.oracle.as_ref(),
            table: TokenTable::from_words(&graph.words, self.oracle.as_ref()),
            anchors: AnchorMap::new(),
            report: AlignmentReport::default(),
        };

        state.run(Round::Exact);
        state.run(Round::Synonym);

        debug!(
            phrase = %graph.phrase,
            objects = graph.objects.len(),
            anchored = state.anchors.len(),
            attributes = state.report.attributes_attached,
            relations = state.report.relations_attached,
            "aligned phrase"
        );

        Alignment {
            phrase: graph.phrase.clone(),
            table: state.table,
            anchors: state.anchors,
            report: state.report,
        }
    }
}

impl std::fmt::Debug for Aligner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aligner").field("mode", &self.mode).finish_non_exhaustive()
    }
}

struct RoundState<'a> {
    graph: &'a ProcessedGraph,
    oracle: &'a dyn LexicalOracle,
    table: TokenTable,
    anchors: AnchorMap,
    report: AlignmentReport,
}

impl RoundState<'_> {
    fn run(&mut self, round: Round) {
        match round {
            Round::Exact => self.objects_by_span(),
            Round::Synonym => self.objects_by_synonym(),
        }
        self.attach_attributes(round);
        self.attach_relations(round);
    }

    fn objects_by_span(&mut self) {
        let graph = self.graph;
        for name in &graph.objects {
            let span = locate(name, &graph.words);
            let Some(&tail) = span.last() else {
                trace!(object = %name, "no exact span");
                continue;
            };

            for &id in &span {
                self.table[id].claim(Role::Obj);
            }
            self.table.link_span(&span);

            if self.anchors.insert(name.as_str(), tail) {
                self.report.objects_exact += 1;
            }
        }
    }

    fn objects_by_synonym(&mut self) {
        let graph = self.graph;
        for name in &graph.objects {
            if self.anchors.contains(name) {
                continue;
            }
            let Some(id) = match_synonym(name, &self.table, self.oracle) else {
                debug!(object = %name, "object unresolved");
                continue;
            };

            self.table[id].claim(Role::Obj);
            self.anchors.insert(name.as_str(), id);
            self.report.objects_synonym += 1;
        }
    }

    /// Locate a word exactly, chaining a multi-word span, or fall back to
    /// synonym overlap. `None` when the word cannot be placed or its exact
    /// tail already holds a role other than `role`.
    fn place(&mut self, word: &str, role: Role) -> Option<TokenId> {
        let span = locate(word, &self.graph.words);
        if let Some(&tail) = span.last() {
            if self.table[tail].conflicts_with(role) {
                trace!(word, token = %tail, ?role, "role conflict");
                self.report.role_conflicts += 1;
                return None;
            }
            self.table.link_span(&span);
            return Some(tail);
        }
        match_synonym(word, &self.table, self.oracle)
    }

    fn attach_attributes(&mut self, round: Round) {
        let graph = self.graph;
        for pair in &graph.attributes {
            let Some(anchor) = self.anchors.get(&pair.object) else {
                continue;
            };

            for word in &pair.words {
                let Some(id) = self.place(word, Role::Attr) else {
                    trace!(?round, attribute = %word, object = %pair.object, "attribute dropped");
                    continue;
                };

                let token = &mut self.table[id];
                token.claim(Role::Attr);
                token.attach(Parent::Token(anchor), Relation::Attr);
                self.report.attributes_attached += 1;
            }
        }
    }

    fn attach_relations(&mut self, round: Round) {
        let graph = self.graph;
        for triple in &graph.relations {
            let (Some(subject), Some(object)) = (
                self.anchors.get(&triple.subject),
                self.anchors.get(&triple.object),
            ) else {
                continue;
            };

            let Some(predicate) = self.place(&triple.predicate, Role::Pred) else {
                trace!(?round, predicate = %triple.predicate, "relation dropped");
                continue;
            };

            let token = &mut self.table[predicate];
            token.claim(Role::Pred);
            token.attach(Parent::Token(subject), Relation::Pred);
            self.table[object].attach(Parent::Token(predicate), Relation::Objt);
            self.report.relations_attached += 1;
        }
    }
}
