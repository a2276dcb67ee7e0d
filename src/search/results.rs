use std::collections::BinaryHeap;
use std::cmp::Ordering;
use crate::core::types::{DocId, ObjectId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Matched,
    /// No query token exists in the vocabulary. A normal outcome, not an error.
    NoMatchingTerms,
    /// Tokens resolved but no document survived the merge
    NoResults,
}

/// Document with relevance score
#[derive(Debug, Clone, Copy)]
pub struct ScoredDocument {
    pub doc_id: DocId,
    pub object_id: Option<ObjectId>,  // Best matching object inside the document
    pub score: f32,
}

impl ScoredDocument {
    /// Ranking order: higher score first, then lower document ID
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other.score.total_cmp(&self.score)
            .then_with(|| self.doc_id.cmp(&other.doc_id))
    }
}

// Ordering is rank order, so a max-heap keeps the worst hit on top
impl PartialEq for ScoredDocument {
    fn eq(&self, other: &Self) -> bool {
        self.rank_cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredDocument {}

impl PartialOrd for ScoredDocument {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredDocument {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank_cmp(other)
    }
}

/// Vocabulary terms close to a query token that matched nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub token: String,
    pub candidates: Vec<String>,
}

/// Search results container
#[derive(Debug, Clone)]
pub struct SearchResults {
    pub hits: Vec<ScoredDocument>,
    pub status: SearchStatus,
    pub total_hits: usize,
    pub max_score: f32,
    pub unknown_terms: Vec<String>,
    pub suggestions: Vec<Suggestion>,
    pub fallback_used: bool,
    pub took_us: u64,
}

impl SearchResults {
    pub fn empty(status: SearchStatus) -> Self {
        SearchResults {
            hits: Vec::new(),
            status,
            total_hits: 0,
            max_score: 0.0,
            unknown_terms: Vec::new(),
            suggestions: Vec::new(),
            fallback_used: false,
            took_us: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// User facing hint naming the tokens that matched nothing
    pub fn hint(&self) -> Option<String> {
        if self.unknown_terms.is_empty() {
            None
        } else {
            Some(format!("no results for: {}", self.unknown_terms.join(", ")))
        }
    }
}

/// Top-K collector for efficient result collection
pub struct TopKCollector {
    heap: BinaryHeap<ScoredDocument>,
    k: usize,
    total_collected: usize,  // Track total documents processed
}

impl TopKCollector {
    pub fn new(k: usize) -> Self {
        TopKCollector {
            heap: BinaryHeap::with_capacity(k.saturating_add(1).min(1024)),
            k,
            total_collected: 0,
        }
    }

    pub fn collect(&mut self, scored_doc: ScoredDocument) {
        self.total_collected += 1;

        if self.k == 0 {
            return;
        }
        if self.heap.len() < self.k {
            self.heap.push(scored_doc);
        } else if let Some(worst) = self.heap.peek() {
            if scored_doc < *worst {
                self.heap.pop();
                self.heap.push(scored_doc);
            }
        }
    }

    pub fn total_collected(&self) -> usize {
        self.total_collected
    }

    /// Hits in rank order
    pub fn into_results(self) -> Vec<ScoredDocument> {
        self.heap.into_sorted_vec()
    }
}
