use std::cmp::Ordering;
use serde::{Serialize, Deserialize};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{DocId, ObjectId, TermId};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub object_id: Option<ObjectId>,  // None = document-level occurrence
    pub weight: f32,
}

impl Posting {
    pub fn new(doc_id: DocId, object_id: Option<ObjectId>, weight: f32) -> Self {
        Posting { doc_id, object_id, weight }
    }

    /// Sort key: document first, document-level before object-level
    pub fn key(&self) -> (DocId, Option<ObjectId>) {
        (self.doc_id, self.object_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOp {
    And,
    Or,
}

/// Posting list for a term
/// Note: Sorted by (doc_id, object_id), one entry per pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostingList {
    pub postings: Vec<Posting>,
}

impl PostingList {
    pub fn new() -> Self {
        PostingList {
            postings: Vec::new(),
        }
    }

    /// Insert keeping the sort order; a repeated (doc, object) pair accumulates weight
    pub fn add_posting(&mut self, posting: Posting) {
        // Build appends in document order, so the tail is the common case
        if let Some(last) = self.postings.last_mut() {
            match last.key().cmp(&posting.key()) {
                Ordering::Less => {
                    self.postings.push(posting);
                    return;
                }
                Ordering::Equal => {
                    last.weight += posting.weight;
                    return;
                }
                Ordering::Greater => {}
            }
        }

        match self.postings.binary_search_by_key(&posting.key(), |p| p.key()) {
            Ok(pos) => self.postings[pos].weight += posting.weight,
            Err(pos) => self.postings.insert(pos, posting),
        }
    }

    pub fn as_slice(&self) -> &[Posting] {
        &self.postings
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Number of distinct documents in the list
    pub fn doc_freq(&self) -> u32 {
        let mut count = 0;
        let mut last = None;
        for posting in &self.postings {
            if last != Some(posting.doc_id) {
                count += 1;
                last = Some(posting.doc_id);
            }
        }
        count
    }

    pub fn is_sorted(&self) -> bool {
        is_strictly_sorted(&self.postings)
    }
}

pub fn is_strictly_sorted(postings: &[Posting]) -> bool {
    postings.windows(2).all(|pair| pair[0].key() < pair[1].key())
}

pub fn is_valid_weight(weight: f32) -> bool {
    weight.is_finite() && weight >= 0.0
}

/// Linear merge of two sorted lists in O(|a| + |b|).
///
/// `And` keeps pairs present in both lists, `Or` is the duplicate-free union.
/// Pairs found in both carry the summed weight.
pub fn merge(a: &[Posting], b: &[Posting], op: MergeOp) -> Vec<Posting> {
    match op {
        MergeOp::And if a.is_empty() || b.is_empty() => return Vec::new(),
        MergeOp::Or if a.is_empty() => return b.to_vec(),
        MergeOp::Or if b.is_empty() => return a.to_vec(),
        _ => {}
    }

    let mut result = Vec::with_capacity(match op {
        MergeOp::And => a.len().min(b.len()),
        MergeOp::Or => a.len() + b.len(),
    });
    let mut i = 0;
    let mut j = 0;

    while i < a.len() && j < b.len() {
        match a[i].key().cmp(&b[j].key()) {
            Ordering::Equal => {
                result.push(Posting {
                    weight: a[i].weight + b[j].weight,
                    ..a[i]
                });
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                if op == MergeOp::Or {
                    result.push(a[i]);
                }
                i += 1;
            }
            Ordering::Greater => {
                if op == MergeOp::Or {
                    result.push(b[j]);
                }
                j += 1;
            }
        }
    }

    if op == MergeOp::Or {
        result.extend_from_slice(&a[i..]);
        result.extend_from_slice(&b[j..]);
    }

    result
}

/// Project a sorted list to document granularity: one posting per
/// document, no object, weights summed.
pub fn collapse_to_documents(postings: &[Posting]) -> Vec<Posting> {
    let mut result: Vec<Posting> = Vec::new();

    for posting in postings {
        match result.last_mut() {
            Some(last) if last.doc_id == posting.doc_id => last.weight += posting.weight,
            _ => result.push(Posting::new(posting.doc_id, None, posting.weight)),
        }
    }

    result
}

/// Term ID -> posting list, dense over the term store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostingIndex {
    lists: Vec<PostingList>,
}

impl PostingIndex {
    pub fn new() -> Self {
        PostingIndex { lists: Vec::new() }
    }

    pub(crate) fn from_lists(lists: Vec<PostingList>) -> Result<Self> {
        if let Some(pos) = lists.iter().position(|list| !list.is_sorted()) {
            return Err(Error::new(
                ErrorKind::Corrupted,
                format!("posting list for term {} is not sorted", pos),
            ));
        }
        for (pos, list) in lists.iter().enumerate() {
            if let Some(posting) = list.postings.iter().find(|p| !is_valid_weight(p.weight)) {
                return Err(Error::new(
                    ErrorKind::Corrupted,
                    format!("posting list for term {} has invalid weight {}", pos, posting.weight),
                ));
            }
        }
        Ok(PostingIndex { lists })
    }

    pub fn add_posting(
        &mut self,
        term: TermId,
        doc_id: DocId,
        object_id: Option<ObjectId>,
        weight: f32,
    ) -> Result<()> {
        if !is_valid_weight(weight) {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("posting weight must be finite and non-negative, got {}", weight),
            ));
        }

        let idx = term.0 as usize;
        if idx >= self.lists.len() {
            self.lists.resize_with(idx + 1, PostingList::new);
        }
        self.lists[idx].add_posting(Posting::new(doc_id, object_id, weight));
        Ok(())
    }

    /// All postings for a term, sorted by (document, object); empty when none
    pub fn postings_for(&self, term: TermId) -> &[Posting] {
        self.lists.get(term.0 as usize)
            .map(PostingList::as_slice)
            .unwrap_or(&[])
    }

    pub fn merge(a: &[Posting], b: &[Posting], op: MergeOp) -> Vec<Posting> {
        merge(a, b, op)
    }

    pub fn lists(&self) -> &[PostingList] {
        &self.lists
    }

    pub fn term_count(&self) -> usize {
        self.lists.len()
    }

    pub fn total_postings(&self) -> usize {
        self.lists.iter().map(PostingList::len).sum()
    }
}
