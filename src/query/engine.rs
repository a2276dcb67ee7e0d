use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;
use crate::core::config::{FallbackPolicy, QueryConfig};
use crate::core::error::Result;
use crate::core::types::{DocId, Document, ObjectId, ObjectRef};
use crate::index::posting::{collapse_to_documents, merge, MergeOp, Posting};
use crate::mvcc::snapshot::Snapshot;
use crate::query::cache::{CacheStats, QueryCache, QueryKey};
use crate::search::results::{ScoredDocument, SearchResults, SearchStatus, Suggestion, TopKCollector};

/// Answers free-text queries against one immutable snapshot.
///
/// The engine owns its `Arc<Snapshot>`, so results stay consistent with that
/// snapshot even after a newer one has been published.
pub struct QueryEngine {
    snapshot: Arc<Snapshot>,
    config: QueryConfig,
    cache: Option<QueryCache>,
}

impl QueryEngine {
    pub fn new(snapshot: Arc<Snapshot>, config: QueryConfig) -> Self {
        let cache = QueryCache::new(config.cache_capacity);
        QueryEngine { snapshot, config, cache }
    }

    pub fn snapshot(&self) -> &Arc<Snapshot> {
        &self.snapshot
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn search(&self, raw_query: &str) -> SearchResults {
        self.search_with_limit(raw_query, self.config.default_limit)
    }

    pub fn search_with_limit(&self, raw_query: &str, limit: usize) -> SearchResults {
        let key = QueryKey {
            query: raw_query.to_string(),
            limit,
        };
        if let Some(cached) = self.cache.as_ref().and_then(|cache| cache.get(&key)) {
            return cached;
        }

        let started = Instant::now();
        let mut results = self.execute(raw_query, limit);
        results.took_us = started.elapsed().as_micros() as u64;

        if let Some(cache) = &self.cache {
            cache.put(key, results.clone());
        }
        results
    }

    /// Document and matched object behind a hit
    pub fn resolve_hit(&self, hit: &ScoredDocument) -> Result<(&Document, Option<&ObjectRef>)> {
        let registry = self.snapshot.registry();
        let document = registry.get(hit.doc_id)?;
        let object = hit.object_id
            .map(|id| registry.object(id))
            .transpose()?;
        Ok((document, object))
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(QueryCache::stats)
    }

    fn execute(&self, raw_query: &str, limit: usize) -> SearchResults {
        let tokens = self.snapshot.analyzer().analyze(raw_query);

        let mut seen = HashSet::new();
        let mut matched: Vec<Vec<Posting>> = Vec::new();
        let mut unknown = Vec::new();
        let mut suggestions = Vec::new();

        for token in tokens {
            if !seen.insert(token.text.clone()) {
                continue;
            }
            match self.resolve_token(&token.text) {
                Some(postings) => matched.push(postings),
                None => {
                    let surface = raw_query
                        .get(token.offset..token.offset + token.length)
                        .unwrap_or(&token.text);
                    if let Some(suggestion) = self.suggest(surface, &token.text) {
                        suggestions.push(suggestion);
                    }
                    unknown.push(surface.to_string());
                }
            }
        }

        if matched.is_empty() {
            debug!(query = raw_query, unknown = ?unknown, "no query term in vocabulary");
            let mut results = SearchResults::empty(SearchStatus::NoMatchingTerms);
            results.unknown_terms = unknown;
            results.suggestions = suggestions;
            return results;
        }

        let doc_lists: Vec<Vec<Posting>> = matched.iter()
            .map(|postings| collapse_to_documents(postings))
            .collect();

        let mut combined = combine(&doc_lists, MergeOp::And);
        let mut fallback_used = false;
        if combined.is_empty()
            && doc_lists.len() > 1
            && self.config.fallback == FallbackPolicy::OrOnEmpty
        {
            combined = combine(&doc_lists, MergeOp::Or);
            fallback_used = true;
            debug!(query = raw_query, hits = combined.len(), "AND found nothing, fell back to OR");
        }

        let best_objects = best_objects(&matched);
        let mut collector = TopKCollector::new(limit);
        for posting in &combined {
            collector.collect(ScoredDocument {
                doc_id: posting.doc_id,
                object_id: best_objects.get(&posting.doc_id).map(|(id, _)| *id),
                score: posting.weight,
            });
        }

        let hits = collector.into_results();
        SearchResults {
            status: if combined.is_empty() { SearchStatus::NoResults } else { SearchStatus::Matched },
            total_hits: combined.len(),
            max_score: hits.first().map(|hit| hit.score).unwrap_or(0.0),
            hits,
            unknown_terms: unknown,
            suggestions,
            fallback_used,
            took_us: 0,
        }
    }

    /// Object-level postings for an analyzed token, or None if it matches nothing
    fn resolve_token(&self, term: &str) -> Option<Vec<Posting>> {
        let terms = self.snapshot.terms();
        let postings = self.snapshot.postings();

        if let Some(id) = terms.lookup_normalized(term) {
            return Some(postings.postings_for(id).to_vec());
        }

        if !self.config.prefix_expansion || term.chars().count() < self.config.min_prefix_len {
            return None;
        }

        let expansions = terms.prefix_matches(term);
        if expansions.is_empty() {
            return None;
        }

        let factor = self.config.partial_match_factor;
        let expanded = expansions.iter()
            .map(|id| {
                postings.postings_for(*id).iter()
                    .map(|p| Posting::new(p.doc_id, p.object_id, p.weight * factor))
                    .collect::<Vec<_>>()
            })
            .fold(Vec::new(), |acc, list| merge(&acc, &list, MergeOp::Or));

        debug!(prefix = term, expansions = expansions.len(), "expanded query prefix");
        Some(expanded)
    }

    fn suggest(&self, surface: &str, term: &str) -> Option<Suggestion> {
        let word = surface.to_lowercase();
        let length = word.chars().count();
        if self.config.max_suggestions == 0 || length < 3 {
            return None;
        }

        // One edit for short words, otherwise up to the configured distance
        let distance = if length <= 4 {
            self.config.suggestion_distance.min(1)
        } else {
            self.config.suggestion_distance
        };

        // Corpus spellings first, then stems; one candidate per term
        let terms = self.snapshot.terms();
        let mut seen = HashSet::new();
        let mut scored: Vec<(u8, String)> = Vec::new();
        for (candidate, id, d) in terms.fuzzy_surface_matches(&word, distance) {
            if seen.insert(id) {
                scored.push((d, candidate));
            }
        }
        for (id, d) in terms.fuzzy_matches(term, distance) {
            if seen.insert(id) {
                if let Ok(stem) = terms.resolve(id) {
                    scored.push((d, stem.to_string()));
                }
            }
        }
        scored.sort_by(|a, b| a.0.cmp(&b.0));

        let candidates: Vec<String> = scored.into_iter()
            .take(self.config.max_suggestions)
            .map(|(_, candidate)| candidate)
            .collect();

        if candidates.is_empty() {
            None
        } else {
            Some(Suggestion {
                token: surface.to_string(),
                candidates,
            })
        }
    }
}

impl fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("QueryEngine")
            .field("snapshot", &self.snapshot.id())
            .field("config", &self.config)
            .field("cache", &self.cache_stats())
            .finish()
    }
}

/// Fold sorted lists with one operator, smallest lists first
fn combine(lists: &[Vec<Posting>], op: MergeOp) -> Vec<Posting> {
    let mut ordered: Vec<&Vec<Posting>> = lists.iter().collect();
    ordered.sort_by_key(|list| list.len());

    let mut iter = ordered.into_iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };

    let mut combined = first.clone();
    for list in iter {
        if op == MergeOp::And && combined.is_empty() {
            break;
        }
        combined = merge(&combined, list, op);
    }
    combined
}

/// Heaviest matched object per document; ties go to the earlier object
fn best_objects(matched: &[Vec<Posting>]) -> HashMap<DocId, (ObjectId, f32)> {
    let union = matched.iter()
        .fold(Vec::new(), |acc, list| merge(&acc, list, MergeOp::Or));

    let mut best: HashMap<DocId, (ObjectId, f32)> = HashMap::new();
    for posting in union {
        let Some(object_id) = posting.object_id else {
            continue;
        };
        best.entry(posting.doc_id)
            .and_modify(|current| {
                if posting.weight > current.1 {
                    *current = (object_id, posting.weight);
                }
            })
            .or_insert((object_id, posting.weight));
    }
    best
}
