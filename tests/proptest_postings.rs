//! Property-based tests for posting-list invariants and term normalization.

use std::collections::{BTreeMap, BTreeSet};
use proptest::prelude::*;
use docsearch::core::config::AnalyzerConfig;
use docsearch::core::types::{DocId, ObjectId};
use docsearch::index::posting::{is_strictly_sorted, merge, MergeOp, Posting, PostingList};
use docsearch::index::term_store::TermStore;

type Key = (u32, Option<u32>);

fn arb_posting() -> impl Strategy<Value = Posting> {
    (0u32..40, prop::option::of(0u32..6), 0u32..20).prop_map(|(doc, object, weight)| {
        Posting::new(DocId(doc), object.map(ObjectId), weight as f32 * 0.5)
    })
}

fn arb_list() -> impl Strategy<Value = Vec<Posting>> {
    prop::collection::vec(arb_posting(), 0..60).prop_map(|postings| {
        let mut list = PostingList::new();
        for posting in postings {
            list.add_posting(posting);
        }
        list.postings
    })
}

fn key_weights(postings: &[Posting]) -> BTreeMap<Key, f32> {
    postings.iter()
        .map(|p| ((p.doc_id.0, p.object_id.map(|o| o.0)), p.weight))
        .collect()
}

proptest! {
    #[test]
    fn posting_list_is_always_sorted(postings in prop::collection::vec(arb_posting(), 0..80)) {
        let mut list = PostingList::new();
        for posting in &postings {
            list.add_posting(*posting);
            prop_assert!(list.is_sorted());
        }

        let distinct: BTreeSet<Key> = postings.iter()
            .map(|p| (p.doc_id.0, p.object_id.map(|o| o.0)))
            .collect();
        prop_assert_eq!(list.len(), distinct.len());
    }

    #[test]
    fn merge_and_keeps_exactly_the_common_pairs(a in arb_list(), b in arb_list()) {
        let result = merge(&a, &b, MergeOp::And);
        prop_assert!(is_strictly_sorted(&result));

        let left = key_weights(&a);
        let right = key_weights(&b);
        let expected: BTreeSet<Key> = left.keys().filter(|k| right.contains_key(*k)).copied().collect();
        let actual: BTreeSet<Key> = key_weights(&result).keys().copied().collect();
        prop_assert_eq!(actual, expected);

        for (key, weight) in key_weights(&result) {
            prop_assert_eq!(weight, left[&key] + right[&key]);
        }
    }

    #[test]
    fn merge_or_is_duplicate_free_union(a in arb_list(), b in arb_list()) {
        let result = merge(&a, &b, MergeOp::Or);
        prop_assert!(is_strictly_sorted(&result));

        let left = key_weights(&a);
        let right = key_weights(&b);
        let expected: BTreeSet<Key> = left.keys().chain(right.keys()).copied().collect();
        prop_assert_eq!(result.len(), expected.len());

        for (key, weight) in key_weights(&result) {
            let want = left.get(&key).copied().unwrap_or(0.0) + right.get(&key).copied().unwrap_or(0.0);
            prop_assert_eq!(weight, want);
        }
    }

    #[test]
    fn merge_is_symmetric_in_keys(a in arb_list(), b in arb_list()) {
        for op in [MergeOp::And, MergeOp::Or] {
            let ab: Vec<Key> = key_weights(&merge(&a, &b, op)).into_keys().collect();
            let ba: Vec<Key> = key_weights(&merge(&b, &a, op)).into_keys().collect();
            prop_assert_eq!(ab, ba);
        }
    }

    #[test]
    fn resolve_of_intern_is_normalized_term(raw in "[A-Za-z][A-Za-z0-9_]{0,15}") {
        let mut store = TermStore::new(&AnalyzerConfig::default());
        let normalized = store.analyzer().normalize_term(&raw);

        match normalized {
            Ok(normalized) => {
                let id = store.intern(&raw).unwrap();
                prop_assert_eq!(store.resolve(id).unwrap(), normalized.as_str());
                prop_assert_eq!(store.lookup(&raw), Some(id));
            }
            Err(_) => prop_assert!(store.intern(&raw).is_err()),
        }
    }
}
