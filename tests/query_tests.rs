mod common;

use std::sync::Arc;
use docsearch::core::config::{FallbackPolicy, QueryConfig};
use docsearch::core::types::{DocId, ObjectId, ObjectKind};
use docsearch::query::engine::QueryEngine;
use docsearch::search::results::{SearchResults, SearchStatus};

fn engine(corpus: &[docsearch::core::types::RawDocument], config: QueryConfig) -> QueryEngine {
    QueryEngine::new(Arc::new(common::build(corpus)), config)
}

fn paths(engine: &QueryEngine, results: &SearchResults) -> Vec<String> {
    results.hits.iter()
        .map(|hit| engine.resolve_hit(hit).unwrap().0.path.clone())
        .collect()
}

#[test]
fn test_two_term_query_ranks_by_summed_weight() {
    let engine = engine(&common::lens_camera_corpus(), QueryConfig::default());

    let results = engine.search("lens distortion");

    assert_eq!(results.status, SearchStatus::Matched);
    assert_eq!(paths(&engine, &results), vec!["/lens"]);
    assert_eq!(results.hits[0].score, 25.0);
    assert_eq!(results.max_score, 25.0);
    assert!(!results.fallback_used);
}

#[test]
fn test_single_term_query() {
    let engine = engine(&common::lens_camera_corpus(), QueryConfig::default());

    let results = engine.search("Camera");

    assert_eq!(paths(&engine, &results), vec!["/camera"]);
    assert_eq!(results.hits[0].score, 20.0);
}

#[test]
fn test_unknown_terms_only_is_not_an_error() {
    let engine = engine(&common::lens_camera_corpus(), QueryConfig::default());

    let results = engine.search("Zzqx");

    assert_eq!(results.status, SearchStatus::NoMatchingTerms);
    assert!(results.is_empty());
    assert_eq!(results.unknown_terms, vec!["Zzqx"]);
    assert_eq!(results.hint().as_deref(), Some("no results for: Zzqx"));
}

#[test]
fn test_empty_and_stop_word_queries() {
    let engine = engine(&common::lens_camera_corpus(), QueryConfig::default());

    for query in ["", "   ", "the of"] {
        let results = engine.search(query);
        assert_eq!(results.status, SearchStatus::NoMatchingTerms);
        assert!(results.is_empty());
        assert!(results.hint().is_none());
    }
}

#[test]
fn test_unknown_token_does_not_block_known_ones() {
    let engine = engine(&common::lens_camera_corpus(), QueryConfig::default());

    let results = engine.search("zzqx lens");

    assert_eq!(results.status, SearchStatus::Matched);
    assert_eq!(paths(&engine, &results), vec!["/lens"]);
    assert_eq!(results.unknown_terms, vec!["zzqx"]);
}

#[test]
fn test_and_semantics_narrow_results() {
    let engine = engine(&common::api_corpus(), QueryConfig::default());

    let broad = engine.search("calibration");
    assert_eq!(paths(&engine, &broad), vec!["api/lensfunpy.Lens", "api/enums"]);

    let narrow = engine.search("lens calibration");
    assert_eq!(paths(&engine, &narrow), vec!["api/lensfunpy.Lens"]);
    assert!(!narrow.fallback_used);
}

#[test]
fn test_or_fallback_when_no_document_has_every_term() {
    let engine = engine(&common::lens_camera_corpus(), QueryConfig::default());

    let results = engine.search("lens camera");

    assert_eq!(results.status, SearchStatus::Matched);
    assert!(results.fallback_used);
    // Equal scores fall back to document order
    assert_eq!(paths(&engine, &results), vec!["/lens", "/camera"]);
    assert_eq!(results.hits[0].score, results.hits[1].score);
}

#[test]
fn test_no_fallback_policy_reports_no_results() {
    let config = QueryConfig {
        fallback: FallbackPolicy::Never,
        ..QueryConfig::default()
    };
    let engine = engine(&common::lens_camera_corpus(), config);

    let results = engine.search("lens camera");

    assert_eq!(results.status, SearchStatus::NoResults);
    assert!(results.is_empty());
    assert!(!results.fallback_used);
    assert!(results.unknown_terms.is_empty());
}

#[test]
fn test_unknown_token_is_dropped_without_fallback() {
    let config = QueryConfig {
        fallback: FallbackPolicy::Never,
        ..QueryConfig::default()
    };
    let engine = engine(&common::lens_camera_corpus(), config);

    let results = engine.search("zzqx lens");

    assert_eq!(results.status, SearchStatus::Matched);
    assert_eq!(paths(&engine, &results), vec!["/lens"]);
    assert!(!results.fallback_used);
    assert_eq!(results.unknown_terms, vec!["zzqx"]);
}

#[test]
fn test_limit_keeps_best_hits_and_counts_all_matches() {
    let engine = engine(&common::api_corpus(), QueryConfig::default());

    let results = engine.search_with_limit("lensfunpy", 2);

    assert_eq!(results.len(), 2);
    assert_eq!(results.total_hits, 4);
    // Three pages tie on three object names; the lower document IDs win
    assert_eq!(results.hits[0].doc_id, DocId(0));
    assert_eq!(results.hits[1].doc_id, DocId(1));
    assert_eq!(results.max_score, 33.0);

    let none = engine.search_with_limit("lensfunpy", 0);
    assert!(none.is_empty());
    assert_eq!(none.total_hits, 4);
}

#[test]
fn test_hits_point_at_best_matching_object() {
    let engine = engine(&common::api_corpus(), QueryConfig::default());

    let results = engine.search("crop_factor");
    assert_eq!(results.hits[0].object_id, Some(ObjectId(1)));
    assert_eq!(results.hits[1].object_id, Some(ObjectId(5)));

    let (document, object) = engine.resolve_hit(&results.hits[0]).unwrap();
    let object = object.unwrap();
    assert_eq!(document.path, "api/lensfunpy.Camera");
    assert_eq!(object.name, "lensfunpy.Camera.crop_factor");
    assert_eq!(object.kind, ObjectKind::Attribute);
}

#[test]
fn test_best_object_sums_weight_across_query_terms() {
    let engine = engine(&common::api_corpus(), QueryConfig::default());

    let results = engine.search("Camera crop_factor");

    assert_eq!(results.len(), 1);
    assert_eq!(results.hits[0].doc_id, DocId(0));
    assert_eq!(results.hits[0].object_id, Some(ObjectId(1)));
}

#[test]
fn test_document_level_hit_has_no_object() {
    let engine = engine(&common::lens_camera_corpus(), QueryConfig::default());

    let results = engine.search("lens");
    let (_, object) = engine.resolve_hit(&results.hits[0]).unwrap();

    assert_eq!(results.hits[0].object_id, None);
    assert!(object.is_none());
}

#[test]
fn test_repeated_tokens_count_once() {
    let engine = engine(&common::lens_camera_corpus(), QueryConfig::default());

    let once = engine.search("lens");
    let twice = engine.search("lens LENS Lens");

    assert_eq!(once.hits[0].score, twice.hits[0].score);
}

#[test]
fn test_prefix_expansion_is_opt_in() {
    let corpus = common::api_corpus();

    let strict = engine(&corpus, QueryConfig::default());
    assert_eq!(strict.search("interp").status, SearchStatus::NoMatchingTerms);

    let config = QueryConfig {
        prefix_expansion: true,
        ..QueryConfig::default()
    };
    let expanding = engine(&corpus, config);
    let results = expanding.search("interp");

    assert_eq!(results.status, SearchStatus::Matched);
    assert_eq!(paths(&expanding, &results), vec!["api/lensfunpy.Lens"]);
    assert!(results.unknown_terms.is_empty());
}

#[test]
fn test_prefix_expansion_respects_minimum_length() {
    let config = QueryConfig {
        prefix_expansion: true,
        min_prefix_len: 5,
        ..QueryConfig::default()
    };
    let engine = engine(&common::api_corpus(), config);

    assert_eq!(engine.search("int").status, SearchStatus::NoMatchingTerms);
}

#[test]
fn test_suggestions_for_misspelled_tokens() {
    let engine = engine(&common::api_corpus(), QueryConfig::default());

    let results = engine.search("distorsion");

    assert_eq!(results.status, SearchStatus::NoMatchingTerms);
    assert_eq!(results.suggestions.len(), 1);
    assert_eq!(results.suggestions[0].token, "distorsion");
    assert_eq!(results.suggestions[0].candidates[0], "distortion");
}

#[test]
fn test_suggestions_match_corpus_spellings() {
    let engine = engine(&common::api_corpus(), QueryConfig::default());

    for (typo, expected) in [
        ("calibratoin", "calibration"),
        ("calbration", "calibration"),
        ("interpolaton", "interpolation"),
        ("Enumeratoins", "enumerations"),
    ] {
        let results = engine.search(typo);
        assert_eq!(results.status, SearchStatus::NoMatchingTerms, "query {:?}", typo);
        assert_eq!(results.suggestions.len(), 1, "query {:?}", typo);
        assert_eq!(results.suggestions[0].token, typo);
        assert_eq!(results.suggestions[0].candidates[0], expected, "query {:?}", typo);
    }
}

#[test]
fn test_suggestions_keep_one_spelling_per_term() {
    let engine = engine(&common::api_corpus(), QueryConfig::default());

    // "interpolation" and "interpolate" share a stem
    let results = engine.search("interpolaton");
    let candidates = &results.suggestions[0].candidates;

    assert!(!candidates.contains(&"interpolate".to_string()), "{:?}", candidates);
}

#[test]
fn test_suggestions_can_be_disabled() {
    let config = QueryConfig {
        max_suggestions: 0,
        ..QueryConfig::default()
    };
    let engine = engine(&common::api_corpus(), config);

    assert!(engine.search("distorsion").suggestions.is_empty());
}

#[test]
fn test_cache_serves_repeated_queries() {
    let config = QueryConfig {
        cache_capacity: 8,
        ..QueryConfig::default()
    };
    let engine = engine(&common::lens_camera_corpus(), config);

    let first = engine.search("camera");
    let second = engine.search("camera");
    engine.search_with_limit("camera", 1);

    assert_eq!(paths(&engine, &first), paths(&engine, &second));
    let stats = engine.cache_stats().unwrap();
    assert_eq!(stats.hit_count, 1);
    assert_eq!(stats.miss_count, 2);
    assert_eq!(stats.size, 2);
    assert!((stats.hit_rate() - 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_cache_disabled_by_default() {
    let engine = engine(&common::lens_camera_corpus(), QueryConfig::default());
    engine.search("camera");

    assert!(engine.cache_stats().is_none());
}

#[test]
fn test_engine_debug_output() {
    let config = QueryConfig {
        cache_capacity: 4,
        ..QueryConfig::default()
    };
    let engine = engine(&common::lens_camera_corpus(), config);

    let debug = format!("{:?}", engine);

    assert!(debug.starts_with("QueryEngine"));
    assert!(debug.contains(&engine.snapshot().id().to_string()));
    assert!(debug.contains("cache_capacity: 4"));
}
