use docsearch::analysis::analyzer::Analyzer;
use docsearch::analysis::tokenizer::{StandardTokenizer, Tokenizer};
use docsearch::core::config::AnalyzerConfig;
use docsearch::core::error::ErrorKind;

fn texts(analyzer: &Analyzer, text: &str) -> Vec<String> {
    analyzer.analyze(text).into_iter().map(|t| t.text).collect()
}

#[test]
fn test_tokenizer_splits_dotted_names_and_keeps_identifiers() {
    let tokenizer = StandardTokenizer::default();
    let tokens = tokenizer.tokenize("lensfunpy.Camera crop_factor, (POLY3)!");
    let words: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();

    assert_eq!(words, vec!["lensfunpy", "Camera", "crop_factor", "POLY3"]);
    assert_eq!(tokens.iter().map(|t| t.position).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
}

#[test]
fn test_tokenizer_offsets_point_into_original_text() {
    let text = "Lens  the.Camera";
    let tokens = StandardTokenizer::default().tokenize(text);

    for token in &tokens {
        assert_eq!(&text[token.offset..token.offset + token.length], token.text);
    }
    assert_eq!(tokens[2].text, "Camera");
    assert_eq!(tokens[2].offset, 10);
}

#[test]
fn test_tokenizer_drops_overlong_tokens() {
    let tokenizer = StandardTokenizer::new(4);
    let tokens = tokenizer.tokenize("lens distortion tca");
    let words: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();

    assert_eq!(words, vec!["lens", "tca"]);
}

#[test]
fn test_analyzer_lowercases_removes_stop_words_and_stems() {
    let analyzer = Analyzer::from_config(&AnalyzerConfig::default());

    assert_eq!(texts(&analyzer, "Running the CAMERAS"), vec!["run", "camera"]);
}

#[test]
fn test_analyzer_without_stemming_or_stop_words() {
    let config = AnalyzerConfig {
        stemming: false,
        stop_words: false,
        ..AnalyzerConfig::default()
    };
    let analyzer = Analyzer::from_config(&config);

    assert_eq!(texts(&analyzer, "Running the CAMERAS"), vec!["running", "the", "cameras"]);
}

#[test]
fn test_normalize_term_matches_analyzer_output() {
    let analyzer = Analyzer::from_config(&AnalyzerConfig::default());

    let normalized = analyzer.normalize_term("Distortion").unwrap();
    assert_eq!(texts(&analyzer, "distortion"), vec![normalized.clone()]);
    assert_eq!(analyzer.normalize_term("DISTORTION!").unwrap(), normalized);
}

#[test]
fn test_normalize_term_keeps_stop_words() {
    let analyzer = Analyzer::from_config(&AnalyzerConfig::default());

    assert_eq!(analyzer.normalize_term("The").unwrap(), "the");
    assert!(analyzer.analyze("The").is_empty());
}

#[test]
fn test_normalize_term_rejects_multi_token_and_empty_input() {
    let analyzer = Analyzer::from_config(&AnalyzerConfig::default());

    let err = analyzer.normalize_term("lens.camera").unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);

    let err = analyzer.normalize_term("  ...  ").unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);
}
