use crate::analysis::filter::TokenFilter;
use crate::analysis::filters::lowercase::LowercaseFilter;
use crate::analysis::filters::stemmer::StemmerFilter;
use crate::analysis::filters::stopword::StopWordFilter;
use crate::analysis::token::Token;
use crate::analysis::tokenizer::{StandardTokenizer, Tokenizer};
use crate::core::config::AnalyzerConfig;
use crate::core::error::{Error, ErrorKind, Result};

/// Text analysis pipeline
pub struct Analyzer {
    pub tokenizer: Box<dyn Tokenizer>,
    pub filters: Vec<Box<dyn TokenFilter>>,
    pub name: String,
}

impl Analyzer {
    pub fn new(name: String, tokenizer: Box<dyn Tokenizer>) -> Self {
        Analyzer {
            tokenizer,
            filters: Vec::new(),
            name,
        }
    }

    pub fn add_filter(mut self, filter: Box<dyn TokenFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Build the analyzer described by a snapshot's normalization policy
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        let mut analyzer = Analyzer::new(
            "standard_english".to_string(),
            Box::new(StandardTokenizer::new(config.max_token_length)),
        )
        .add_filter(Box::new(LowercaseFilter));

        if config.stop_words {
            analyzer = analyzer.add_filter(Box::new(StopWordFilter::english()));
        }
        if config.stemming {
            analyzer = analyzer.add_filter(Box::new(StemmerFilter::english()));
        }
        analyzer
    }

    pub fn analyze(&self, text: &str) -> Vec<Token> {
        let mut tokens = self.tokenizer.tokenize(text);

        for filter in &self.filters {
            tokens = filter.filter(tokens);
        }

        tokens
    }

    /// Normalize a single term: tokenizer split, case folding and stemming.
    /// Stop-word removal is not applied, so every word has a normal form.
    pub fn normalize_term(&self, raw: &str) -> Result<String> {
        let mut tokens = self.tokenizer.tokenize(raw);
        if tokens.len() != 1 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("'{}' does not normalize to a single term ({} tokens)", raw, tokens.len()),
            ));
        }

        for filter in self.filters.iter().filter(|f| f.is_normalizing()) {
            tokens = filter.filter(tokens);
        }

        tokens.pop()
            .map(|token| token.text)
            .ok_or_else(|| Error::new(
                ErrorKind::InvalidInput,
                format!("'{}' normalizes to an empty term", raw),
            ))
    }
}
