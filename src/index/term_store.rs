use std::collections::{BTreeMap, HashMap};
use std::fmt;
use fst::{IntoStreamer, Map, MapBuilder, Streamer};
use crate::analysis::analyzer::Analyzer;
use crate::core::config::AnalyzerConfig;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::TermId;
use crate::search::fuzzy::FuzzyAutomaton;

/// Vocabulary of normalized terms with dense, first-seen IDs.
///
/// Terms are interned while a snapshot is being built; `freeze` then builds
/// an FST over the vocabulary for prefix and fuzzy enumeration.
///
/// The unstemmed, lowercased spellings seen in the corpus are kept next to
/// the vocabulary so misspellings can be matched against real words.
pub struct TermStore {
    analyzer: Analyzer,
    analysis: AnalyzerConfig,
    terms: Vec<String>,
    ids: HashMap<String, TermId>,
    surfaces: BTreeMap<String, TermId>,
    fst: Map<Vec<u8>>,
    surface_fst: Map<Vec<u8>>,
    frozen: bool,
}

impl TermStore {
    pub fn new(analysis: &AnalyzerConfig) -> Self {
        TermStore {
            analyzer: Analyzer::from_config(analysis),
            analysis: analysis.clone(),
            terms: Vec::new(),
            ids: HashMap::new(),
            surfaces: BTreeMap::new(),
            fst: Map::default(),
            surface_fst: Map::default(),
            frozen: false,
        }
    }

    /// Rebuild a frozen store from terms listed in ID order and their surface spellings
    pub fn from_terms(
        analysis: &AnalyzerConfig,
        terms: Vec<String>,
        surfaces: Vec<(String, TermId)>,
    ) -> Result<Self> {
        let mut store = TermStore::new(analysis);
        for term in terms {
            let expected = TermId(store.terms.len() as u32);
            if store.intern_normalized(&term)? != expected {
                return Err(Error::new(
                    ErrorKind::Corrupted,
                    format!("duplicate term '{}' in vocabulary", term),
                ));
            }
        }
        for (surface, id) in surfaces {
            if id.0 as usize >= store.terms.len() {
                return Err(Error::new(
                    ErrorKind::Corrupted,
                    format!("surface '{}' points at unknown term {}", surface, id.0),
                ));
            }
            store.surfaces.insert(surface, id);
        }
        store.freeze()?;
        Ok(store)
    }

    /// Normalize `term` and return its ID, assigning the next one if new
    pub fn intern(&mut self, term: &str) -> Result<TermId> {
        let normalized = self.analyzer.normalize_term(term)?;
        self.intern_normalized(&normalized)
    }

    /// Intern a term that already went through the analyzer
    pub(crate) fn intern_normalized(&mut self, term: &str) -> Result<TermId> {
        if let Some(id) = self.ids.get(term) {
            return Ok(*id);
        }
        if self.frozen {
            return Err(Error::new(
                ErrorKind::InvalidState,
                format!("cannot intern '{}' into a frozen term store", term),
            ));
        }

        let id = TermId(self.terms.len() as u32);
        self.terms.push(term.to_string());
        self.ids.insert(term.to_string(), id);
        Ok(id)
    }

    /// Intern an analyzed token and remember the spelling it came from
    pub(crate) fn intern_token(&mut self, surface: &str, normalized: &str) -> Result<TermId> {
        let id = self.intern_normalized(normalized)?;
        if !self.frozen {
            self.surfaces.entry(surface.to_lowercase()).or_insert(id);
        }
        Ok(id)
    }

    pub fn resolve(&self, id: TermId) -> Result<&str> {
        self.terms.get(id.0 as usize)
            .map(String::as_str)
            .ok_or_else(|| Error::new(
                ErrorKind::UnknownTerm,
                format!("term id {} not in store of {} terms", id.0, self.terms.len()),
            ))
    }

    /// Normalize `term` and find its ID without mutating the store
    pub fn lookup(&self, term: &str) -> Option<TermId> {
        let normalized = self.analyzer.normalize_term(term).ok()?;
        self.lookup_normalized(&normalized)
    }

    pub(crate) fn lookup_normalized(&self, term: &str) -> Option<TermId> {
        self.ids.get(term).copied()
    }

    pub fn freeze(&mut self) -> Result<()> {
        let mut sorted: Vec<(&str, TermId)> = self.ids.iter()
            .map(|(term, id)| (term.as_str(), *id))
            .collect();

        // FST requires sorted input
        sorted.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let mut builder = MapBuilder::memory();
        for (term, id) in sorted {
            builder.insert(term.as_bytes(), id.0 as u64)?;
        }
        self.fst = builder.into_map();

        let mut builder = MapBuilder::memory();
        for (surface, id) in &self.surfaces {
            builder.insert(surface.as_bytes(), id.0 as u64)?;
        }
        self.surface_fst = builder.into_map();

        self.frozen = true;
        Ok(())
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Terms starting with `prefix`, in lexicographic order
    pub fn prefix_matches(&self, prefix: &str) -> Vec<TermId> {
        let mut results = Vec::new();
        let prefix_bytes = prefix.as_bytes();
        let mut stream = self.fst.range().ge(prefix_bytes).into_stream();

        while let Some((term_bytes, id)) = stream.next() {
            if !term_bytes.starts_with(prefix_bytes) {
                break;
            }
            results.push(TermId(id as u32));
        }

        results
    }

    /// Terms within `max_distance` edits of `term`, closest first
    pub fn fuzzy_matches(&self, term: &str, max_distance: u8) -> Vec<(TermId, u8)> {
        let mut matches: Vec<(TermId, u8)> = fuzzy_search(&self.fst, term, max_distance)
            .into_iter()
            .map(|(_, id, distance)| (id, distance))
            .collect();

        matches.sort_by_key(|(id, distance)| (*distance, *id));
        matches
    }

    /// Corpus spellings within `max_distance` edits of a lowercased word,
    /// closest first, with the term each one was indexed under
    pub fn fuzzy_surface_matches(&self, word: &str, max_distance: u8) -> Vec<(String, TermId, u8)> {
        let mut matches = fuzzy_search(&self.surface_fst, word, max_distance);
        matches.sort_by(|a, b| a.2.cmp(&b.2).then_with(|| a.0.cmp(&b.0)));
        matches
    }

    /// Surface spellings in lexicographic order
    pub fn surfaces(&self) -> impl Iterator<Item = (&str, TermId)> {
        self.surfaces.iter().map(|(surface, id)| (surface.as_str(), *id))
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    pub fn analysis(&self) -> &AnalyzerConfig {
        &self.analysis
    }

    /// Terms in ID order
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn iter(&self) -> impl Iterator<Item = (TermId, &str)> {
        self.terms.iter()
            .enumerate()
            .map(|(idx, term)| (TermId(idx as u32), term.as_str()))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

fn fuzzy_search(map: &Map<Vec<u8>>, word: &str, max_distance: u8) -> Vec<(String, TermId, u8)> {
    let automaton = FuzzyAutomaton::new(word, max_distance);
    let mut matches = Vec::new();
    let mut stream = map.search(&automaton).into_stream();

    while let Some((bytes, id)) = stream.next() {
        let candidate = String::from_utf8_lossy(bytes);
        if let Some(distance) = automaton.distance(&candidate) {
            matches.push((candidate.into_owned(), TermId(id as u32), distance));
        }
    }
    matches
}

impl fmt::Debug for TermStore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TermStore")
            .field("analysis", &self.analysis)
            .field("terms", &self.terms.len())
            .field("surfaces", &self.surfaces.len())
            .field("frozen", &self.frozen)
            .finish()
    }
}
