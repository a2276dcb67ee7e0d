use chrono::{DateTime, Utc};
use crate::analysis::analyzer::Analyzer;
use crate::core::config::AnalyzerConfig;
use crate::core::types::{EnvVersion, SnapshotId};
use crate::index::posting::PostingIndex;
use crate::index::registry::DocumentRegistry;
use crate::index::term_store::TermStore;

/// Immutable, versioned bundle of term store, posting index and document
/// registry. Shared between readers as `Arc<Snapshot>`.
#[derive(Debug)]
pub struct Snapshot {
    pub(crate) id: SnapshotId,
    pub(crate) format_version: u32,
    pub(crate) env: EnvVersion,
    pub(crate) built_at: DateTime<Utc>,
    pub(crate) terms: TermStore,
    pub(crate) postings: PostingIndex,
    pub(crate) registry: DocumentRegistry,
}

impl Snapshot {
    pub const FORMAT_VERSION: u32 = 1;

    pub(crate) fn new(
        env: EnvVersion,
        terms: TermStore,
        postings: PostingIndex,
        registry: DocumentRegistry,
    ) -> Self {
        Snapshot {
            id: SnapshotId::new(),
            format_version: Self::FORMAT_VERSION,
            env,
            built_at: Utc::now(),
            terms,
            postings,
            registry,
        }
    }

    pub fn id(&self) -> SnapshotId {
        self.id
    }

    pub fn format_version(&self) -> u32 {
        self.format_version
    }

    pub fn env(&self) -> &EnvVersion {
        &self.env
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn terms(&self) -> &TermStore {
        &self.terms
    }

    pub fn postings(&self) -> &PostingIndex {
        &self.postings
    }

    pub fn registry(&self) -> &DocumentRegistry {
        &self.registry
    }

    /// Analyzer that produced this snapshot's vocabulary
    pub fn analyzer(&self) -> &Analyzer {
        self.terms.analyzer()
    }

    pub fn analysis(&self) -> &AnalyzerConfig {
        self.terms.analysis()
    }

    pub fn doc_count(&self) -> usize {
        self.registry.len()
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }
}
