use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};
use crate::core::config::{AnalyzerConfig, Config, FieldWeights};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{DocId, EnvVersion, ObjectId, RawDocument};
use crate::index::posting::PostingIndex;
use crate::index::registry::DocumentRegistry;
use crate::index::term_store::TermStore;
use crate::mvcc::snapshot::Snapshot;

/// Coarse-grained cancellation, checked between documents
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        CancelFlag::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Single-pass, single-threaded corpus ingestion into an immutable snapshot
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    analysis: AnalyzerConfig,
    weights: FieldWeights,
    env: EnvVersion,
}

/// Mutable stores for one build; dropped unless the build completes
struct BuildState<'a> {
    weights: &'a FieldWeights,
    terms: TermStore,
    postings: PostingIndex,
    registry: DocumentRegistry,
}

impl BuildState<'_> {
    fn index_text(
        &mut self,
        text: &str,
        doc_id: DocId,
        object_id: Option<ObjectId>,
        weight: f32,
    ) -> Result<usize> {
        let tokens = self.terms.analyzer().analyze(text);
        for token in &tokens {
            let surface = text.get(token.offset..token.offset + token.length).unwrap_or(&token.text);
            let term = self.terms.intern_token(surface, &token.text)?;
            self.postings.add_posting(term, doc_id, object_id, weight)?;
        }
        Ok(tokens.len())
    }

    fn index_document(&mut self, raw: &RawDocument) -> Result<DocId> {
        let doc_id = self.registry.register(raw)?;
        let weights = self.weights;
        let mut token_count = 0;

        token_count += self.index_text(&raw.title, doc_id, None, weights.title)?;
        for section in &raw.sections {
            token_count += self.index_text(&section.title, doc_id, None, weights.section)?;
        }
        token_count += self.index_text(&raw.body, doc_id, None, weights.body)?;

        let object_ids = self.registry.get(doc_id)?.objects.clone();
        for (object_id, raw_object) in object_ids.into_iter().zip(&raw.objects) {
            let name_weight = weights.object_name * raw_object.priority.factor();
            token_count += self.index_text(&raw_object.name, doc_id, Some(object_id), name_weight)?;
            if let Some(description) = &raw_object.description {
                token_count += self.index_text(
                    description, doc_id, Some(object_id), weights.object_description)?;
            }
        }

        debug!(doc = doc_id.0, path = %raw.path, tokens = token_count, "indexed document");
        Ok(doc_id)
    }
}

impl IndexBuilder {
    pub fn new(config: &Config) -> Self {
        IndexBuilder {
            analysis: config.analysis.clone(),
            weights: config.weights.clone(),
            env: EnvVersion::current(),
        }
    }

    /// Record extra domains (e.g. documentation plugins) in the snapshot environment
    pub fn with_env(mut self, domain: &str, version: u32) -> Self {
        self.env = self.env.with(domain, version);
        self
    }

    pub fn build(&self, corpus: &[RawDocument]) -> Result<Snapshot> {
        self.build_with_cancel(corpus, &CancelFlag::new())
    }

    /// Nothing is returned from a cancelled or failed build
    pub fn build_with_cancel(&self, corpus: &[RawDocument], cancel: &CancelFlag) -> Result<Snapshot> {
        if corpus.is_empty() {
            return Err(Error::new(ErrorKind::Build, "corpus is empty"));
        }

        let mut state = BuildState {
            weights: &self.weights,
            terms: TermStore::new(&self.analysis),
            postings: PostingIndex::new(),
            registry: DocumentRegistry::new(),
        };

        for raw in corpus {
            if cancel.is_cancelled() {
                return Err(Error::new(
                    ErrorKind::Cancelled,
                    format!("build cancelled after {} of {} documents",
                            state.registry.len(), corpus.len()),
                ));
            }
            state.index_document(raw)?;
        }

        state.terms.freeze()?;

        let snapshot = Snapshot::new(self.env.clone(), state.terms, state.postings, state.registry);
        info!(
            snapshot = %snapshot.id(),
            documents = snapshot.doc_count(),
            objects = snapshot.registry().objects().len(),
            terms = snapshot.term_count(),
            postings = snapshot.postings().total_postings(),
            "index build complete"
        );
        Ok(snapshot)
    }
}

impl Default for IndexBuilder {
    fn default() -> Self {
        IndexBuilder::new(&Config::default())
    }
}
