pub mod core;
pub mod analysis;
pub mod index;
pub mod compression;
pub mod storage;
pub mod mvcc;
pub mod writer;
pub mod search;
pub mod query;

/*
┌──────────────────────────────────────────────────────────────────────────────┐
│                         DOCSEARCH STRUCT ARCHITECTURE                         │
└──────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────── BUILD SIDE ──────────────────────────────────┐
│                                                                               │
│  Vec<RawDocument> ──► IndexBuilder::build() ──► Snapshot                      │
│  (writer::corpus)     • one pass, one thread                                  │
│                       • Analyzer: StandardTokenizer → Lowercase               │
│                         → StopWord → Stemmer                                  │
│                       • FieldWeights: title > object name > section > body    │
│                                                                               │
│  ┌────────────────────────── struct Snapshot ─────────────────────────────┐  │
│  │ id: SnapshotId (uuid)        env: EnvVersion      built_at: DateTime   │  │
│  │ terms: TermStore        term ↔ TermId, frozen into an fst::Map         │  │
│  │ postings: PostingIndex  TermId → [Posting{doc, object?, weight}]       │  │
│  │                         sorted by (doc, object)                        │  │
│  │ registry: DocumentRegistry  DocId → Document, ObjectId → ObjectRef     │  │
│  └────────────────────────────────────────────────────────────────────────┘  │
│                                                                               │
│  storage::snapshot_file   [DSIX | version | compression | crc32 | len]       │
│                           [bincode body, lz4_flex]                            │
└───────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────── QUERY SIDE ──────────────────────────────────┐
│                                                                               │
│  SnapshotPublisher { ArcSwapOption<Snapshot> }   publish = one pointer swap   │
│        │ current()                                                            │
│        ▼                                                                      │
│  QueryEngine { Arc<Snapshot>, QueryConfig, Option<QueryCache> }               │
│     search("lens distortion")                                                 │
│       1. analyze with the snapshot's own analyzer                             │
│       2. resolve tokens, record unknown ones (+ fuzzy suggestions)            │
│       3. collapse postings per document, merge AND                            │
│       4. empty AND → OR fallback (FallbackPolicy::OrOnEmpty)                  │
│       5. score = Σ weights, TopKCollector (score desc, doc asc)               │
│     → SearchResults { hits, status, unknown_terms, fallback_used, .. }        │
└───────────────────────────────────────────────────────────────────────────────┘
*/
