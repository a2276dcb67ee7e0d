use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use chrono::{DateTime, Utc};
use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use crate::compression::compress::{CompressedBlock, CompressionType};
use crate::core::config::AnalyzerConfig;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{Document, EnvVersion, ObjectRef, SnapshotId, TermId};
use crate::index::posting::{PostingIndex, PostingList};
use crate::index::registry::DocumentRegistry;
use crate::index::term_store::TermStore;
use crate::mvcc::snapshot::Snapshot;

/// Fixed-size header in front of every snapshot file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub version: u32,     // Format version
    pub compression: CompressionType,
    pub checksum: u32,    // CRC32 of the stored payload
    pub payload_len: u64,
}

impl SnapshotHeader {
    pub const MAGIC: &'static [u8; 4] = b"DSIX";
    pub const SIZE: usize = 21; // magic + version + compression + checksum + length

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(Self::MAGIC);
        bytes[4..8].copy_from_slice(&self.version.to_le_bytes());
        bytes[8] = self.compression.as_u8();
        bytes[9..13].copy_from_slice(&self.checksum.to_le_bytes());
        bytes[13..21].copy_from_slice(&self.payload_len.to_le_bytes());
        bytes
    }

    /// Parse the header, rejecting other formats and other format versions
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(Error::new(
                ErrorKind::Corrupted,
                format!("snapshot file too short: {} bytes", bytes.len()),
            ));
        }
        if &bytes[0..4] != Self::MAGIC {
            return Err(Error::new(ErrorKind::Corrupted, "not a snapshot file (bad magic)"));
        }

        let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if version != Snapshot::FORMAT_VERSION {
            return Err(Error::new(
                ErrorKind::IncompatibleSnapshotVersion,
                format!("snapshot format version {} is not supported (expected {})",
                        version, Snapshot::FORMAT_VERSION),
            ));
        }

        let mut len_buf = [0u8; 8];
        len_buf.copy_from_slice(&bytes[13..21]);

        Ok(SnapshotHeader {
            version,
            compression: CompressionType::from_u8(bytes[8])?,
            checksum: u32::from_le_bytes([bytes[9], bytes[10], bytes[11], bytes[12]]),
            payload_len: u64::from_le_bytes(len_buf),
        })
    }
}

#[derive(Serialize)]
struct SnapshotBodyRef<'a> {
    id: SnapshotId,
    env: &'a EnvVersion,
    built_at: DateTime<Utc>,
    analysis: &'a AnalyzerConfig,
    terms: &'a [String],
    surfaces: Vec<(&'a str, TermId)>,
    postings: &'a [PostingList],
    documents: &'a [Document],
    objects: &'a [ObjectRef],
}

#[derive(Deserialize)]
struct SnapshotBody {
    id: SnapshotId,
    env: EnvVersion,
    built_at: DateTime<Utc>,
    analysis: AnalyzerConfig,
    terms: Vec<String>,
    surfaces: Vec<(String, TermId)>,
    postings: Vec<PostingList>,
    documents: Vec<Document>,
    objects: Vec<ObjectRef>,
}

impl Snapshot {
    // [ HEADER (magic, version, compression, checksum, length) ] <- byte 0
    // [ PAYLOAD (bincode body, optionally LZ4) ]
    pub fn encode(&self, compression: CompressionType) -> Result<Vec<u8>> {
        let body = SnapshotBodyRef {
            id: self.id,
            env: &self.env,
            built_at: self.built_at,
            analysis: self.terms.analysis(),
            terms: self.terms.terms(),
            surfaces: self.terms.surfaces().collect(),
            postings: self.postings.lists(),
            documents: self.registry.documents(),
            objects: self.registry.objects(),
        };
        let data = bincode::serialize(&body)?;
        let block = CompressedBlock::compress(&data, compression);

        let mut hasher = Hasher::new();
        hasher.update(&block.data);

        let header = SnapshotHeader {
            version: self.format_version,
            compression,
            checksum: hasher.finalize(),
            payload_len: block.data.len() as u64,
        };

        let mut bytes = Vec::with_capacity(SnapshotHeader::SIZE + block.data.len());
        bytes.extend_from_slice(&header.to_bytes());
        bytes.extend_from_slice(&block.data);
        Ok(bytes)
    }

    pub fn decode(bytes: &[u8]) -> Result<Snapshot> {
        let header = SnapshotHeader::parse(bytes)?;
        let payload = &bytes[SnapshotHeader::SIZE..];

        if payload.len() as u64 != header.payload_len {
            return Err(Error::new(
                ErrorKind::Corrupted,
                format!("payload is {} bytes, header says {}", payload.len(), header.payload_len),
            ));
        }

        let mut hasher = Hasher::new();
        hasher.update(payload);
        let actual = hasher.finalize();
        if actual != header.checksum {
            return Err(Error::new(
                ErrorKind::Corrupted,
                format!("checksum mismatch: expected {:08x}, got {:08x}", header.checksum, actual),
            ));
        }

        let data = CompressedBlock::decompress(payload, header.compression)?;
        let body: SnapshotBody = bincode::deserialize(&data)?;
        Self::from_body(header.version, body)
    }

    fn from_body(format_version: u32, body: SnapshotBody) -> Result<Snapshot> {
        let required = EnvVersion::current();
        if let Some((domain, expected, found)) = body.env.first_mismatch(&required) {
            return Err(Error::new(
                ErrorKind::IncompatibleSnapshotVersion,
                format!("domain '{}' is at version {:?}, expected {}", domain, found, expected),
            ));
        }

        if body.postings.len() > body.terms.len() {
            return Err(Error::new(
                ErrorKind::Corrupted,
                format!("{} posting lists for {} terms", body.postings.len(), body.terms.len()),
            ));
        }

        let doc_count = body.documents.len();
        for list in &body.postings {
            for posting in &list.postings {
                let valid_doc = (posting.doc_id.0 as usize) < doc_count;
                let valid_object = posting.object_id.is_none_or(|object_id| {
                    body.objects.get(object_id.0 as usize)
                        .is_some_and(|object| object.doc_id == posting.doc_id)
                });
                if !valid_doc || !valid_object {
                    return Err(Error::new(
                        ErrorKind::Corrupted,
                        format!("posting references unknown document {} / object {:?}",
                                posting.doc_id.0, posting.object_id),
                    ));
                }
            }
        }

        let terms = TermStore::from_terms(&body.analysis, body.terms, body.surfaces)?;
        let postings = PostingIndex::from_lists(body.postings)?;
        let registry = DocumentRegistry::from_parts(body.documents, body.objects)?;

        Ok(Snapshot {
            id: body.id,
            format_version,
            env: body.env,
            built_at: body.built_at,
            terms,
            postings,
            registry,
        })
    }

    /// Write to a temp file next to `path`, then rename over it
    pub fn save(&self, path: impl AsRef<Path>, compression: CompressionType) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.encode(compression)?;
        let tmp = temp_path(path);

        {
            let mut file = File::create(&tmp)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, path)?;

        info!(
            snapshot = %self.id,
            path = %path.display(),
            bytes = bytes.len(),
            ?compression,
            "saved snapshot"
        );
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Snapshot> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        debug!(path = %path.display(), bytes = bytes.len(), "loading snapshot");

        let snapshot = Self::decode(&bytes)?;
        info!(
            snapshot = %snapshot.id,
            documents = snapshot.doc_count(),
            terms = snapshot.term_count(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
