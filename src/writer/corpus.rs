use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use crate::core::error::Result;
use crate::core::types::RawDocument;

/// Read a corpus serialized as a JSON array of documents.
///
/// ```json
/// [{"title": "Lens", "path": "/lens", "body": "...",
///   "objects": [{"name": "Lens.crop_factor", "kind": "attribute"}]}]
/// ```
pub fn load_json<R: Read>(reader: R) -> Result<Vec<RawDocument>> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn load_json_file(path: impl AsRef<Path>) -> Result<Vec<RawDocument>> {
    let file = File::open(path)?;
    load_json(BufReader::new(file))
}

pub fn to_json(corpus: &[RawDocument]) -> Result<String> {
    Ok(serde_json::to_string_pretty(corpus)?)
}
