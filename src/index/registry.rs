use std::collections::HashMap;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{DocId, Document, ObjectId, ObjectRef, RawDocument};

/// Document ID -> page metadata, plus the snapshot-wide object table
#[derive(Debug, Clone, Default)]
pub struct DocumentRegistry {
    documents: Vec<Document>,
    objects: Vec<ObjectRef>,
    paths: HashMap<String, DocId>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        DocumentRegistry::default()
    }

    /// Rebuild from persisted tables, re-checking the ID invariants
    pub(crate) fn from_parts(documents: Vec<Document>, objects: Vec<ObjectRef>) -> Result<Self> {
        let mut paths = HashMap::with_capacity(documents.len());

        for (idx, doc) in documents.iter().enumerate() {
            if doc.id.0 as usize != idx {
                return Err(Error::new(
                    ErrorKind::Corrupted,
                    format!("document at slot {} has id {}", idx, doc.id.0),
                ));
            }
            if paths.insert(doc.path.clone(), doc.id).is_some() {
                return Err(Error::new(
                    ErrorKind::Corrupted,
                    format!("duplicate document path '{}'", doc.path),
                ));
            }
            for object_id in &doc.objects {
                let owned = objects.get(object_id.0 as usize)
                    .is_some_and(|object| object.doc_id == doc.id);
                if !owned {
                    return Err(Error::new(
                        ErrorKind::Corrupted,
                        format!("document {} lists foreign object {}", doc.id.0, object_id.0),
                    ));
                }
            }
        }

        Ok(DocumentRegistry { documents, objects, paths })
    }

    /// Assign the next dense ID to `raw` and record its objects in declaration order
    pub fn register(&mut self, raw: &RawDocument) -> Result<DocId> {
        if raw.path.trim().is_empty() {
            return Err(Error::new(
                ErrorKind::Build,
                format!("document '{}' has an empty path", raw.title),
            ));
        }
        if let Some(existing) = self.paths.get(&raw.path) {
            return Err(Error::new(
                ErrorKind::Build,
                format!("duplicate document path '{}' (already registered as document {})",
                        raw.path, existing.0),
            ));
        }

        let doc_id = DocId(self.documents.len() as u32);
        let mut object_ids = Vec::with_capacity(raw.objects.len());

        for raw_object in &raw.objects {
            let object_id = ObjectId(self.objects.len() as u32);
            self.objects.push(ObjectRef {
                id: object_id,
                name: raw_object.name.clone(),
                kind: raw_object.kind,
                doc_id,
                anchor: raw_object.anchor.clone(),
                description: raw_object.description.clone(),
                priority: raw_object.priority,
            });
            object_ids.push(object_id);
        }

        self.documents.push(Document {
            id: doc_id,
            title: raw.title.clone(),
            path: raw.path.clone(),
            sections: raw.sections.clone(),
            objects: object_ids,
        });
        self.paths.insert(raw.path.clone(), doc_id);

        Ok(doc_id)
    }

    pub fn get(&self, id: DocId) -> Result<&Document> {
        self.documents.get(id.0 as usize)
            .ok_or_else(|| Error::new(
                ErrorKind::UnknownDocument,
                format!("document id {} not in registry of {} documents", id.0, self.documents.len()),
            ))
    }

    /// Objects of a document in declaration order
    pub fn objects_of(&self, id: DocId) -> Result<Vec<&ObjectRef>> {
        let doc = self.get(id)?;
        doc.objects.iter()
            .map(|object_id| self.object(*object_id))
            .collect()
    }

    pub fn object(&self, id: ObjectId) -> Result<&ObjectRef> {
        self.objects.get(id.0 as usize)
            .ok_or_else(|| Error::new(
                ErrorKind::UnknownObject,
                format!("object id {} not in registry of {} objects", id.0, self.objects.len()),
            ))
    }

    pub fn find_by_path(&self, path: &str) -> Option<&Document> {
        self.paths.get(path).map(|id| &self.documents[id.0 as usize])
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn objects(&self) -> &[ObjectRef] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
