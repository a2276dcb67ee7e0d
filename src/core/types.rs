use std::collections::BTreeMap;
use std::fmt;
use serde::{Serialize, Deserialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TermId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocId(pub u32);

/// Dense across the whole snapshot, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotId(pub Uuid);

impl SnapshotId {
    pub fn new() -> Self {
        SnapshotId(Uuid::new_v4())
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of a named API entity inside a documentation page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectKind {
    Class,
    Attribute,
    Method,
    Module,
    Function,
    Enum,
    EnumMember,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 7] = [
        ObjectKind::Class,
        ObjectKind::Attribute,
        ObjectKind::Method,
        ObjectKind::Module,
        ObjectKind::Function,
        ObjectKind::Enum,
        ObjectKind::EnumMember,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Class => "class",
            ObjectKind::Attribute => "attribute",
            ObjectKind::Method => "method",
            ObjectKind::Module => "module",
            ObjectKind::Function => "function",
            ObjectKind::Enum => "enum",
            ObjectKind::EnumMember => "enum-member",
        }
    }

    /// Human readable label shown next to object hits
    pub fn label(&self) -> &'static str {
        match self {
            ObjectKind::Class => "Class",
            ObjectKind::Attribute => "Attribute",
            ObjectKind::Method => "Method",
            ObjectKind::Module => "Module",
            ObjectKind::Function => "Function",
            ObjectKind::Enum => "Enumeration",
            ObjectKind::EnumMember => "Enumeration member",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub anchor: String,
}

/// Search priority of an object, scaling the weight of its name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectPriority {
    Important,
    #[default]
    Normal,
    Unimportant,
}

impl ObjectPriority {
    pub fn factor(&self) -> f32 {
        match self {
            ObjectPriority::Important => 1.5,
            ObjectPriority::Normal => 1.0,
            ObjectPriority::Unimportant => 0.5,
        }
    }
}

/// Named object entry as supplied by the documentation pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObject {
    pub name: String,
    pub kind: ObjectKind,
    #[serde(default)]
    pub anchor: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: ObjectPriority,
}

impl RawObject {
    pub fn new(name: &str, kind: ObjectKind) -> Self {
        RawObject {
            name: name.to_string(),
            kind,
            anchor: None,
            description: None,
            priority: ObjectPriority::Normal,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_priority(mut self, priority: ObjectPriority) -> Self {
        self.priority = priority;
        self
    }
}

/// One corpus page before indexing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub title: String,
    pub path: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub objects: Vec<RawObject>,
}

impl RawDocument {
    pub fn new(title: &str, path: &str, body: &str) -> Self {
        RawDocument {
            title: title.to_string(),
            path: path.to_string(),
            body: body.to_string(),
            sections: Vec::new(),
            objects: Vec::new(),
        }
    }

    pub fn add_section(mut self, title: &str, anchor: &str) -> Self {
        self.sections.push(Section {
            title: title.to_string(),
            anchor: anchor.to_string(),
        });
        self
    }

    pub fn add_object(mut self, object: RawObject) -> Self {
        self.objects.push(object);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    pub path: String,
    pub sections: Vec<Section>,
    pub objects: Vec<ObjectId>,  // Declaration order
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
    pub doc_id: DocId,
    pub anchor: Option<String>,
    pub description: Option<String>,
    pub priority: ObjectPriority,
}

/// Versions of the analysis and object domains that produced a snapshot.
/// Only consulted for compatibility, never for ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVersion(BTreeMap<String, u32>);

impl EnvVersion {
    pub const ANALYSIS_DOMAIN: &'static str = "docsearch.analysis";
    pub const OBJECTS_DOMAIN: &'static str = "docsearch.objects";

    pub fn new() -> Self {
        EnvVersion(BTreeMap::new())
    }

    /// Domains this build of the engine reads and writes
    pub fn current() -> Self {
        EnvVersion::new()
            .with(Self::ANALYSIS_DOMAIN, 1)
            .with(Self::OBJECTS_DOMAIN, 1)
    }

    pub fn with(mut self, domain: &str, version: u32) -> Self {
        self.0.insert(domain.to_string(), version);
        self
    }

    pub fn get(&self, domain: &str) -> Option<u32> {
        self.0.get(domain).copied()
    }

    /// Every domain in `required` must be present with the same version.
    /// Extra domains are ignored.
    pub fn is_compatible_with(&self, required: &EnvVersion) -> bool {
        required.0.iter()
            .all(|(domain, version)| self.0.get(domain) == Some(version))
    }

    /// First domain whose version differs from `required`
    pub fn first_mismatch<'a>(&self, required: &'a EnvVersion) -> Option<(&'a str, u32, Option<u32>)> {
        required.0.iter()
            .find(|(domain, version)| self.0.get(*domain) != Some(*version))
            .map(|(domain, version)| (domain.as_str(), *version, self.get(domain)))
    }
}
