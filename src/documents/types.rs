//! Core types for workspace documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

/// Entity category assigned to a document from its containing directory.
///
/// The mapping is fixed and case-sensitive: the first directory under the
/// workspace root decides the type, and anything unmapped (or a path outside
/// the root entirely) is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Project,
    Epic,
    Decision,
    Risk,
    Meeting,
    Person,
    Log,
    Unknown,
}

impl EntityType {
    /// Classify a document path by its first path segment under `root`.
    ///
    /// Total and pure: never fails. Paths outside `root`, paths directly in
    /// `root`, and unmapped directory names all come back as `Unknown`.
    pub fn classify(path: &Path, root: &Path) -> Self {
        let Ok(relative) = path.strip_prefix(root) else {
            return Self::Unknown;
        };
        match relative.components().next() {
            Some(Component::Normal(first)) => first
                .to_str()
                .map_or(Self::Unknown, Self::from_directory),
            _ => Self::Unknown,
        }
    }

    /// Map a top-level directory name to its entity type.
    pub fn from_directory(name: &str) -> Self {
        match name {
            "projects" => Self::Project,
            "epics" => Self::Epic,
            "decisions" => Self::Decision,
            "risks" => Self::Risk,
            "meetings" => Self::Meeting,
            "people" => Self::Person,
            "logs" => Self::Log,
            _ => Self::Unknown,
        }
    }

    /// Lowercase tag used in synthesized ids and stored records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Epic => "epic",
            Self::Decision => "decision",
            Self::Risk => "risk",
            Self::Meeting => "meeting",
            Self::Person => "person",
            Self::Log => "log",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project" => Ok(Self::Project),
            "epic" => Ok(Self::Epic),
            "decision" => Ok(Self::Decision),
            "risk" => Ok(Self::Risk),
            "meeting" => Ok(Self::Meeting),
            "person" => Ok(Self::Person),
            "log" => Ok(Self::Log),
            "unknown" => Ok(Self::Unknown),
            other => Err(format!(
                "unknown entity type '{other}' (expected project, epic, decision, risk, meeting, person, log, or unknown)"
            )),
        }
    }
}

/// A fully indexed workspace document.
///
/// Invariants maintained by the indexer: `path` and `id` are each unique
/// across the index, and `id` is deterministic: the `id` attribute when the
/// document declares one, else `{type}:{filename-stem}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier used for lookups and search-collaborator calls.
    pub id: String,

    /// Source path under the workspace root.
    pub path: PathBuf,

    /// Category derived from the containing directory.
    pub entity_type: EntityType,

    /// Explicit `title` attribute, else the first `# ` heading, else the
    /// filename stem.
    pub title: String,

    /// Optional `owner` attribute.
    pub owner: Option<String>,

    /// Optional `status` attribute.
    pub status: Option<String>,

    /// Raw file content, attribute block included.
    pub content: String,

    /// The parsed attribute block. Recognized keys are also lifted into the
    /// fields above; unrecognized keys pass through untouched.
    pub attributes: Map<String, Value>,

    /// When this path was first indexed. Preserved across re-upserts.
    pub indexed_at: DateTime<Utc>,

    /// Refreshed on every upsert of this path.
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Listing row for this document, body omitted.
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            id: self.id.clone(),
            path: self.path.clone(),
            entity_type: self.entity_type,
            title: self.title.clone(),
            owner: self.owner.clone(),
            status: self.status.clone(),
            updated_at: self.updated_at,
        }
    }
}

/// Compact listing record: everything callers need to render an overview,
/// with the body left out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: String,
    pub path: PathBuf,
    pub entity_type: EntityType,
    pub title: String,
    pub owner: Option<String>,
    pub status: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_directories() {
        let root = Path::new("/workspace");
        assert_eq!(
            EntityType::classify(Path::new("/workspace/projects/alpha.md"), root),
            EntityType::Project
        );
        assert_eq!(
            EntityType::classify(Path::new("/workspace/risks/x.md"), root),
            EntityType::Risk
        );
        assert_eq!(
            EntityType::classify(Path::new("/workspace/decisions/adr-001.md"), root),
            EntityType::Decision
        );
        assert_eq!(
            EntityType::classify(Path::new("/workspace/people/dana.md"), root),
            EntityType::Person
        );
    }

    #[test]
    fn test_classify_nested_path_uses_first_segment() {
        let root = Path::new("/workspace");
        assert_eq!(
            EntityType::classify(Path::new("/workspace/epics/2026/q1/search.md"), root),
            EntityType::Epic
        );
    }

    #[test]
    fn test_classify_unmapped_directory_is_unknown() {
        let root = Path::new("/workspace");
        assert_eq!(
            EntityType::classify(Path::new("/workspace/unknown_dir/x.md"), root),
            EntityType::Unknown
        );
    }

    #[test]
    fn test_classify_outside_root_is_unknown() {
        let root = Path::new("/workspace");
        assert_eq!(
            EntityType::classify(Path::new("/elsewhere/risks/x.md"), root),
            EntityType::Unknown
        );
    }

    #[test]
    fn test_classify_file_directly_under_root_is_unknown() {
        let root = Path::new("/workspace");
        assert_eq!(
            EntityType::classify(Path::new("/workspace/notes.md"), root),
            EntityType::Unknown
        );
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        let root = Path::new("/workspace");
        assert_eq!(
            EntityType::classify(Path::new("/workspace/Projects/alpha.md"), root),
            EntityType::Unknown
        );
    }

    #[test]
    fn test_entity_type_tag_roundtrip() {
        for entity_type in [
            EntityType::Project,
            EntityType::Epic,
            EntityType::Decision,
            EntityType::Risk,
            EntityType::Meeting,
            EntityType::Person,
            EntityType::Log,
            EntityType::Unknown,
        ] {
            assert_eq!(entity_type.as_str().parse::<EntityType>(), Ok(entity_type));
        }
    }

    #[test]
    fn test_entity_type_parse_rejects_garbage() {
        assert!("sprint".parse::<EntityType>().is_err());
        assert!("Project".parse::<EntityType>().is_err());
    }
}
