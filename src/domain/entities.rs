//! Domain entities: catalog documents, layers and learner progress

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::DomainError;

/// Progression tier of the tree.
///
/// Structure documents may name layers beyond the three known tiers; those are kept
/// as `Other` so they can still be listed, but they never unlock.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LayerId {
    Roots,
    Trunk,
    Branches,
    Other(String),
}

impl LayerId {
    pub fn as_str(&self) -> &str {
        match self {
            LayerId::Roots => "roots",
            LayerId::Trunk => "trunk",
            LayerId::Branches => "branches",
            LayerId::Other(id) => id.as_str(),
        }
    }

    /// Human readable name, used when the structure document carries none.
    pub fn title(&self) -> String {
        let mut chars = self.as_str().chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl From<&str> for LayerId {
    fn from(value: &str) -> Self {
        match value {
            "roots" => LayerId::Roots,
            "trunk" => LayerId::Trunk,
            "branches" => LayerId::Branches,
            other => LayerId::Other(other.to_string()),
        }
    }
}

impl From<String> for LayerId {
    fn from(value: String) -> Self {
        LayerId::from(value.as_str())
    }
}

impl From<LayerId> for String {
    fn from(value: LayerId) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single learning topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Grade band, e.g. "K-1" or "3"
    #[serde(default, deserialize_with = "string_or_number")]
    pub grade_level: String,
    /// Video duration as displayed, e.g. "5 min"
    #[serde(default, deserialize_with = "string_or_number")]
    pub duration: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub video_url: String,
}

/// Accept `"3"` as well as `3` for free-form metadata fields.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// Layer entry of the tree structure document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Layer {
    pub fn new(id: LayerId) -> Self {
        Self {
            id,
            name: None,
            description: None,
        }
    }

    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.title())
    }
}

/// Progression switches carried by the structure document.
///
/// Absent switches read as `false`, which disables gating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progression {
    #[serde(default)]
    pub unlock_system: bool,
    #[serde(default)]
    pub prerequisite_check: bool,
}

/// Tree topology: ordered layers plus progression switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStructure {
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub progression: Progression,
}

/// `tree-structure.json` envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeStructureDocument {
    pub tree_structure: TreeStructure,
}

/// `math-concepts.json` envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MathConceptsDocument {
    pub math_concepts: BTreeMap<LayerId, Vec<Concept>>,
}

/// Validated concept catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    structure: TreeStructure,
    concepts: BTreeMap<LayerId, Vec<Concept>>,
}

impl Catalog {
    /// Build a catalog, rejecting concept ids that occur more than once.
    pub fn new(
        structure: TreeStructure,
        concepts: BTreeMap<LayerId, Vec<Concept>>,
    ) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for concept in concepts.values().flatten() {
            if !seen.insert(concept.id.as_str()) {
                return Err(DomainError::DuplicateConcept(concept.id.clone()));
            }
        }
        Ok(Self {
            structure,
            concepts,
        })
    }

    pub fn structure(&self) -> &TreeStructure {
        &self.structure
    }

    pub fn layers(&self) -> &[Layer] {
        &self.structure.layers
    }

    pub fn progression(&self) -> Progression {
        self.structure.progression
    }

    /// Concepts of a layer in catalog order; empty for unknown layers.
    pub fn concepts(&self, layer: &LayerId) -> &[Concept] {
        self.concepts.get(layer).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Locate a concept and the layer it belongs to.
    pub fn find(&self, concept_id: &str) -> Option<(&LayerId, &Concept)> {
        self.concepts.iter().find_map(|(layer, concepts)| {
            concepts
                .iter()
                .find(|c| c.id == concept_id)
                .map(|c| (layer, c))
        })
    }

    /// Number of concepts of `layer` that appear in the completed set.
    pub fn completed_in(&self, layer: &LayerId, progress: &Progress) -> usize {
        self.concepts(layer)
            .iter()
            .filter(|c| progress.is_completed(&c.id))
            .count()
    }
}

/// Learner progress as persisted between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    #[serde(default)]
    pub completed: BTreeSet<String>,
    /// Reserved for a favorites feature; carried through unchanged.
    #[serde(default)]
    pub favorites: BTreeSet<String>,
    #[serde(default = "Utc::now")]
    pub last_accessed: DateTime<Utc>,
}

impl Progress {
    /// Empty progress stamped with `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            completed: BTreeSet::new(),
            favorites: BTreeSet::new(),
            last_accessed: now,
        }
    }

    pub fn is_completed(&self, concept_id: &str) -> bool {
        self.completed.contains(concept_id)
    }

    /// Return progress with `concept_id` completed.
    ///
    /// Already completed ids leave the progress untouched, including the timestamp.
    pub fn mark_complete(&self, concept_id: &str, now: DateTime<Utc>) -> Self {
        if self.is_completed(concept_id) {
            return self.clone();
        }
        let mut next = self.clone();
        next.completed.insert(concept_id.to_string());
        next.last_accessed = now;
        next
    }
}
