//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::LayerId;

/// Domain errors represent violations of catalog or progression rules.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown concept: {0}")]
    UnknownConcept(String),

    #[error("concept is locked: {id} ({layer} prerequisites not met)")]
    ConceptLocked { id: String, layer: LayerId },

    #[error("duplicate concept id in catalog: {0}")]
    DuplicateConcept(String),
}
