//! Unlock evaluation
//!
//! Status is derived on every call from the catalog, the learner's progress and the
//! policy. Nothing here is cached: editing thresholds can lock an `Available` concept
//! again, but a completed concept always stays `Completed`.

use std::fmt;

use serde::Serialize;

use crate::domain::{Catalog, LayerId, Progress, ProgressionPolicy};

/// Derived state of a concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Completed,
    Available,
    Locked,
}

impl Status {
    /// Label shown next to the concept.
    pub fn label(self) -> &'static str {
        match self {
            Status::Completed => "Completed ✓",
            Status::Available => "Available",
            Status::Locked => "Locked 🔒",
        }
    }

    /// Style class of the node.
    pub fn class(self) -> &'static str {
        match self {
            Status::Completed => "completed",
            Status::Available => "available",
            Status::Locked => "locked",
        }
    }

    /// Whether the learner may open or complete the concept.
    pub fn is_interactive(self) -> bool {
        !matches!(self, Status::Locked)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Status of `concept_id` in `layer`.
pub fn status(
    concept_id: &str,
    layer: &LayerId,
    catalog: &Catalog,
    progress: &Progress,
    policy: &ProgressionPolicy,
) -> Status {
    if progress.is_completed(concept_id) {
        Status::Completed
    } else if is_unlocked(layer, catalog, progress, policy) {
        Status::Available
    } else {
        Status::Locked
    }
}

/// Whether concepts of `layer` are open, ignoring their own completion.
pub fn is_unlocked(
    layer: &LayerId,
    catalog: &Catalog,
    progress: &Progress,
    policy: &ProgressionPolicy,
) -> bool {
    if !policy.unlock_system_enabled {
        return true;
    }
    if *layer == LayerId::Roots {
        return true;
    }
    if !policy.prerequisite_check_enabled {
        return true;
    }
    match layer {
        LayerId::Trunk => catalog.completed_in(&LayerId::Roots, progress) >= policy.trunk_threshold,
        LayerId::Branches => {
            catalog.completed_in(&LayerId::Trunk, progress) >= policy.branches_threshold
        }
        _ => false,
    }
}

/// Tracker colouring of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrackerState {
    NotStarted,
    InProgress,
    Finished,
}

/// Completion count of a layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerProgress {
    pub layer: LayerId,
    pub completed: usize,
    pub total: usize,
    pub state: TrackerState,
}

impl fmt::Display for LayerProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.completed, self.total)
    }
}

pub fn layer_progress(catalog: &Catalog, progress: &Progress, layer: &LayerId) -> LayerProgress {
    let total = catalog.concepts(layer).len();
    let completed = catalog.completed_in(layer, progress);
    let state = if completed == 0 {
        TrackerState::NotStarted
    } else if completed == total {
        TrackerState::Finished
    } else {
        TrackerState::InProgress
    };
    LayerProgress {
        layer: layer.clone(),
        completed,
        total,
        state,
    }
}
