//! Progression policy: unlock switches and tier thresholds

use serde::{Deserialize, Serialize};

use crate::domain::Progression;

/// Completed roots needed before trunk concepts open up.
pub const DEFAULT_TRUNK_THRESHOLD: usize = 4;
/// Completed trunk concepts needed before branches open up.
pub const DEFAULT_BRANCHES_THRESHOLD: usize = 6;

/// Rules the unlock evaluator applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionPolicy {
    /// When off, every concept is available.
    pub unlock_system_enabled: bool,
    /// When off, only the unlock system switch matters; roots are always open.
    pub prerequisite_check_enabled: bool,
    pub trunk_threshold: usize,
    pub branches_threshold: usize,
}

impl Default for ProgressionPolicy {
    fn default() -> Self {
        Self {
            unlock_system_enabled: true,
            prerequisite_check_enabled: true,
            trunk_threshold: DEFAULT_TRUNK_THRESHOLD,
            branches_threshold: DEFAULT_BRANCHES_THRESHOLD,
        }
    }
}

impl ProgressionPolicy {
    /// Policy from the structure document's switches and default thresholds.
    pub fn from_progression(progression: Progression) -> Self {
        Self {
            unlock_system_enabled: progression.unlock_system,
            prerequisite_check_enabled: progression.prerequisite_check,
            ..Self::default()
        }
    }

    pub fn with_thresholds(mut self, trunk: usize, branches: usize) -> Self {
        self.trunk_threshold = trunk;
        self.branches_threshold = branches;
        self
    }

    /// Policy with gating switched off entirely.
    pub fn open() -> Self {
        Self {
            unlock_system_enabled: false,
            ..Self::default()
        }
    }
}
