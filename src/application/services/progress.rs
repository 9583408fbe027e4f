//! Progress store
//!
//! One JSON record per learner. Loading never fails: a missing or damaged record
//! yields fresh progress, so a corrupt file cannot keep the tree from rendering.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::Progress;
use crate::infrastructure::traits::{Clock, FileSystem};

/// Loads, updates and persists learner progress.
pub struct ProgressStore {
    fs: Arc<dyn FileSystem>,
    clock: Arc<dyn Clock>,
    path: PathBuf,
}

impl ProgressStore {
    pub fn new(fs: Arc<dyn FileSystem>, clock: Arc<dyn Clock>, path: PathBuf) -> Self {
        Self { fs, clock, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted record, falling back to empty progress.
    pub fn load(&self) -> Progress {
        debug!("load: path={}", self.path.display());
        if !self.fs.exists(&self.path) {
            debug!("load: no saved progress, starting fresh");
            return Progress::new(self.clock.now());
        }
        let content = match self.fs.read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Failed to read saved progress {}: {}", self.path.display(), e);
                return Progress::new(self.clock.now());
            }
        };
        match serde_json::from_str::<Progress>(&content) {
            Ok(progress) => {
                debug!("load: {} completed concepts", progress.completed.len());
                progress
            }
            Err(e) => {
                warn!("Failed to parse saved progress {}: {}", self.path.display(), e);
                Progress::new(self.clock.now())
            }
        }
    }

    /// Completed copy of `progress`; unchanged if `concept_id` is already done.
    pub fn mark_complete(&self, progress: &Progress, concept_id: &str) -> Progress {
        progress.mark_complete(concept_id, self.clock.now())
    }

    /// Write the full record.
    pub fn persist(&self, progress: &Progress) -> ApplicationResult<()> {
        debug!(
            "persist: path={}, completed={}",
            self.path.display(),
            progress.completed.len()
        );
        let json =
            serde_json::to_string_pretty(progress).map_err(|e| ApplicationError::OperationFailed {
                context: "serialize progress".to_string(),
                source: Box::new(e),
            })?;
        self.fs
            .ensure_parent(&self.path)
            .with_path_context("create progress directory", &self.path)?;
        self.fs
            .write(&self.path, &json)
            .with_path_context("write progress", &self.path)?;
        Ok(())
    }
}
