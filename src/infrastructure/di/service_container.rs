//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::{CatalogService, ConceptTree, ProgressStore};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::infrastructure::traits::{Clock, FileSystem, RealFileSystem, SystemClock};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Clock abstraction
    pub clock: Arc<dyn Clock>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem), Arc::new(SystemClock))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>, clock: Arc<dyn Clock>) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            clock,
        }
    }

    pub fn catalog_service(&self) -> CatalogService {
        CatalogService::new(Arc::clone(&self.fs))
    }

    pub fn progress_store(&self) -> ProgressStore {
        ProgressStore::new(
            Arc::clone(&self.fs),
            Arc::clone(&self.clock),
            self.settings.progress_file.clone(),
        )
    }

    /// Load the catalog, then progress, and assemble the session context.
    pub fn concept_tree(&self) -> ApplicationResult<ConceptTree> {
        let catalog = self
            .catalog_service()
            .load(&self.settings.structure_path(), &self.settings.concepts_path())?;
        let policy = self.settings.progression.policy(catalog.progression());
        debug!("concept_tree: policy={:?}", policy);
        Ok(ConceptTree::new(
            catalog,
            policy,
            self.settings.layout.engine(),
            self.progress_store(),
        ))
    }
}
