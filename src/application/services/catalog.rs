//! Catalog loading
//!
//! Reads the tree structure and concept documents and validates them into a [`Catalog`].

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Catalog, MathConceptsDocument, TreeStructureDocument};
use crate::infrastructure::traits::FileSystem;

/// Service for loading the concept catalog.
pub struct CatalogService {
    fs: Arc<dyn FileSystem>,
}

impl CatalogService {
    /// Create a new catalog service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load both catalog documents.
    ///
    /// Both must load before anything is rendered; the first failure is returned.
    pub fn load(&self, structure: &Path, concepts: &Path) -> ApplicationResult<Catalog> {
        debug!(
            "load: structure={}, concepts={}",
            structure.display(),
            concepts.display()
        );
        let structure_doc: TreeStructureDocument = self.read_document(structure)?;
        let concepts_doc: MathConceptsDocument = self.read_document(concepts)?;

        let catalog = Catalog::new(structure_doc.tree_structure, concepts_doc.math_concepts)?;
        debug!(
            "load: {} layers, progression={:?}",
            catalog.layers().len(),
            catalog.progression()
        );
        Ok(catalog)
    }

    fn read_document<T: DeserializeOwned>(&self, path: &Path) -> ApplicationResult<T> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::CatalogMissing(path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| ApplicationError::CatalogLoad {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        serde_json::from_str(&content).map_err(|e| ApplicationError::CatalogLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
