//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, Clock)
//! but are themselves concrete structs, not traits.

mod catalog;
mod concept_tree;
mod progress;

pub use catalog::CatalogService;
pub use concept_tree::{CompletionOutcome, ConceptDetail, ConceptNode, ConceptTree, LayerView};
pub use progress::ProgressStore;
