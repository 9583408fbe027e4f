//! Tests for CatalogService

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use tapmath::application::services::CatalogService;
use tapmath::application::ApplicationError;
use tapmath::domain::{DomainError, LayerId};
use tapmath::infrastructure::traits::RealFileSystem;

fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write catalog document");
    path
}

const STRUCTURE: &str = r#"{
  "treeStructure": {
    "layers": [{ "id": "roots" }, { "id": "trunk" }],
    "progression": { "unlockSystem": true, "prerequisiteCheck": true }
  }
}"#;

fn service() -> CatalogService {
    CatalogService::new(Arc::new(RealFileSystem))
}

#[test]
fn given_bundled_catalog_when_loading_then_has_three_layers_of_concepts() {
    let dir = data_dir();

    let catalog = service()
        .load(
            &dir.join("tree-structure.json"),
            &dir.join("math-concepts.json"),
        )
        .expect("bundled catalog loads");

    let ids: Vec<&LayerId> = catalog.layers().iter().map(|l| &l.id).collect();
    assert_eq!(ids, [&LayerId::Roots, &LayerId::Trunk, &LayerId::Branches]);
    assert_eq!(catalog.concepts(&LayerId::Roots).len(), 6);
    assert_eq!(catalog.concepts(&LayerId::Trunk).len(), 8);
    assert_eq!(catalog.concepts(&LayerId::Branches).len(), 10);
    assert!(catalog.progression().unlock_system);
    assert!(catalog.progression().prerequisite_check);
}

#[test]
fn given_missing_concepts_document_when_loading_then_reports_missing_path() {
    let temp = TempDir::new().unwrap();
    let structure = write(&temp, "tree-structure.json", STRUCTURE);
    let concepts = temp.path().join("math-concepts.json");

    let err = service().load(&structure, &concepts).unwrap_err();

    assert!(matches!(err, ApplicationError::CatalogMissing(p) if p == concepts));
}

#[test]
fn given_malformed_json_when_loading_then_reports_load_failure() {
    let temp = TempDir::new().unwrap();
    let structure = write(&temp, "tree-structure.json", STRUCTURE);
    let concepts = write(&temp, "math-concepts.json", r#"{"mathConcepts": {"roots": ["#);

    let err = service().load(&structure, &concepts).unwrap_err();

    match err {
        ApplicationError::CatalogLoad { path, message } => {
            assert_eq!(path, concepts);
            assert!(!message.is_empty());
        }
        other => panic!("expected CatalogLoad, got {other:?}"),
    }
}

#[test]
fn given_duplicate_ids_across_layers_when_loading_then_rejects_catalog() {
    let temp = TempDir::new().unwrap();
    let structure = write(&temp, "tree-structure.json", STRUCTURE);
    let concepts = write(
        &temp,
        "math-concepts.json",
        r#"{
  "mathConcepts": {
    "roots": [{ "id": "counting", "title": "Counting" }],
    "trunk": [{ "id": "counting", "title": "Counting again" }]
  }
}"#,
    );

    let err = service().load(&structure, &concepts).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::DuplicateConcept(id)) if id == "counting"
    ));
}

#[test]
fn given_structure_without_progression_when_loading_then_switches_are_off() {
    let temp = TempDir::new().unwrap();
    let structure = write(
        &temp,
        "tree-structure.json",
        r#"{"treeStructure": {"layers": [{"id": "roots"}, {"id": "canopy"}]}}"#,
    );
    let concepts = write(
        &temp,
        "math-concepts.json",
        r#"{"mathConcepts": {"roots": [{"id": "counting", "title": "Counting", "gradeLevel": 1}]}}"#,
    );

    let catalog = service().load(&structure, &concepts).unwrap();

    assert!(!catalog.progression().unlock_system);
    assert!(!catalog.progression().prerequisite_check);
    assert_eq!(catalog.layers()[1].id, LayerId::Other("canopy".into()));
    assert!(catalog.concepts(&LayerId::Other("canopy".into())).is_empty());
    let (_, counting) = catalog.find("counting").unwrap();
    assert_eq!(counting.grade_level, "1");
}
