//! Tests for the ConceptTree session context, wired through the service container

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rstest::rstest;
use tempfile::TempDir;

use tapmath::application::services::{CompletionOutcome, ConceptTree};
use tapmath::application::ApplicationError;
use tapmath::cli::commands::render_tree;
use tapmath::config::Settings;
use tapmath::domain::{DomainError, LayerId, ProgressionPolicy, Status};
use tapmath::infrastructure::di::ServiceContainer;
use tapmath::infrastructure::traits::{Clock, RealFileSystem};

const ROOTS: [&str; 6] = [
    "counting",
    "shapes",
    "addition-basic",
    "subtraction-basic",
    "patterns",
    "measurement-intro",
];

const TRUNK: [&str; 8] = [
    "place-value",
    "multiplication-intro",
    "division-intro",
    "fractions-basic",
    "geometry-2d",
    "decimals-intro",
    "data-graphs",
    "area-perimeter",
];

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn bundled_data() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}

fn container(data_dir: PathBuf, temp: &TempDir) -> ServiceContainer {
    let settings = Settings {
        data_dir,
        progress_file: temp.path().join("tapmath-progress.json"),
        ..Settings::default()
    };
    ServiceContainer::with_deps(
        settings,
        Arc::new(RealFileSystem),
        Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap(),
        )),
    )
}

fn session(temp: &TempDir) -> ConceptTree {
    container(bundled_data(), temp)
        .concept_tree()
        .expect("bundled catalog loads")
}

#[test]
fn given_fresh_learner_when_viewing_then_only_roots_are_available() {
    let temp = TempDir::new().unwrap();
    let tree = session(&temp);

    let view = tree.view();

    assert_eq!(view.len(), 3);
    assert!(view[0].unlocked);
    assert!(view[0].nodes.iter().all(|n| n.status == Status::Available));
    for layer in &view[1..] {
        assert!(!layer.unlocked);
        assert!(layer.nodes.iter().all(|n| n.status == Status::Locked));
    }
}

#[test]
fn given_three_roots_done_when_completing_fourth_then_trunk_unlocks() {
    let temp = TempDir::new().unwrap();
    let mut tree = session(&temp);
    for id in &ROOTS[..3] {
        assert_eq!(
            tree.complete(id).unwrap(),
            CompletionOutcome::Completed { unlocked: vec![] }
        );
    }
    assert_eq!(tree.status_of("place-value").unwrap(), Status::Locked);

    let outcome = tree.complete(ROOTS[3]).unwrap();

    assert_eq!(
        outcome,
        CompletionOutcome::Completed {
            unlocked: vec![LayerId::Trunk]
        }
    );
    assert_eq!(tree.status_of("place-value").unwrap(), Status::Available);
    assert_eq!(tree.status_of("integers").unwrap(), Status::Locked);
}

#[test]
fn given_six_trunk_concepts_done_when_viewing_then_branches_are_available() {
    let temp = TempDir::new().unwrap();
    let mut tree = session(&temp);
    for id in ROOTS.iter().take(4).chain(TRUNK.iter().take(6)) {
        tree.complete(id).unwrap();
    }

    let branches = &tree.view()[2];

    assert!(branches.unlocked);
    assert!(branches.nodes.iter().all(|n| n.status == Status::Available));
    assert_eq!(tree.tracker()[1].to_string(), "6/8");
}

#[test]
fn given_completion_when_starting_new_session_then_progress_is_restored() {
    let temp = TempDir::new().unwrap();
    {
        let mut tree = session(&temp);
        tree.complete("counting").unwrap();
    }

    let tree = session(&temp);

    assert_eq!(tree.status_of("counting").unwrap(), Status::Completed);
    assert!(temp.path().join("tapmath-progress.json").exists());
    assert_eq!(
        tree.progress().last_accessed,
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap()
    );
}

#[test]
fn given_completed_concept_when_completing_again_then_reports_already_completed() {
    let temp = TempDir::new().unwrap();
    let mut tree = session(&temp);
    tree.complete("shapes").unwrap();
    let before = tree.progress().clone();

    let outcome = tree.complete("shapes").unwrap();

    assert_eq!(outcome, CompletionOutcome::AlreadyCompleted);
    assert_eq!(tree.progress(), &before);
}

#[test]
fn given_locked_concept_when_completing_then_refuses_and_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let mut tree = session(&temp);

    let err = tree.complete("linear-equations").unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::ConceptLocked { ref id, layer: LayerId::Branches })
            if id == "linear-equations"
    ));
    assert!(!tree.progress().is_completed("linear-equations"));
    assert!(!temp.path().join("tapmath-progress.json").exists());
}

#[rstest]
#[case("no-such-concept")]
#[case("")]
fn given_unknown_id_when_selecting_then_reports_unknown_concept(#[case] id: &str) {
    let temp = TempDir::new().unwrap();
    let tree = session(&temp);

    let err = tree.select(id).unwrap_err();

    assert!(matches!(err, ApplicationError::Domain(DomainError::UnknownConcept(_))));
}

#[test]
fn given_available_concept_when_selecting_then_detail_has_embed_url() {
    let temp = TempDir::new().unwrap();
    let tree = session(&temp);

    let detail = tree.select("counting").unwrap();

    assert_eq!(detail.glyph, "🔢");
    assert_eq!(detail.status, Status::Available);
    assert!(!detail.is_completed());
    assert_eq!(detail.video_id.as_deref(), Some("DR-cfDsHCGA"));
    assert_eq!(
        detail.embed_url().as_deref(),
        Some("https://www.youtube.com/embed/DR-cfDsHCGA")
    );
}

#[test]
fn given_locked_concept_when_selecting_then_refuses() {
    let temp = TempDir::new().unwrap();
    let tree = session(&temp);

    let err = tree.select("probability").unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::ConceptLocked { .. })
    ));
}

#[test]
fn given_raised_thresholds_when_requerying_then_available_relocks_but_completed_stays() {
    let temp = TempDir::new().unwrap();
    let mut tree = session(&temp);
    for id in &ROOTS[..4] {
        tree.complete(id).unwrap();
    }
    tree.complete("place-value").unwrap();
    assert_eq!(tree.status_of("division-intro").unwrap(), Status::Available);

    tree.set_policy(ProgressionPolicy::default().with_thresholds(6, 6));

    assert_eq!(tree.status_of("division-intro").unwrap(), Status::Locked);
    assert_eq!(tree.status_of("place-value").unwrap(), Status::Completed);
}

#[test]
fn given_unlock_override_in_settings_when_loading_then_everything_is_available() {
    let temp = TempDir::new().unwrap();
    let mut settings = Settings {
        data_dir: bundled_data(),
        progress_file: temp.path().join("p.json"),
        ..Settings::default()
    };
    settings.progression.unlock_system = Some(false);
    let container = ServiceContainer::with_deps(
        settings,
        Arc::new(RealFileSystem),
        Arc::new(FixedClock(Utc::now())),
    );

    let tree = container.concept_tree().unwrap();

    assert!(!tree.policy().unlock_system_enabled);
    assert!(tree
        .view()
        .iter()
        .flat_map(|l| &l.nodes)
        .all(|n| n.status == Status::Available));
}

#[test]
fn given_layer_without_concepts_when_viewing_then_layer_is_skipped() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(
        data.join("tree-structure.json"),
        r#"{"treeStructure": {"layers": [{"id": "roots"}, {"id": "trunk"}, {"id": "branches"}],
            "progression": {"unlockSystem": true, "prerequisiteCheck": true}}}"#,
    )
    .unwrap();
    std::fs::write(
        data.join("math-concepts.json"),
        r#"{"mathConcepts": {
            "roots": [{"id": "counting", "title": "Counting"}],
            "branches": [{"id": "probability", "title": "Probability"}]}}"#,
    )
    .unwrap();

    let tree = container(data, &temp).concept_tree().unwrap();
    let view = tree.view();

    let layers: Vec<&LayerId> = view.iter().map(|v| &v.layer.id).collect();
    assert_eq!(layers, [&LayerId::Roots, &LayerId::Branches]);
    assert_eq!(tree.tracker().len(), 3);
    assert_eq!(tree.tracker()[1].total, 0);
}

#[test]
fn given_bundled_catalog_when_viewing_then_every_node_has_a_slot() {
    let temp = TempDir::new().unwrap();
    let tree = session(&temp);

    for layer in tree.view() {
        for node in &layer.nodes {
            let radius = node.radius().expect("node is positioned");
            assert!(radius >= node.position.unwrap().radius);
            assert!(!node.title_lines().is_empty());
            assert!(node.fill().starts_with('#'));
        }
    }
}

#[test]
fn given_session_when_rendering_then_tree_lists_layers_and_titles() {
    let temp = TempDir::new().unwrap();
    let tree = session(&temp);

    let drawing = render_tree(&tree).to_string();

    assert!(drawing.contains("Math Concept Tree"));
    assert!(drawing.contains("Roots"));
    assert!(drawing.contains("Branches"));
    assert!(drawing.contains("Counting"));
    assert!(drawing.contains("Linear Equations"));
    assert!(drawing.contains("🔒"));
}
