//! Command dispatch

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use itertools::Itertools;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::services::{CompletionOutcome, ConceptNode, ConceptTree};
use crate::cli::args::{Cli, Commands, ConfigCommands, StatusArg};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{embed_url, extract_video_id, LayerId, LayoutEngine, LayoutStrategy, Status};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.data_dir.as_deref())?;
    debug!("settings: {:?}", settings);
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Tree) | None => cmd_tree(&container),
        Some(Commands::List { layer, status }) => cmd_list(&container, layer.as_deref(), *status),
        Some(Commands::Show { id }) => cmd_show(&container, id),
        Some(Commands::Complete { id }) => cmd_complete(&container, id),
        Some(Commands::Progress) => cmd_progress(&container),
        Some(Commands::Layout {
            layer,
            count,
            parametric,
            seed,
        }) => cmd_layout(&container, layer, *count, *parametric, *seed),
        Some(Commands::Video { url }) => cmd_video(url),
        Some(Commands::Config { command }) => cmd_config(&container, command),
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
    }
}

/// Build the terminal drawing of the tree: layers, then their concepts.
pub fn render_tree(tree: &ConceptTree) -> Tree<String> {
    let mut root = Tree::new("🌳 Math Concept Tree".to_string());
    for view in tree.view() {
        let lock = if view.unlocked { "" } else { " 🔒" };
        let label = format!(
            "{} ({}){}",
            view.layer.display_name(),
            output::tracker(&view.progress),
            lock
        );
        let leaves = view.nodes.iter().map(|node| Tree::new(node_label(node)));
        root.push(Tree::new(label).with_leaves(leaves));
    }
    root
}

fn node_label(node: &ConceptNode<'_>) -> String {
    format!(
        "{} {} [{}]",
        node.glyph,
        node.concept.title,
        output::status(node.status)
    )
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer) -> CliResult<()> {
    let tree = container.concept_tree()?;
    output::info(&render_tree(&tree));
    print_tracker(&tree);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_list(
    container: &ServiceContainer,
    layer: Option<&str>,
    status: Option<StatusArg>,
) -> CliResult<()> {
    let tree = container.concept_tree()?;
    let layer = layer.map(LayerId::from);
    let status = status.map(Status::from);

    for view in tree.view() {
        if layer.as_ref().is_some_and(|l| *l != view.layer.id) {
            continue;
        }
        for node in view.nodes.iter().filter(|n| status.map_or(true, |s| s == n.status)) {
            output::info(&format!(
                "{:<24} {:<10} {}",
                node.concept.id,
                node.layer,
                output::status(node.status)
            ));
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_show(container: &ServiceContainer, id: &str) -> CliResult<()> {
    let tree = container.concept_tree()?;
    let detail = tree.select(id)?;
    let concept = detail.concept;

    output::header(&format!("{} {}", detail.glyph, concept.title));
    output::info(&concept.description);
    output::detail(&format!(
        "Grade: {} | Duration: {} | Layer: {}",
        concept.grade_level, concept.duration, detail.layer
    ));
    if !concept.topics.is_empty() {
        output::info(&"Topics:");
        for topic in &concept.topics {
            output::detail(&format!("- {topic}"));
        }
    }
    match detail.embed_url() {
        Some(url) => output::action("Video", &url),
        None => output::warning(&format!("no embeddable video in {:?}", concept.video_url)),
    }
    if detail.is_completed() {
        output::success(&Status::Completed.label());
    } else {
        output::detail(&format!("Mark as complete: tapmath complete {}", concept.id));
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_complete(container: &ServiceContainer, id: &str) -> CliResult<()> {
    let mut tree = container.concept_tree()?;
    match tree.complete(id)? {
        CompletionOutcome::Completed { unlocked } => {
            output::success(&"🎉 Concept Completed! Great job! 🎉");
            for layer in unlocked {
                output::action("Unlocked", &layer.title());
            }
        }
        CompletionOutcome::AlreadyCompleted => {
            output::info(&format!("{id}: {}", Status::Completed.label()));
        }
    }
    print_tracker(&tree);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_progress(container: &ServiceContainer) -> CliResult<()> {
    let tree = container.concept_tree()?;
    for progress in tree.tracker() {
        output::info(&format!(
            "{:<10} {}",
            progress.layer.title(),
            output::tracker(&progress)
        ));
    }
    Ok(())
}

fn print_tracker(tree: &ConceptTree) {
    let line = tree
        .tracker()
        .iter()
        .map(|p| format!("{} {}", p.layer.title(), output::tracker(p)))
        .join("  ");
    output::info(&line);
}

#[instrument(skip(container))]
fn cmd_layout(
    container: &ServiceContainer,
    layer: &str,
    count: Option<usize>,
    parametric: bool,
    seed: Option<u64>,
) -> CliResult<()> {
    let layer = LayerId::from(layer);
    let count = match count {
        Some(n) => n,
        None => container
            .concept_tree()?
            .catalog()
            .concepts(&layer)
            .len(),
    };
    let configured = &container.settings.layout;
    let engine = if parametric {
        LayoutEngine::new(
            LayoutStrategy::Parametric,
            seed.unwrap_or(configured.seed),
        )
    } else {
        configured.engine()
    };

    let positions = engine.positions(&layer, count);
    if positions.is_empty() {
        output::warning(&format!("no node slots for layer {layer}"));
        return Ok(());
    }
    for (i, p) in positions.iter().enumerate() {
        output::info(&format!(
            "{:>2}  x={:>7.1}  y={:>7.1}  r={:.1}",
            i, p.x, p.y, p.radius
        ));
    }
    if positions.len() < count {
        output::warning(&format!(
            "{} of {} concepts have no slot",
            count - positions.len(),
            count
        ));
    }
    Ok(())
}

#[instrument]
fn cmd_video(url: &str) -> CliResult<()> {
    let id = extract_video_id(url)
        .ok_or_else(|| CliError::InvalidArgs(format!("no video id in {url}")))?;
    output::info(&id);
    output::action("Embed", &embed_url(&id));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    let settings = &container.settings;
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(unavailable)".to_string());
            output::action("Global", &global);
            output::action("Local", &local_config_path(&settings.data_dir).display());
            output::action("Progress", &settings.progress_file.display());
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(&settings.data_dir)
            };
            if container.fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            container
                .fs
                .ensure_parent(&path)
                .and_then(|_| container.fs.write(&path, &Settings::template()))
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("Created {}", path.display()));
        }
    }
    Ok(())
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
