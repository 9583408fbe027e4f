//! Concept tree application context
//!
//! Owns the catalog, the progression policy and the learner's progress. Every query
//! re-evaluates status from scratch; progress changes only through [`ConceptTree::complete`].

use tracing::{debug, info};

use crate::application::services::ProgressStore;
use crate::application::ApplicationResult;
use crate::domain::layout::{dynamic_radius, fit_title};
use crate::domain::{
    embed_url, extract_video_id, fill_colour, glyph_for, is_unlocked, layer_progress, status,
    Catalog, Concept, DomainError, Layer, LayerId, LayerProgress, LayoutEngine, Position,
    Progress, ProgressionPolicy, Status,
};

/// A concept ready for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct ConceptNode<'a> {
    pub concept: &'a Concept,
    pub layer: &'a LayerId,
    pub status: Status,
    /// `None` when the layer has more concepts than drawing slots.
    pub position: Option<Position>,
    pub glyph: &'static str,
}

impl ConceptNode<'_> {
    /// Drawn radius, grown for longer titles.
    pub fn radius(&self) -> Option<f64> {
        self.position
            .map(|p| dynamic_radius(p.radius, &self.concept.title))
    }

    /// Title as it fits inside the node.
    pub fn title_lines(&self) -> Vec<String> {
        match self.radius() {
            Some(r) => fit_title(&self.concept.title, r),
            None => vec![self.concept.title.clone()],
        }
    }

    pub fn fill(&self) -> &'static str {
        fill_colour(self.layer)
    }
}

/// One layer of the tree with its nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerView<'a> {
    pub layer: &'a Layer,
    pub unlocked: bool,
    pub progress: LayerProgress,
    pub nodes: Vec<ConceptNode<'a>>,
}

/// Everything the detail view shows for a concept.
#[derive(Debug, Clone, PartialEq)]
pub struct ConceptDetail<'a> {
    pub concept: &'a Concept,
    pub layer: &'a LayerId,
    pub status: Status,
    pub glyph: &'static str,
    pub video_id: Option<String>,
}

impl ConceptDetail<'_> {
    pub fn embed_url(&self) -> Option<String> {
        self.video_id.as_deref().map(embed_url)
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }
}

/// Result of a mark-complete intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Newly completed; `unlocked` lists layers that opened up as a result.
    Completed { unlocked: Vec<LayerId> },
    AlreadyCompleted,
}

/// Application context for one learner session.
pub struct ConceptTree {
    catalog: Catalog,
    policy: ProgressionPolicy,
    layout: LayoutEngine,
    store: ProgressStore,
    progress: Progress,
}

impl ConceptTree {
    /// Build the context, loading saved progress from `store`.
    pub fn new(
        catalog: Catalog,
        policy: ProgressionPolicy,
        layout: LayoutEngine,
        store: ProgressStore,
    ) -> Self {
        let progress = store.load();
        Self {
            catalog,
            policy,
            layout,
            store,
            progress,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn policy(&self) -> &ProgressionPolicy {
        &self.policy
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    /// Replace the policy; statuses follow on the next query.
    pub fn set_policy(&mut self, policy: ProgressionPolicy) {
        self.policy = policy;
    }

    pub fn find(&self, concept_id: &str) -> ApplicationResult<(&LayerId, &Concept)> {
        self.catalog
            .find(concept_id)
            .ok_or_else(|| DomainError::UnknownConcept(concept_id.to_string()).into())
    }

    pub fn status_of(&self, concept_id: &str) -> ApplicationResult<Status> {
        let (layer, concept) = self.find(concept_id)?;
        Ok(self.evaluate(&concept.id, layer))
    }

    fn evaluate(&self, concept_id: &str, layer: &LayerId) -> Status {
        status(concept_id, layer, &self.catalog, &self.progress, &self.policy)
    }

    /// Layers in structure order with positioned nodes; empty layers are left out.
    pub fn view(&self) -> Vec<LayerView<'_>> {
        self.catalog
            .layers()
            .iter()
            .filter_map(|layer| {
                let concepts = self.catalog.concepts(&layer.id);
                if concepts.is_empty() {
                    debug!("view: no concepts for layer {}, skipping", layer.id);
                    return None;
                }
                let positions = self.layout.positions(&layer.id, concepts.len());
                let nodes = concepts
                    .iter()
                    .enumerate()
                    .map(|(i, concept)| ConceptNode {
                        concept,
                        layer: &layer.id,
                        status: self.evaluate(&concept.id, &layer.id),
                        position: positions.get(i).copied(),
                        glyph: glyph_for(&concept.id),
                    })
                    .collect();
                Some(LayerView {
                    layer,
                    unlocked: is_unlocked(&layer.id, &self.catalog, &self.progress, &self.policy),
                    progress: layer_progress(&self.catalog, &self.progress, &layer.id),
                    nodes,
                })
            })
            .collect()
    }

    /// Per-layer completion counts in structure order.
    pub fn tracker(&self) -> Vec<LayerProgress> {
        self.catalog
            .layers()
            .iter()
            .map(|layer| layer_progress(&self.catalog, &self.progress, &layer.id))
            .collect()
    }

    /// Detail view of an available or completed concept.
    pub fn select(&self, concept_id: &str) -> ApplicationResult<ConceptDetail<'_>> {
        let (layer, concept) = self.find(concept_id)?;
        let status = self.evaluate(&concept.id, layer);
        if !status.is_interactive() {
            return Err(DomainError::ConceptLocked {
                id: concept.id.clone(),
                layer: layer.clone(),
            }
            .into());
        }
        Ok(ConceptDetail {
            concept,
            layer,
            status,
            glyph: glyph_for(&concept.id),
            video_id: extract_video_id(&concept.video_url),
        })
    }

    /// Mark a concept complete and persist.
    ///
    /// Locked concepts are refused. In-memory progress only changes once the
    /// record has been written.
    pub fn complete(&mut self, concept_id: &str) -> ApplicationResult<CompletionOutcome> {
        let (layer, concept) = self.find(concept_id)?;
        let layer = layer.clone();
        let id = concept.id.clone();

        match self.evaluate(&id, &layer) {
            Status::Completed => {
                debug!("complete: {} already completed", id);
                return Ok(CompletionOutcome::AlreadyCompleted);
            }
            Status::Locked => return Err(DomainError::ConceptLocked { id, layer }.into()),
            Status::Available => {}
        }

        let locked_before: Vec<LayerId> = self
            .catalog
            .layers()
            .iter()
            .filter(|l| !is_unlocked(&l.id, &self.catalog, &self.progress, &self.policy))
            .map(|l| l.id.clone())
            .collect();

        let next = self.store.mark_complete(&self.progress, &id);
        self.store.persist(&next)?;
        self.progress = next;

        let unlocked: Vec<LayerId> = locked_before
            .into_iter()
            .filter(|l| is_unlocked(l, &self.catalog, &self.progress, &self.policy))
            .collect();
        info!("Completed {} ({}), unlocked layers: {:?}", id, layer, unlocked);
        Ok(CompletionOutcome::Completed { unlocked })
    }
}
