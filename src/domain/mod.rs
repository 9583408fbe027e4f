//! Domain layer: entities and progression rules
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod glyph;
pub mod layout;
pub mod policy;
pub mod unlock;
pub mod video;

pub use entities::*;
pub use error::DomainError;
pub use glyph::{fill_colour, glyph_for, FALLBACK_GLYPH};
pub use layout::{LayoutEngine, LayoutStrategy, Position};
pub use policy::ProgressionPolicy;
pub use unlock::{is_unlocked, layer_progress, status, LayerProgress, Status, TrackerState};
pub use video::{embed_url, extract_video_id};
