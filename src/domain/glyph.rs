//! Presentation glyphs and layer colours

use crate::domain::LayerId;

/// Glyph for concepts without an entry in [`GLYPHS`].
pub const FALLBACK_GLYPH: &str = "📚";

/// Concept id → glyph.
pub static GLYPHS: [(&str, &str); 24] = [
    ("counting", "🔢"),
    ("shapes", "🔺"),
    ("addition-basic", "➕"),
    ("subtraction-basic", "➖"),
    ("patterns", "🔄"),
    ("measurement-intro", "📏"),
    ("place-value", "💯"),
    ("multiplication-intro", "✖️"),
    ("division-intro", "➗"),
    ("fractions-basic", "🍕"),
    ("geometry-2d", "📐"),
    ("decimals-intro", "💰"),
    ("data-graphs", "📊"),
    ("area-perimeter", "📦"),
    ("fractions-advanced", "🧮"),
    ("integers", "🌡️"),
    ("ratios-proportions", "⚖️"),
    ("percentages", "💯"),
    ("algebra-intro", "🔤"),
    ("geometry-3d", "🧊"),
    ("probability", "🎲"),
    ("statistics", "📈"),
    ("coordinate-plane", "🗺️"),
    ("linear-equations", "📉"),
];

pub fn glyph_for(concept_id: &str) -> &'static str {
    GLYPHS
        .iter()
        .find(|(id, _)| *id == concept_id)
        .map(|(_, glyph)| *glyph)
        .unwrap_or(FALLBACK_GLYPH)
}

/// Node fill colour of a layer.
pub fn fill_colour(layer: &LayerId) -> &'static str {
    match layer {
        LayerId::Roots => "#FFF8DC",
        LayerId::Trunk => "#F4E4BC",
        LayerId::Branches => "#F0FFF0",
        LayerId::Other(_) => "#ffffff",
    }
}
