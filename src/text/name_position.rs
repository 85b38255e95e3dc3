//! Speaker name and position line.
//!
//! The name and position share one text layer: the name on the first line,
//! the position on the second, each at its own size.

use crate::error::Result;
use crate::scene::{FontReady, SceneGraph};
use crate::types::NodeId;

/// Text and per-range sizes for a name/position layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    /// Combined text.
    pub text: String,
    /// `(start, end, size)` ranges in characters.
    pub sizes: Vec<(usize, usize, f64)>,
}

/// Combine `name` and `position`, joined by a line break when both are set.
pub fn compose(name: &str, position: &str, name_font_size: f64, position_font_size: f64) -> Composition {
    let separator = if !name.is_empty() && !position.is_empty() { "\n" } else { "" };
    let text = format!("{name}{separator}{position}");
    let name_len = name.chars().count();
    let total = text.chars().count();

    let mut sizes = Vec::new();
    if !name.is_empty() {
        sizes.push((0, name_len, name_font_size));
    }
    if !position.is_empty() {
        let start = if name.is_empty() { 0 } else { name_len + 1 };
        sizes.push((start, total, position_font_size));
    }

    Composition { text, sizes }
}

/// Write a composition into a text node.
pub async fn apply<S: SceneGraph + ?Sized>(scene: &mut S, node: &NodeId, composition: &Composition) -> Result<()> {
    let mut text = FontReady::acquire(scene, node).await?;
    text.set_characters(&composition.text)?;
    for &(start, end, size) in &composition.sizes {
        text.set_range_font_size(start, end, size)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_lines() {
        let c = compose("Ada Lovelace", "Analyst", 60.0, 50.0);
        assert_eq!(c.text, "Ada Lovelace\nAnalyst");
        assert_eq!(c.sizes, vec![(0, 12, 60.0), (13, 20, 50.0)]);
    }

    #[test]
    fn name_only() {
        let c = compose("Ada", "", 60.0, 50.0);
        assert_eq!(c.text, "Ada");
        assert_eq!(c.sizes, vec![(0, 3, 60.0)]);
    }

    #[test]
    fn position_only_sizes_everything() {
        let c = compose("", "Editor", 60.0, 50.0);
        assert_eq!(c.text, "Editor");
        assert_eq!(c.sizes, vec![(0, 6, 50.0)]);
    }

    #[test]
    fn empty_leaves_no_sizing() {
        let c = compose("", "", 60.0, 50.0);
        assert_eq!(c.text, "");
        assert!(c.sizes.is_empty());
    }

    #[test]
    fn multibyte_names_use_character_offsets() {
        let c = compose("Zoë", "Rédactrice", 60.0, 50.0);
        assert_eq!(c.sizes, vec![(0, 3, 60.0), (4, 14, 50.0)]);
    }
}
