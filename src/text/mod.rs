//! Text processing: emphasis parsing, auto-fit sizing, and the
//! name/position layer.

pub mod fit;
pub mod markdown;
pub mod name_position;

pub use fit::{FitGroup, Measurable};
pub use markdown::{parse, ParsedText, StyledSegment};

use crate::constants::style::HIGHLIGHT;
use crate::error::Result;
use crate::scene::{FontReady, SceneGraph};
use crate::types::NodeId;

/// Replace a node's text with parsed markdown and highlight its bold ranges.
pub async fn write_markdown<S: SceneGraph + ?Sized>(
    scene: &mut S,
    node: &NodeId,
    parsed: &ParsedText,
) -> Result<()> {
    let mut text = FontReady::acquire(scene, node).await?;
    text.set_characters(&parsed.clean)?;
    for (start, end) in parsed.bold_ranges() {
        text.set_range_fill(start, end, HIGHLIGHT)?;
    }
    Ok(())
}
