//! Image fills for cover and background layers.

use crate::error::{Error, Result};
use crate::scene::SceneGraph;
use crate::services::Fetch;
use crate::template::Slot;
use crate::types::NodeKind;

/// Which node kinds an image slot may be filled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTarget {
    /// `Dom media`: rectangles and frames.
    Cover,
    /// `Background image`: rectangles, frames and ellipses.
    Background,
}

impl ImageTarget {
    /// Whether a layer of `kind` can take this image.
    pub const fn accepts(self, kind: NodeKind) -> bool {
        match self {
            Self::Cover => matches!(kind, NodeKind::Rectangle | NodeKind::Frame),
            Self::Background => kind.accepts_image_fill(),
        }
    }
}

/// Fetch an image and fill `slot` with it.
///
/// Returns `Ok(false)` when the layer kind cannot take an image.
pub async fn fill_image<S, F>(
    scene: &mut S,
    fetcher: &F,
    slot: &Slot,
    url: &str,
    target: ImageTarget,
) -> Result<bool>
where
    S: SceneGraph + ?Sized,
    F: Fetch + ?Sized,
{
    if !target.accepts(slot.kind) {
        tracing::debug!("Layer {} is a {:?}; skipping image {url}", slot.node, slot.kind);
        return Ok(false);
    }
    let bytes = fetcher.fetch(url).await.map_err(|e| Error::asset(url, e.to_string()))?;
    let image = scene.create_image(&bytes).await.map_err(|e| Error::asset(url, e.to_string()))?;
    scene.set_image_fill(&slot.node, &image)?;
    Ok(true)
}

/// Like [`fill_image`], but failures are logged and skipped.
pub async fn try_fill_image<S, F>(scene: &mut S, fetcher: &F, slot: &Slot, url: &str, target: ImageTarget)
where
    S: SceneGraph + ?Sized,
    F: Fetch + ?Sized,
{
    if let Err(e) = fill_image(scene, fetcher, slot, url, target).await {
        tracing::warn!("{e}; continuing without it");
    }
}
