//! Cover slide population.

use crate::error::Result;
use crate::scene::{FontReady, SceneGraph};
use crate::services::Fetch;
use crate::template::{SlotMap, TemplateConfig};
use crate::text::{name_position, FitGroup};
use crate::types::NodeId;

use super::assets::{try_fill_image, ImageTarget};
use super::request::CoverSlide;

/// Fill a freshly created cover instance.
pub async fn populate<S, F>(
    scene: &mut S,
    fetcher: &F,
    instance: &NodeId,
    cover: &CoverSlide,
    config: &TemplateConfig,
) -> Result<()>
where
    S: SceneGraph + ?Sized,
    F: Fetch + ?Sized,
{
    let slots = SlotMap::discover(scene, instance);

    if let (Some(headline), Some(slot)) = (&cover.headline, &slots.headline) {
        FontReady::acquire(&mut *scene, &slot.node).await?.set_characters(headline)?;
        let mut group = FitGroup::new();
        group.push(slot.node.clone(), slot.size);
        let size = group.fit(scene, config.max_font_size()).await?;
        tracing::info!("Headline fitted at {size:.1} (max {})", config.max_font_size());
    }

    if let (Some(section), Some(slot)) = (&cover.section, &slots.section) {
        FontReady::acquire(&mut *scene, &slot.node)
            .await?
            .set_characters(&section.to_uppercase())?;
    }

    if let (Some(url), Some(slot)) = (&cover.cover_image_url, &slots.cover_image) {
        try_fill_image(scene, fetcher, slot, url, ImageTarget::Cover).await;
    }

    if cover.name.is_some() || cover.position.is_some() {
        if let Some(slot) = &slots.name_position {
            let composition = name_position::compose(
                cover.name.as_deref().unwrap_or_default(),
                cover.position.as_deref().unwrap_or_default(),
                config.name_font_size(),
                config.position_font_size(),
            );
            name_position::apply(scene, &slot.node, &composition).await?;
        }
    }

    Ok(())
}
