//! Content slide population.

use crate::error::Result;
use crate::scene::SceneGraph;
use crate::services::Fetch;
use crate::template::{SlotMap, SlotRole, TemplateConfig};
use crate::text::{self, name_position, FitGroup};
use crate::types::NodeId;

use super::assets::{try_fill_image, ImageTarget};
use super::request::ContentSlide;

/// Font sizes chosen for one slide.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SlideSizes {
    /// Shared size of the header group, if any header was filled.
    pub headers: Option<f64>,
    /// Shared size of the quote group, if any quote was filled.
    pub quotes: Option<f64>,
}

/// Fill a freshly created content slide instance.
///
/// Texts go to headers first and then quotes, each in numeric order. Extra
/// texts are dropped and unfilled slots keep their template content.
pub async fn populate<S, F>(
    scene: &mut S,
    fetcher: &F,
    instance: &NodeId,
    slide: &ContentSlide,
    config: &TemplateConfig,
) -> Result<SlideSizes>
where
    S: SceneGraph + ?Sized,
    F: Fetch + ?Sized,
{
    let slots = SlotMap::discover(scene, instance);

    if let Some(structure) = &config.structure {
        let missing = slots.missing(structure);
        if !missing.is_empty() {
            tracing::warn!("Template \"{}\" is missing layers: {}", slide.template, missing.join(", "));
        }
    }

    if config.background_image {
        if let (Some(url), Some(slot)) = (&slide.background_image_url, &slots.background_image) {
            try_fill_image(scene, fetcher, slot, url, ImageTarget::Background).await;
        }
    }

    let mut headers = FitGroup::new();
    let mut quotes = FitGroup::new();
    for (slot, raw) in slots.content_slots().zip(&slide.texts) {
        let parsed = text::parse(raw);
        text::write_markdown(scene, &slot.node, &parsed).await?;
        let group = if slot.role == SlotRole::Header { &mut headers } else { &mut quotes };
        group.push(slot.node.clone(), slot.size);
    }
    if slide.texts.len() > slots.content_slots().count() {
        tracing::debug!(
            "Template \"{}\" has fewer slots than texts; dropping {} text(s)",
            slide.template,
            slide.texts.len() - slots.content_slots().count()
        );
    }

    if config.has_name_position() {
        if let Some(slot) = &slots.name_position {
            let composition = name_position::compose(
                slide.speaker.as_deref().unwrap_or_default(),
                slide.position.as_deref().unwrap_or_default(),
                config.name_font_size(),
                config.position_font_size(),
            );
            name_position::apply(scene, &slot.node, &composition).await?;
        }
    }

    let mut sizes = SlideSizes::default();
    if !headers.is_empty() {
        sizes.headers = Some(headers.fit(scene, config.max_font_size()).await?);
    }
    if !quotes.is_empty() {
        sizes.quotes = Some(quotes.fit(scene, config.max_font_size()).await?);
    }
    tracing::debug!("Slide sizes for \"{}\": {sizes:?}", slide.template);
    Ok(sizes)
}
