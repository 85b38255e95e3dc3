//! Formatting text that was typed into selected frames by hand.

// Allow expect for compile-time constant regex patterns in LazyLock blocks
#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::template::{MANUAL_MAX_FONT, MAX_FONT_PROPERTY};
use crate::error::{Error, Result};
use crate::scene::{FontReady, SceneGraph};
use crate::template::SlotMap;
use crate::text::{self, FitGroup};
use crate::types::{NodeId, NodeKind};

use super::result::{describe, FormatReport};

/// A decimal number at the start of a property value, e.g. the `30` of `30 pt`.
static RE_LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").expect("valid regex: RE_LEADING_NUMBER")
});

/// The number a property value starts with; trailing units are ignored.
fn leading_number(value: &str) -> Option<f64> {
    RE_LEADING_NUMBER.captures(value)?.get(1)?.as_str().parse().ok()
}

/// Largest size for a frame: its `Max main text` property when positive.
pub fn max_font_for<S: SceneGraph + ?Sized>(scene: &S, frame: &NodeId) -> f64 {
    scene
        .component_property(frame, MAX_FONT_PROPERTY)
        .as_deref()
        .and_then(leading_number)
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(MANUAL_MAX_FONT)
}

/// Re-parse and fit the `Quote N` / `Text N` layers of one frame.
pub async fn format_frame<S: SceneGraph + ?Sized>(scene: &mut S, frame: &NodeId) -> Result<f64> {
    let slots = SlotMap::discover(scene, frame);
    let targets = slots.manual_slots();
    if targets.is_empty() {
        return Err(Error::Validation(
            "No text layers named \"Quote 1\", \"Quote 2\", etc. found in selection".to_string(),
        ));
    }

    let max_font = max_font_for(scene, frame);
    let mut group = FitGroup::new();
    for slot in targets {
        let raw = FontReady::acquire(&mut *scene, &slot.node).await?.characters()?;
        text::write_markdown(scene, &slot.node, &text::parse(&raw)).await?;
        group.push(slot.node.clone(), slot.size);
    }
    group.fit(scene, max_font).await
}

/// Format every selected frame, component or instance.
pub async fn format_selection<S: SceneGraph + ?Sized>(scene: &mut S) -> Result<FormatReport> {
    let selection = scene.selection();
    if selection.is_empty() {
        return Err(Error::Validation("Please select at least one frame".to_string()));
    }

    let mut report = FormatReport::default();
    for id in &selection {
        let Some(info) = scene.node(id) else { continue };
        if !matches!(info.kind, NodeKind::Frame | NodeKind::Component | NodeKind::Instance) {
            continue;
        }
        match format_frame(scene, id).await {
            Ok(size) => {
                tracing::info!("Formatted \"{}\" at {size:.1}", info.name);
                report.frames_processed += 1;
            }
            Err(e) => {
                tracing::warn!("Error processing frame \"{}\": {e}", info.name);
                report.errors.push(describe(&info.name, &e));
            }
        }
    }

    if report.frames_processed == 0 {
        let mut msg = "Please select a frame, component, or instance".to_string();
        if !report.errors.is_empty() {
            msg = format!("{msg} ({})", report.errors.join("; "));
        }
        return Err(Error::Validation(msg));
    }
    Ok(report)
}
