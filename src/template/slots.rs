//! Content slot discovery.
//!
//! A single depth-first pass over a template instance classifies every layer
//! whose name follows the slot conventions. Numbered slots are sorted by their
//! suffix, with document order breaking ties.

// Allow expect for compile-time constant regex patterns in LazyLock blocks
#![allow(clippy::expect_used)]

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::constants::layers;
use crate::scene::{NodeInfo, SceneGraph};
use crate::types::{NodeId, NodeKind, Size};

static RE_NUMBERED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Header|Quote|Text) (\d+)$").expect("valid regex: RE_NUMBERED")
});

/// What a slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotRole {
    /// `Header N` text.
    Header,
    /// `Quote N` text.
    Quote,
    /// `Text N` text, only used when formatting by hand.
    Text,
    /// Cover headline.
    Headline,
    /// Cover section label.
    Section,
    /// Combined speaker name and position.
    NamePosition,
    /// Cover image target.
    CoverImage,
    /// Content slide background image target.
    BackgroundImage,
}

/// A located placeholder inside a template instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    /// Role.
    pub role: SlotRole,
    /// Numeric suffix for numbered roles.
    pub ordinal: Option<u64>,
    /// Position in depth-first order.
    pub order: usize,
    /// Layer node.
    pub node: NodeId,
    /// Layer kind.
    pub kind: NodeKind,
    /// Box size at discovery time.
    pub size: Size,
}

/// Every slot found in one instance.
#[derive(Debug, Clone, Default)]
pub struct SlotMap {
    /// `Header N` layers, ascending by `N`.
    pub headers: Vec<Slot>,
    /// `Quote N` layers, ascending by `N`.
    pub quotes: Vec<Slot>,
    /// `Text N` layers, ascending by `N`.
    pub texts: Vec<Slot>,
    /// First text layer named `Headline`.
    pub headline: Option<Slot>,
    /// First text layer named `Section`.
    pub section: Option<Slot>,
    /// First text layer named `Name and position`.
    pub name_position: Option<Slot>,
    /// First layer named `Dom media`.
    pub cover_image: Option<Slot>,
    /// First layer named `Background image`.
    pub background_image: Option<Slot>,
    names: HashSet<String>,
}

/// Split a numbered slot name into role and ordinal.
///
/// Zero and out-of-range suffixes are not slots.
pub fn numbered(name: &str) -> Option<(SlotRole, u64)> {
    let caps = RE_NUMBERED.captures(name)?;
    let role = match &caps[1] {
        "Header" => SlotRole::Header,
        "Quote" => SlotRole::Quote,
        _ => SlotRole::Text,
    };
    let ordinal: u64 = caps[2].parse().ok()?;
    (ordinal > 0).then_some((role, ordinal))
}

fn named(name: &str) -> Option<(SlotRole, bool)> {
    // (role, must be a text layer)
    match name {
        layers::HEADLINE => Some((SlotRole::Headline, true)),
        layers::SECTION => Some((SlotRole::Section, true)),
        layers::NAME_AND_POSITION => Some((SlotRole::NamePosition, true)),
        layers::COVER_IMAGE => Some((SlotRole::CoverImage, false)),
        layers::BACKGROUND_IMAGE => Some((SlotRole::BackgroundImage, false)),
        _ => None,
    }
}

impl SlotMap {
    /// Discover the slots below `root`.
    pub fn discover<S: SceneGraph + ?Sized>(scene: &S, root: &NodeId) -> Self {
        let mut map = Self::default();
        for (order, info) in scene.descendants(root).iter().enumerate() {
            map.classify(order, info);
        }
        for list in [&mut map.headers, &mut map.quotes, &mut map.texts] {
            list.sort_by_key(|s| (s.ordinal, s.order));
        }
        tracing::debug!(
            "Discovered {} header(s), {} quote(s), {} text slot(s) under {root}",
            map.headers.len(),
            map.quotes.len(),
            map.texts.len()
        );
        map
    }

    fn classify(&mut self, order: usize, info: &NodeInfo) {
        self.names.insert(info.name.clone());
        let is_text = info.kind == NodeKind::Text;
        let slot = |role, ordinal| Slot {
            role,
            ordinal,
            order,
            node: info.id.clone(),
            kind: info.kind,
            size: info.size,
        };

        if let Some((role, ordinal)) = numbered(&info.name) {
            if is_text {
                let list = match role {
                    SlotRole::Header => &mut self.headers,
                    SlotRole::Quote => &mut self.quotes,
                    _ => &mut self.texts,
                };
                list.push(slot(role, Some(ordinal)));
            }
            return;
        }

        let Some((role, text_only)) = named(&info.name) else { return };
        if text_only && !is_text {
            return;
        }
        let target = match role {
            SlotRole::Headline => &mut self.headline,
            SlotRole::Section => &mut self.section,
            SlotRole::NamePosition => &mut self.name_position,
            SlotRole::CoverImage => &mut self.cover_image,
            _ => &mut self.background_image,
        };
        if target.is_none() {
            *target = Some(slot(role, None));
        }
    }

    /// Content slots in fill order: headers, then quotes.
    pub fn content_slots(&self) -> impl Iterator<Item = &Slot> {
        self.headers.iter().chain(self.quotes.iter())
    }

    /// `Quote N` and `Text N` layers merged into one numeric order.
    pub fn manual_slots(&self) -> Vec<&Slot> {
        let mut slots: Vec<&Slot> = self.quotes.iter().chain(self.texts.iter()).collect();
        slots.sort_by_key(|s| (s.ordinal, s.order));
        slots
    }

    /// Whether any layer below the root has this name.
    pub fn has_layer(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Expected layer names that the instance does not contain.
    pub fn missing<'a>(&self, structure: &'a [String]) -> Vec<&'a str> {
        structure
            .iter()
            .map(String::as_str)
            .filter(|name| !self.has_layer(name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::scene::{MemoryScene, NodeSpec, SceneDocument};

    fn text(name: &str) -> NodeSpec {
        NodeSpec::text(name, "", 100.0, 50.0)
    }

    fn scene_with(children: Vec<NodeSpec>) -> (MemoryScene, NodeId) {
        let doc = SceneDocument {
            nodes: vec![NodeSpec::component("T", 1080.0, 1350.0, children)],
            ..SceneDocument::default()
        };
        let scene = MemoryScene::from_document(&doc).unwrap();
        let root = scene.find_by_name("T").unwrap();
        (scene, root)
    }

    fn names(scene: &MemoryScene, slots: &[Slot]) -> Vec<String> {
        slots.iter().map(|s| scene.node(&s.node).unwrap().name).collect()
    }

    #[test]
    fn numbered_names() {
        assert_eq!(numbered("Header 3"), Some((SlotRole::Header, 3)));
        assert_eq!(numbered("Quote 10"), Some((SlotRole::Quote, 10)));
        assert_eq!(numbered("Text 02"), Some((SlotRole::Text, 2)));
        assert_eq!(numbered("Quote 0"), None);
        assert_eq!(numbered("Quote"), None);
        assert_eq!(numbered("Quote 1 copy"), None);
        assert_eq!(numbered("quote 1"), None);
        assert_eq!(numbered("Quote 99999999999999999999999"), None);
    }

    #[test]
    fn headers_sort_numerically() {
        let (scene, root) = scene_with(vec![text("Header 2"), text("Header 10"), text("Header 1")]);
        let map = SlotMap::discover(&scene, &root);
        assert_eq!(names(&scene, &map.headers), ["Header 1", "Header 2", "Header 10"]);
    }

    #[test]
    fn nested_layers_are_found_and_headers_precede_quotes() {
        let (scene, root) = scene_with(vec![
            text("Quote 1"),
            NodeSpec::frame("Column", 500.0, 500.0, vec![text("Header 1"), text("Quote 2")]),
        ]);
        let map = SlotMap::discover(&scene, &root);
        let order: Vec<SlotRole> = map.content_slots().map(|s| s.role).collect();
        assert_eq!(order, [SlotRole::Header, SlotRole::Quote, SlotRole::Quote]);
        assert_eq!(names(&scene, &map.quotes), ["Quote 1", "Quote 2"]);
    }

    #[test]
    fn duplicate_ordinals_keep_document_order() {
        let (scene, root) = scene_with(vec![text("Quote 1"), text("Quote 1")]);
        let map = SlotMap::discover(&scene, &root);
        assert_eq!(map.quotes.len(), 2);
        assert!(map.quotes[0].order < map.quotes[1].order);
    }

    #[test]
    fn non_text_layers_are_not_text_slots() {
        let (scene, root) = scene_with(vec![
            NodeSpec::rectangle("Quote 1", 10.0, 10.0),
            NodeSpec::rectangle("Headline", 10.0, 10.0),
            text("Headline"),
        ]);
        let map = SlotMap::discover(&scene, &root);
        assert!(map.quotes.is_empty());
        assert_eq!(map.headline.unwrap().kind, NodeKind::Text);
    }

    #[test]
    fn image_slots_accept_any_kind() {
        let (scene, root) = scene_with(vec![
            NodeSpec::ellipse("Dom media", 10.0, 10.0),
            NodeSpec::rectangle("Background image", 10.0, 10.0),
        ]);
        let map = SlotMap::discover(&scene, &root);
        assert_eq!(map.cover_image.unwrap().kind, NodeKind::Ellipse);
        assert_eq!(map.background_image.unwrap().kind, NodeKind::Rectangle);
    }

    #[test]
    fn manual_slots_merge_quotes_and_texts() {
        let (scene, root) = scene_with(vec![text("Text 3"), text("Quote 2"), text("Text 1"), text("Header 1")]);
        let map = SlotMap::discover(&scene, &root);
        let manual: Vec<String> = map
            .manual_slots()
            .into_iter()
            .map(|s| scene.node(&s.node).unwrap().name)
            .collect();
        assert_eq!(manual, ["Text 1", "Quote 2", "Text 3"]);
    }

    #[test]
    fn missing_structure_layers() {
        let (scene, root) = scene_with(vec![text("Quote 1"), text("Name and position")]);
        let map = SlotMap::discover(&scene, &root);
        let structure = vec!["Quote 1".to_string(), "Quote 2".to_string(), "Name and position".to_string()];
        assert_eq!(map.missing(&structure), ["Quote 2"]);
    }

    #[test]
    fn empty_template_has_no_slots() {
        let (scene, root) = scene_with(vec![]);
        let map = SlotMap::discover(&scene, &root);
        assert_eq!(map.content_slots().count(), 0);
        assert!(map.headline.is_none() && map.name_position.is_none());
    }
}
