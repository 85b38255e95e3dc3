//! In-memory scene graph.
//!
//! Backs the command-line tools and the test suite. Text layout uses
//! [`TextMetrics`]; fonts must be loaded before text is touched, mirroring the
//! host editor.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;

use super::measure::TextMetrics;
use super::{NodeInfo, SceneGraph};
use crate::error::{Error, Result};
use crate::types::{AutoResize, Color, FontRef, ImageHash, NodeId, NodeKind, Size};

/// Character range styling applied on top of a text node's base style.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeStyle {
    /// First character.
    pub start: usize,
    /// One past the last character.
    pub end: usize,
    /// Font size override.
    pub font_size: Option<f64>,
    /// Fill override.
    pub fill: Option<Color>,
}

/// Text-specific node state.
#[derive(Debug, Clone, PartialEq)]
pub struct TextState {
    /// Content.
    pub characters: String,
    /// Base font.
    pub font: FontRef,
    /// Base font size.
    pub font_size: f64,
    /// Auto-resize mode.
    pub auto_resize: AutoResize,
    /// Range overrides in application order.
    pub ranges: Vec<RangeStyle>,
}

/// A node stored in a [`MemoryScene`].
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Identifier.
    pub id: NodeId,
    /// Layer name.
    pub name: String,
    /// Kind.
    pub kind: NodeKind,
    /// Position.
    pub x: f64,
    /// Position.
    pub y: f64,
    /// Box size.
    pub size: Size,
    /// Children in paint order.
    pub children: Vec<NodeId>,
    /// Parent node, if any.
    pub parent: Option<NodeId>,
    /// Text state for text nodes.
    pub text: Option<TextState>,
    /// Image fill, if any.
    pub image: Option<ImageHash>,
    /// Component properties (instances and components).
    pub properties: BTreeMap<String, String>,
    /// Component an instance was created from.
    pub main_component: Option<NodeId>,
}

impl Node {
    /// Create a bare node.
    pub fn new(id: NodeId, name: impl Into<String>, kind: NodeKind, size: Size) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            x: 0.0,
            y: 0.0,
            size,
            children: Vec::new(),
            parent: None,
            text: None,
            image: None,
            properties: BTreeMap::new(),
            main_component: None,
        }
    }

    fn info(&self) -> NodeInfo {
        NodeInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind,
            size: self.size,
        }
    }
}

/// A self-contained document held in memory.
#[derive(Debug, Clone)]
pub struct MemoryScene {
    nodes: HashMap<NodeId, Node>,
    roots: Vec<NodeId>,
    loaded_fonts: HashSet<FontRef>,
    missing_fonts: HashSet<FontRef>,
    images: HashMap<ImageHash, usize>,
    selection: Vec<NodeId>,
    viewport_center: (f64, f64),
    metrics: TextMetrics,
    next_id: u64,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryScene {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            roots: Vec::new(),
            loaded_fonts: HashSet::new(),
            missing_fonts: HashSet::new(),
            images: HashMap::new(),
            selection: Vec::new(),
            viewport_center: (0.0, 0.0),
            metrics: TextMetrics::default(),
            next_id: 1,
        }
    }

    /// Set the viewport centre.
    pub fn set_viewport_center(&mut self, x: f64, y: f64) {
        self.viewport_center = (x, y);
    }

    /// The viewport centre.
    pub const fn viewport_center(&self) -> (f64, f64) {
        self.viewport_center
    }

    /// Make `load_font` fail for a font, as when it is not installed.
    pub fn mark_font_missing(&mut self, font: FontRef) {
        self.missing_fonts.insert(font);
    }

    /// Allocate a fresh node identifier.
    pub fn allocate_id(&mut self) -> NodeId {
        let id = NodeId::new(format!("{}:{}", self.next_id, uuid::Uuid::new_v4().simple()));
        self.next_id += 1;
        id
    }

    /// Insert a node under `parent`, or as a top-level node.
    pub fn insert(&mut self, mut node: Node, parent: Option<&NodeId>) -> Result<NodeId> {
        let id = node.id.clone();
        match parent {
            Some(p) => {
                let parent_node = self.get_mut(p)?;
                parent_node.children.push(id.clone());
                node.parent = Some(p.clone());
            }
            None => self.roots.push(id.clone()),
        }
        self.nodes.insert(id.clone(), node);
        Ok(id)
    }

    /// Borrow a node.
    pub fn get(&self, id: &NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or_else(|| Error::scene(format!("no node {id}")))
    }

    fn get_mut(&mut self, id: &NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or_else(|| Error::scene(format!("no node {id}")))
    }

    /// Top-level nodes in insertion order.
    pub const fn roots(&self) -> &[NodeId] {
        self.roots.as_slice()
    }

    /// Children of a node.
    pub fn children(&self, id: &NodeId) -> &[NodeId] {
        self.nodes.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Text state of a text node.
    pub fn text(&self, id: &NodeId) -> Result<&TextState> {
        self.get(id)?
            .text
            .as_ref()
            .ok_or_else(|| Error::scene(format!("node {id} is not text")))
    }

    /// Number of registered images.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Find the first node with `name` in document order.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.roots.iter().find_map(|root| {
            std::iter::once(self.get(root).ok()?.info())
                .chain(self.descendants(root))
                .find(|n| n.name == name)
                .map(|n| n.id)
        })
    }

    fn text_mut(&mut self, id: &NodeId) -> Result<&mut TextState> {
        let loaded = {
            let text = self.text(id)?;
            self.loaded_fonts.contains(&text.font)
        };
        if !loaded {
            return Err(Error::scene(format!("font for node {id} must be loaded before editing text")));
        }
        self.get_mut(id)?
            .text
            .as_mut()
            .ok_or_else(|| Error::scene(format!("node {id} is not text")))
    }

    fn check_range(text: &TextState, start: usize, end: usize) -> Result<()> {
        let len = text.characters.chars().count();
        if start > end || end > len {
            return Err(Error::scene(format!("range {start}..{end} outside text of length {len}")));
        }
        Ok(())
    }

    /// Recompute a text node's box according to its auto-resize mode.
    fn relayout(&mut self, id: &NodeId) -> Result<()> {
        let metrics = self.metrics;
        let node = self.get_mut(id)?;
        let Some(text) = node.text.as_ref() else {
            return Ok(());
        };
        match text.auto_resize {
            AutoResize::None => {}
            AutoResize::Height => {
                node.size.height = metrics.height(&text.characters, text.font_size, node.size.width);
            }
            AutoResize::WidthAndHeight => {
                let width = metrics.natural_width(&text.characters, text.font_size);
                node.size.width = width;
                node.size.height = metrics.height(&text.characters, text.font_size, f64::INFINITY);
            }
        }
        Ok(())
    }

    fn deep_clone(&mut self, source: &NodeId, parent: Option<&NodeId>) -> Result<NodeId> {
        let original = self.get(source)?.clone();
        let id = self.allocate_id();
        let mut copy = original.clone();
        copy.id = id.clone();
        copy.children = Vec::new();
        copy.parent = None;
        self.insert(copy, parent)?;
        for child in &original.children {
            self.deep_clone(child, Some(&id))?;
        }
        Ok(id)
    }
}

/// Image formats the in-memory document can decode.
fn sniff_image(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => Some("png"),
        [0xFF, 0xD8, 0xFF, ..] => Some("jpeg"),
        [b'G', b'I', b'F', b'8', ..] => Some("gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("webp"),
        _ => None,
    }
}

#[async_trait]
impl SceneGraph for MemoryScene {
    fn node(&self, id: &NodeId) -> Option<NodeInfo> {
        self.nodes.get(id).map(Node::info)
    }

    fn descendants(&self, root: &NodeId) -> Vec<NodeInfo> {
        let mut out = Vec::new();
        let mut stack: Vec<&NodeId> = self.children(root).iter().rev().collect();
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get(id) {
                out.push(node.info());
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    async fn find_component(&self, name: &str) -> Result<Option<NodeId>> {
        for root in &self.roots {
            let Some(root_node) = self.nodes.get(root) else {
                continue;
            };
            let hit = std::iter::once(root_node.info())
                .chain(self.descendants(root))
                .find(|n| n.kind == NodeKind::Component && n.name == name);
            if let Some(hit) = hit {
                return Ok(Some(hit.id));
            }
        }
        Ok(None)
    }

    async fn create_instance(&mut self, component: &NodeId) -> Result<NodeId> {
        let kind = self.get(component)?.kind;
        if kind != NodeKind::Component {
            return Err(Error::scene(format!("node {component} is not a component")));
        }
        let id = self.deep_clone(component, None)?;
        let node = self.get_mut(&id)?;
        node.kind = NodeKind::Instance;
        node.main_component = Some(component.clone());
        Ok(id)
    }

    fn component_property(&self, instance: &NodeId, name: &str) -> Option<String> {
        let node = self.nodes.get(instance)?;
        if node.kind != NodeKind::Instance {
            return None;
        }
        node.properties.get(name).cloned()
    }

    fn remove(&mut self, id: &NodeId) -> Result<()> {
        let node = self.get(id)?.clone();
        match &node.parent {
            Some(p) => self.get_mut(p)?.children.retain(|c| c != id),
            None => self.roots.retain(|r| r != id),
        }
        let mut stack = vec![node.id];
        while let Some(next) = stack.pop() {
            if let Some(removed) = self.nodes.remove(&next) {
                stack.extend(removed.children);
            }
        }
        self.selection.retain(|s| self.nodes.contains_key(s));
        Ok(())
    }

    fn font(&self, text: &NodeId) -> Result<FontRef> {
        Ok(self.text(text)?.font.clone())
    }

    async fn load_font(&mut self, font: &FontRef) -> Result<()> {
        if self.missing_fonts.contains(font) {
            return Err(Error::scene(format!("font {font} is not available")));
        }
        self.loaded_fonts.insert(font.clone());
        Ok(())
    }

    fn characters(&self, text: &NodeId) -> Result<String> {
        Ok(self.text(text)?.characters.clone())
    }

    fn set_characters(&mut self, text: &NodeId, characters: &str) -> Result<()> {
        let state = self.text_mut(text)?;
        characters.clone_into(&mut state.characters);
        state.ranges.clear();
        self.relayout(text)
    }

    fn set_font_size(&mut self, text: &NodeId, size: f64) -> Result<()> {
        let state = self.text_mut(text)?;
        state.font_size = size;
        state.ranges.iter_mut().for_each(|r| r.font_size = None);
        self.relayout(text)
    }

    fn set_range_font_size(&mut self, text: &NodeId, start: usize, end: usize, size: f64) -> Result<()> {
        let state = self.text_mut(text)?;
        Self::check_range(state, start, end)?;
        state.ranges.push(RangeStyle { start, end, font_size: Some(size), fill: None });
        Ok(())
    }

    fn set_range_fill(&mut self, text: &NodeId, start: usize, end: usize, color: Color) -> Result<()> {
        let state = self.text_mut(text)?;
        Self::check_range(state, start, end)?;
        state.ranges.push(RangeStyle { start, end, font_size: None, fill: Some(color) });
        Ok(())
    }

    fn set_auto_resize(&mut self, text: &NodeId, mode: AutoResize) -> Result<()> {
        self.text_mut(text)?.auto_resize = mode;
        self.relayout(text)
    }

    fn resize(&mut self, id: &NodeId, width: f64, height: f64) -> Result<()> {
        let node = self.get_mut(id)?;
        node.size = Size::new(width, height);
        self.relayout(id)
    }

    async fn measure(&mut self, id: &NodeId) -> Result<Size> {
        if let Some(text) = &self.get(id)?.text {
            if !self.loaded_fonts.contains(&text.font) {
                return Err(Error::scene(format!("font for node {id} must be loaded before measuring")));
            }
        }
        self.relayout(id)?;
        Ok(self.get(id)?.size)
    }

    async fn create_image(&mut self, bytes: &[u8]) -> Result<ImageHash> {
        let format = sniff_image(bytes)
            .ok_or_else(|| Error::scene("image data is not PNG, JPEG, GIF or WebP"))?;
        let hash = ImageHash(format!("{format}-{}", uuid::Uuid::new_v4().simple()));
        self.images.insert(hash.clone(), bytes.len());
        Ok(hash)
    }

    fn set_image_fill(&mut self, id: &NodeId, image: &ImageHash) -> Result<()> {
        if !self.images.contains_key(image) {
            return Err(Error::scene(format!("unknown image {image}")));
        }
        let node = self.get_mut(id)?;
        if !node.kind.accepts_image_fill() {
            return Err(Error::scene(format!("node {id} cannot take an image fill")));
        }
        node.image = Some(image.clone());
        Ok(())
    }

    fn create_container(&mut self, name: &str, spacing: f64, children: &[NodeId]) -> Result<NodeId> {
        let id = self.allocate_id();
        let mut width = 0.0_f64;
        let mut height = 0.0_f64;
        let mut x = 0.0;
        for (i, child) in children.iter().enumerate() {
            let size = self.get(child)?.size;
            if i > 0 {
                x += spacing;
            }
            let node = self.get_mut(child)?;
            node.x = x;
            node.y = 0.0;
            x += size.width;
            width = x;
            height = height.max(size.height);
        }
        self.insert(Node::new(id.clone(), name, NodeKind::Frame, Size::new(width, height)), None)?;
        for child in children {
            let parent = self.get(child)?.parent.clone();
            match parent {
                Some(p) => self.get_mut(&p)?.children.retain(|c| c != child),
                None => self.roots.retain(|r| r != child),
            }
            self.get_mut(child)?.parent = Some(id.clone());
            self.get_mut(&id)?.children.push(child.clone());
        }
        Ok(id)
    }

    fn center_in_viewport(&mut self, id: &NodeId) -> Result<()> {
        let (cx, cy) = self.viewport_center;
        let node = self.get_mut(id)?;
        node.x = cx - node.size.width / 2.0;
        node.y = cy - node.size.height / 2.0;
        Ok(())
    }

    fn select(&mut self, ids: &[NodeId]) {
        self.selection = ids.iter().filter(|id| self.nodes.contains_key(*id)).cloned().collect();
    }

    fn selection(&self) -> Vec<NodeId> {
        self.selection.clone()
    }
}
