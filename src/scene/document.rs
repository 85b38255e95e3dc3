//! JSON form of an in-memory scene.
//!
//! The command-line tools read a document from disk, run a pass against it,
//! and write the result back in the same shape.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::memory::{MemoryScene, Node, RangeStyle, TextState};
use crate::error::{Error, Result};
use crate::types::{AutoResize, Color, FontRef, ImageHash, NodeId, NodeKind, Size};

/// Top-level scene file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDocument {
    /// Viewport centre as `[x, y]`.
    #[serde(default)]
    pub viewport_center: [f64; 2],
    /// Top-level nodes.
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    /// Names of selected nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selection: Vec<String>,
}

/// A node and its subtree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    /// Layer name.
    pub name: String,
    /// Node kind.
    #[serde(default)]
    pub kind: NodeKind,
    /// Horizontal position.
    #[serde(default)]
    pub x: f64,
    /// Vertical position.
    #[serde(default)]
    pub y: f64,
    /// Box width.
    #[serde(default)]
    pub width: f64,
    /// Box height.
    #[serde(default)]
    pub height: f64,
    /// Text content and style for text nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextSpec>,
    /// Image fill hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Component properties.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
    /// Child nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

/// Text node state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSpec {
    /// Content.
    #[serde(default)]
    pub characters: String,
    /// Base font.
    #[serde(default)]
    pub font: FontRef,
    /// Base font size.
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// Auto-resize mode.
    #[serde(default)]
    pub auto_resize: AutoResize,
    /// Per-range overrides.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ranges: Vec<RangeSpec>,
}

impl Default for TextSpec {
    fn default() -> Self {
        Self {
            characters: String::new(),
            font: FontRef::default(),
            font_size: default_font_size(),
            auto_resize: AutoResize::None,
            ranges: Vec::new(),
        }
    }
}

/// A styled character range.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeSpec {
    /// First character.
    pub start: usize,
    /// One past the last character.
    pub end: usize,
    /// Font size override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Fill override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
}

const fn default_font_size() -> f64 {
    24.0
}

impl NodeSpec {
    fn sized(name: &str, kind: NodeKind, width: f64, height: f64) -> Self {
        Self { name: name.to_string(), kind, width, height, ..Self::default() }
    }

    /// A text layer with default styling.
    pub fn text(name: &str, characters: &str, width: f64, height: f64) -> Self {
        Self {
            text: Some(TextSpec { characters: characters.to_string(), ..TextSpec::default() }),
            ..Self::sized(name, NodeKind::Text, width, height)
        }
    }

    /// A component holding `children`.
    pub fn component(name: &str, width: f64, height: f64, children: Vec<Self>) -> Self {
        Self { children, ..Self::sized(name, NodeKind::Component, width, height) }
    }

    /// A frame holding `children`.
    pub fn frame(name: &str, width: f64, height: f64, children: Vec<Self>) -> Self {
        Self { children, ..Self::sized(name, NodeKind::Frame, width, height) }
    }

    /// A rectangle.
    pub fn rectangle(name: &str, width: f64, height: f64) -> Self {
        Self::sized(name, NodeKind::Rectangle, width, height)
    }

    /// An ellipse.
    pub fn ellipse(name: &str, width: f64, height: f64) -> Self {
        Self::sized(name, NodeKind::Ellipse, width, height)
    }

    /// Set a component property.
    #[must_use]
    pub fn with_property(mut self, name: &str, value: &str) -> Self {
        self.properties.insert(name.to_string(), value.to_string());
        self
    }
}

impl SceneDocument {
    /// Read a document from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs_err::read_to_string(path).map_err(|e| Error::io(e, path.to_path_buf()))?;
        serde_json::from_str(&raw).map_err(|e| Error::parse(e.to_string(), path.to_path_buf()))
    }

    /// Write the document as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        fs_err::write(path, json).map_err(|e| Error::io(e, path.to_path_buf()))
    }
}

impl MemoryScene {
    /// Build a scene from its JSON form.
    pub fn from_document(doc: &SceneDocument) -> Result<Self> {
        let mut scene = Self::new();
        let [x, y] = doc.viewport_center;
        scene.set_viewport_center(x, y);
        for spec in &doc.nodes {
            scene.insert_spec(spec, None)?;
        }
        let selection: Vec<NodeId> = doc
            .selection
            .iter()
            .map(|name| {
                scene
                    .find_by_name(name)
                    .ok_or_else(|| Error::scene(format!("selected node \"{name}\" does not exist")))
            })
            .collect::<Result<_>>()?;
        crate::scene::SceneGraph::select(&mut scene, &selection);
        Ok(scene)
    }

    /// Capture the scene in its JSON form.
    pub fn to_document(&self) -> SceneDocument {
        let (x, y) = self.viewport_center();
        SceneDocument {
            viewport_center: [x, y],
            nodes: self.roots().iter().filter_map(|id| self.spec_of(id)).collect(),
            selection: crate::scene::SceneGraph::selection(self)
                .iter()
                .filter_map(|id| self.get(id).ok().map(|n| n.name.clone()))
                .collect(),
        }
    }

    fn insert_spec(&mut self, spec: &NodeSpec, parent: Option<&NodeId>) -> Result<NodeId> {
        let id = self.allocate_id();
        let mut node = Node::new(id, &spec.name, spec.kind, Size::new(spec.width, spec.height));
        node.x = spec.x;
        node.y = spec.y;
        node.properties.clone_from(&spec.properties);
        node.image = spec.image.clone().map(ImageHash);
        node.text = match (&spec.text, spec.kind) {
            (Some(t), NodeKind::Text) => Some(TextState {
                characters: t.characters.clone(),
                font: t.font.clone(),
                font_size: t.font_size,
                auto_resize: t.auto_resize,
                ranges: t
                    .ranges
                    .iter()
                    .map(|r| RangeStyle { start: r.start, end: r.end, font_size: r.font_size, fill: r.fill })
                    .collect(),
            }),
            (None, NodeKind::Text) => Some(TextState {
                characters: String::new(),
                font: FontRef::default(),
                font_size: default_font_size(),
                auto_resize: AutoResize::None,
                ranges: Vec::new(),
            }),
            (Some(_), kind) => {
                return Err(Error::scene(format!("node \"{}\" of kind {kind:?} cannot carry text", spec.name)));
            }
            (None, _) => None,
        };
        if !spec.children.is_empty() && !spec.kind.is_container() {
            return Err(Error::scene(format!("node \"{}\" cannot have children", spec.name)));
        }
        let id = self.insert(node, parent)?;
        for child in &spec.children {
            self.insert_spec(child, Some(&id))?;
        }
        Ok(id)
    }

    fn spec_of(&self, id: &NodeId) -> Option<NodeSpec> {
        let node = self.get(id).ok()?;
        Some(NodeSpec {
            name: node.name.clone(),
            kind: node.kind,
            x: node.x,
            y: node.y,
            width: node.size.width,
            height: node.size.height,
            text: node.text.as_ref().map(|t| TextSpec {
                characters: t.characters.clone(),
                font: t.font.clone(),
                font_size: t.font_size,
                auto_resize: t.auto_resize,
                ranges: t
                    .ranges
                    .iter()
                    .map(|r| RangeSpec { start: r.start, end: r.end, font_size: r.font_size, fill: r.fill })
                    .collect(),
            }),
            image: node.image.as_ref().map(|h| h.0.clone()),
            properties: node.properties.clone(),
            children: node.children.iter().filter_map(|c| self.spec_of(c)).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::scene::SceneGraph;

    const DOC: &str = r#"{
        "viewportCenter": [500, 400],
        "nodes": [
            {
                "name": "Two chunk quote",
                "kind": "component",
                "width": 1080,
                "height": 1350,
                "children": [
                    { "name": "Quote 1", "kind": "text", "width": 900, "height": 400,
                      "text": { "characters": "placeholder", "fontSize": 40 } },
                    { "name": "Background image", "kind": "rectangle", "width": 1080, "height": 1350 }
                ]
            }
        ],
        "selection": ["Two chunk quote"]
    }"#;

    #[test]
    fn loads_nested_nodes() {
        let doc: SceneDocument = serde_json::from_str(DOC).unwrap();
        let scene = MemoryScene::from_document(&doc).unwrap();

        let root = scene.roots()[0].clone();
        let names: Vec<_> = scene.descendants(&root).into_iter().map(|n| n.name).collect();
        assert_eq!(names, vec!["Quote 1", "Background image"]);
        assert_eq!(scene.selection(), vec![root]);
        assert_eq!(scene.viewport_center(), (500.0, 400.0));
    }

    #[test]
    fn round_trips_through_json() {
        let doc: SceneDocument = serde_json::from_str(DOC).unwrap();
        let scene = MemoryScene::from_document(&doc).unwrap();
        let again = scene.to_document();

        assert_eq!(again.nodes.len(), 1);
        let quote = &again.nodes[0].children[0];
        assert_eq!(quote.text.as_ref().unwrap().characters, "placeholder");
        assert_eq!(again.selection, vec!["Two chunk quote".to_string()]);
    }

    #[test]
    fn rejects_children_on_leaf_nodes() {
        let doc = SceneDocument {
            nodes: vec![NodeSpec {
                name: "Rect".into(),
                kind: NodeKind::Rectangle,
                children: vec![NodeSpec::default()],
                ..NodeSpec::default()
            }],
            ..SceneDocument::default()
        };
        assert!(MemoryScene::from_document(&doc).is_err());
    }

    #[test]
    fn saves_and_loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        let doc: SceneDocument = serde_json::from_str(DOC).unwrap();
        doc.save(&path).unwrap();
        let loaded = SceneDocument::load(&path).unwrap();
        assert_eq!(loaded.nodes[0].name, "Two chunk quote");
    }
}
