//! Scene graph capability interface.
//!
//! The document that stores and renders nodes belongs to the host. The
//! pipeline only sees it through [`SceneGraph`], borrowed mutably for the
//! length of one processing pass, so two passes can never interleave.

pub mod document;
pub mod measure;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AutoResize, Color, FontRef, ImageHash, NodeId, NodeKind, Size};

pub use document::{NodeSpec, SceneDocument, TextSpec};
pub use memory::MemoryScene;

/// Snapshot of a node's identity and geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    /// Node identifier.
    pub id: NodeId,
    /// Layer name.
    pub name: String,
    /// Node kind.
    pub kind: NodeKind,
    /// Current box size.
    pub size: Size,
}

/// Operations the pipeline needs from the host document.
///
/// Text mutation and measurement require the node's font to have been loaded
/// first; use [`FontReady`] to get that guarantee.
#[async_trait]
pub trait SceneGraph: Send + Sync {
    /// Look up a single node.
    fn node(&self, id: &NodeId) -> Option<NodeInfo>;

    /// All descendants of `root` in depth-first pre-order, excluding `root`.
    fn descendants(&self, root: &NodeId) -> Vec<NodeInfo>;

    /// First component with the given name anywhere in the document.
    async fn find_component(&self, name: &str) -> Result<Option<NodeId>>;

    /// Clone a component into a new instance.
    async fn create_instance(&mut self, component: &NodeId) -> Result<NodeId>;

    /// Value of a named component property on an instance.
    fn component_property(&self, instance: &NodeId, name: &str) -> Option<String>;

    /// Remove a node and its subtree.
    fn remove(&mut self, id: &NodeId) -> Result<()>;

    /// Font used by the first character of a text node.
    fn font(&self, text: &NodeId) -> Result<FontRef>;

    /// Make a font available for measurement and mutation.
    async fn load_font(&mut self, font: &FontRef) -> Result<()>;

    /// Text content of a text node.
    fn characters(&self, text: &NodeId) -> Result<String>;

    /// Replace text content, dropping per-range styling.
    fn set_characters(&mut self, text: &NodeId, characters: &str) -> Result<()>;

    /// Set the font size of the whole node.
    fn set_font_size(&mut self, text: &NodeId, size: f64) -> Result<()>;

    /// Set the font size of characters `start..end`.
    fn set_range_font_size(&mut self, text: &NodeId, start: usize, end: usize, size: f64) -> Result<()>;

    /// Set a solid fill on characters `start..end`.
    fn set_range_fill(&mut self, text: &NodeId, start: usize, end: usize, color: Color) -> Result<()>;

    /// Change how a text node sizes itself.
    fn set_auto_resize(&mut self, text: &NodeId, mode: AutoResize) -> Result<()>;

    /// Resize a node's box.
    fn resize(&mut self, id: &NodeId, width: f64, height: f64) -> Result<()>;

    /// Lay the node out and report its resulting size.
    async fn measure(&mut self, id: &NodeId) -> Result<Size>;

    /// Decode image bytes and register them with the document.
    async fn create_image(&mut self, bytes: &[u8]) -> Result<ImageHash>;

    /// Fill a shape or frame with a registered image.
    fn set_image_fill(&mut self, id: &NodeId, image: &ImageHash) -> Result<()>;

    /// Create a horizontal auto-layout frame holding `children`.
    fn create_container(&mut self, name: &str, spacing: f64, children: &[NodeId]) -> Result<NodeId>;

    /// Move a node so it is centred in the current viewport.
    fn center_in_viewport(&mut self, id: &NodeId) -> Result<()>;

    /// Replace the current selection.
    fn select(&mut self, ids: &[NodeId]);

    /// Current selection.
    fn selection(&self) -> Vec<NodeId>;
}

/// A text node whose font has been loaded.
///
/// Holding one is the only way the pipeline mutates or measures text, so the
/// font precondition holds on every path.
pub struct FontReady<'a, S: SceneGraph + ?Sized> {
    scene: &'a mut S,
    node: NodeId,
}

impl<'a, S: SceneGraph + ?Sized> FontReady<'a, S> {
    /// Load the node's font and hand back a handle for it.
    pub async fn acquire(scene: &'a mut S, node: &NodeId) -> Result<Self> {
        let font = scene.font(node)?;
        scene.load_font(&font).await?;
        Ok(Self { scene, node: node.clone() })
    }

    /// The node this handle covers.
    pub const fn node(&self) -> &NodeId {
        &self.node
    }

    /// Current text content.
    pub fn characters(&self) -> Result<String> {
        self.scene.characters(&self.node)
    }

    /// Replace text content.
    pub fn set_characters(&mut self, characters: &str) -> Result<()> {
        self.scene.set_characters(&self.node, characters)
    }

    /// Set the whole node's font size.
    pub fn set_font_size(&mut self, size: f64) -> Result<()> {
        self.scene.set_font_size(&self.node, size)
    }

    /// Size a character range.
    pub fn set_range_font_size(&mut self, start: usize, end: usize, size: f64) -> Result<()> {
        self.scene.set_range_font_size(&self.node, start, end, size)
    }

    /// Fill a character range.
    pub fn set_range_fill(&mut self, start: usize, end: usize, color: Color) -> Result<()> {
        self.scene.set_range_fill(&self.node, start, end, color)
    }

    /// Change auto-resize behaviour.
    pub fn set_auto_resize(&mut self, mode: AutoResize) -> Result<()> {
        self.scene.set_auto_resize(&self.node, mode)
    }

    /// Resize the box.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        self.scene.resize(&self.node, width, height)
    }

    /// Lay out and report the current size.
    pub async fn measure(&mut self) -> Result<Size> {
        self.scene.measure(&self.node).await
    }
}

/// Depth-first search for the first descendant matching `pred`.
pub fn find_one<S, F>(scene: &S, root: &NodeId, pred: F) -> Option<NodeInfo>
where
    S: SceneGraph + ?Sized,
    F: Fn(&NodeInfo) -> bool,
{
    scene.descendants(root).into_iter().find(pred)
}
