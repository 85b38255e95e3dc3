//! Core type definitions shared by the scene graph and the pipeline.
//!
//! Newtype wrappers keep node identifiers and image hashes from being mixed
//! with arbitrary strings at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scene graph node identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a new `NodeId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to an image registered with the scene graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHash(pub String);

impl fmt::Display for ImageHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of a scene node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Plain container.
    #[default]
    Frame,
    /// Reusable template definition.
    Component,
    /// Clone of a component.
    Instance,
    /// Grouping without its own geometry.
    Group,
    /// Text layer.
    Text,
    /// Rectangle shape.
    Rectangle,
    /// Ellipse shape.
    Ellipse,
}

impl NodeKind {
    /// Whether nodes of this kind can hold children.
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Frame | Self::Component | Self::Instance | Self::Group)
    }

    /// Whether an image fill can be applied to this kind.
    pub const fn accepts_image_fill(self) -> bool {
        matches!(self, Self::Frame | Self::Rectangle | Self::Ellipse)
    }
}

/// How a text node adapts its box to its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AutoResize {
    /// Fixed box.
    #[default]
    None,
    /// Fixed width, height follows content.
    Height,
    /// Both dimensions follow content.
    WidthAndHeight,
}

/// Font family and style pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontRef {
    /// Family name, e.g. "Inter".
    pub family: String,
    /// Style name, e.g. "Bold".
    pub style: String,
}

impl FontRef {
    /// Create a font reference.
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self { family: family.into(), style: style.into() }
    }
}

impl Default for FontRef {
    fn default() -> Self {
        Self::new("Inter", "Regular")
    }
}

impl fmt::Display for FontRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.style)
    }
}

/// RGB colour with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
}

/// Width and height of a node box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
}

impl Size {
    /// Create a size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}
