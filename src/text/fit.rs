//! Auto-fit font sizing.
//!
//! Each member of a group is searched independently for the largest size at
//! which its rendered height stays within 95% of its box; the group then uses
//! the smallest of those sizes so that no member overflows.

use async_trait::async_trait;

use crate::constants::fit::{HEIGHT_SLACK, MIN_FONT_SIZE, TOLERANCE};
use crate::error::Result;
use crate::scene::{FontReady, SceneGraph};
use crate::types::{AutoResize, NodeId, Size};

/// Something whose rendered height can be measured at a given font size.
#[async_trait]
pub trait Measurable: Send {
    /// Height available to the content.
    fn box_height(&self) -> f64;

    /// Rendered height at `font_size`.
    async fn rendered_height(&mut self, font_size: f64) -> Result<f64>;
}

/// Binary search state over `[MIN_FONT_SIZE, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bisection {
    low: f64,
    high: f64,
    best: f64,
}

impl Bisection {
    /// Start a search capped at `max_font_size`.
    pub const fn new(max_font_size: f64) -> Self {
        Self { low: MIN_FONT_SIZE, high: max_font_size, best: MIN_FONT_SIZE }
    }

    /// Next size to test, or `None` once the interval has converged.
    pub fn candidate(&self) -> Option<f64> {
        (self.high - self.low > TOLERANCE).then(|| self.low.midpoint(self.high))
    }

    /// Record whether `size` fitted.
    pub const fn record(&mut self, size: f64, fits: bool) {
        if fits {
            self.best = size;
            self.low = size;
        } else {
            self.high = size;
        }
    }

    /// Largest size known to fit, or the minimum if none did.
    pub const fn best(&self) -> f64 {
        self.best
    }
}

/// Whether `height` fits a box of `box_height`, keeping the slack margin.
pub const fn fits(height: f64, box_height: f64) -> bool {
    height <= box_height * HEIGHT_SLACK
}

/// Largest acceptable size for one measurable text.
pub async fn best_size<P: Measurable + ?Sized>(subject: &mut P, max_font_size: f64) -> Result<f64> {
    let box_height = subject.box_height();
    let mut search = Bisection::new(max_font_size);
    while let Some(size) = search.candidate() {
        let height = subject.rendered_height(size).await?;
        tracing::debug!("Testing size {size:.1}: height={height:.1} vs target={box_height:.1}");
        search.record(size, fits(height, box_height));
    }
    Ok(search.best())
}

/// Shared size for a group: the minimum of each member's best size.
///
/// An empty group resolves to `max_font_size`.
pub async fn solve<P: Measurable>(members: &mut [P], max_font_size: f64) -> Result<f64> {
    let mut joint = JointSize::new(max_font_size);
    for member in members.iter_mut() {
        joint.include(best_size(member, max_font_size).await?);
    }
    Ok(joint.resolve())
}

/// Running minimum over a group's per-member best sizes.
#[derive(Debug, Clone, Copy)]
struct JointSize {
    max_font_size: f64,
    size: Option<f64>,
}

impl JointSize {
    const fn new(max_font_size: f64) -> Self {
        Self { max_font_size, size: None }
    }

    fn include(&mut self, best: f64) {
        self.size = Some(self.size.map_or(best, |size| size.min(best)));
    }

    /// The shared size, or the cap when no member was included.
    fn resolve(self) -> f64 {
        self.size.unwrap_or(self.max_font_size)
    }
}

/// A text node staged for fitting, with the box it must stay inside.
#[derive(Debug, Clone, PartialEq)]
pub struct FitMember {
    /// Text node.
    pub node: NodeId,
    /// Box captured before content was injected.
    pub size: Size,
}

/// Text nodes that must end up sharing one font size.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitGroup {
    members: Vec<FitMember>,
}

impl FitGroup {
    /// Create an empty group.
    pub const fn new() -> Self {
        Self { members: Vec::new() }
    }

    /// Stage a node with its original box.
    pub fn push(&mut self, node: NodeId, size: Size) {
        self.members.push(FitMember { node, size });
    }

    /// Whether nothing was staged.
    pub const fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Find the shared size for this group without committing it.
    pub async fn solve<S: SceneGraph + ?Sized>(&self, scene: &mut S, max_font_size: f64) -> Result<f64> {
        let mut joint = JointSize::new(max_font_size);
        for member in &self.members {
            let mut text = FontReady::acquire(&mut *scene, &member.node).await?;
            let mut subject = NodeMeasure::prepare(&mut text, member.size)?;
            let best = best_size(&mut subject, max_font_size).await?;
            tracing::debug!("Best size for {}: {best:.1}", member.node);
            joint.include(best);
        }
        let size = joint.resolve();
        tracing::debug!("Final font size (minimum): {size:.1}");
        Ok(size)
    }

    /// Pin every member to its original box at `font_size`.
    pub async fn commit<S: SceneGraph + ?Sized>(&self, scene: &mut S, font_size: f64) -> Result<()> {
        for member in &self.members {
            let mut text = FontReady::acquire(&mut *scene, &member.node).await?;
            text.set_font_size(font_size)?;
            text.set_auto_resize(AutoResize::None)?;
            text.resize(member.size.width, member.size.height)?;
        }
        Ok(())
    }

    /// Solve and commit in one step, returning the applied size.
    pub async fn fit<S: SceneGraph + ?Sized>(&self, scene: &mut S, max_font_size: f64) -> Result<f64> {
        let size = self.solve(scene, max_font_size).await?;
        self.commit(scene, size).await?;
        Ok(size)
    }
}

/// Measures a text node at fixed width with height following content.
struct NodeMeasure<'h, 'a, S: SceneGraph + ?Sized> {
    text: &'h mut FontReady<'a, S>,
    box_height: f64,
}

impl<'h, 'a, S: SceneGraph + ?Sized> NodeMeasure<'h, 'a, S> {
    fn prepare(text: &'h mut FontReady<'a, S>, size: Size) -> Result<Self> {
        text.set_auto_resize(AutoResize::None)?;
        text.resize(size.width, size.height)?;
        text.set_auto_resize(AutoResize::Height)?;
        Ok(Self { text, box_height: size.height })
    }
}

#[async_trait]
impl<S: SceneGraph + ?Sized> Measurable for NodeMeasure<'_, '_, S> {
    fn box_height(&self) -> f64 {
        self.box_height
    }

    async fn rendered_height(&mut self, font_size: f64) -> Result<f64> {
        self.text.set_font_size(font_size)?;
        Ok(self.text.measure().await?.height)
    }
}
