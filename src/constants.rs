//! Application constants.
//!
//! Centralizes magic numbers and configuration values for better maintainability.

/// Auto-fit solver constants.
pub mod fit {
    /// Smallest font size the solver will return.
    pub const MIN_FONT_SIZE: f64 = 8.0;

    /// Fraction of the box height a block may fill.
    pub const HEIGHT_SLACK: f64 = 0.95;

    /// Binary search stops once the interval is this narrow.
    pub const TOLERANCE: f64 = 0.5;
}

/// Template configuration defaults.
pub mod template {
    /// Max font size for templates without configuration.
    pub const DEFAULT_MAX_FONT: f64 = 80.0;

    /// Max font size in manual formatting mode without a component property.
    pub const MANUAL_MAX_FONT: f64 = 72.0;

    /// Name line size when the template leaves it unset.
    pub const DEFAULT_NAME_FONT: f64 = 60.0;

    /// Position line size when the template leaves it unset.
    pub const DEFAULT_POSITION_FONT: f64 = 50.0;

    /// Component property that overrides the max size in manual mode.
    pub const MAX_FONT_PROPERTY: &str = "Max main text";

    /// Where the shared template registry is published.
    pub const DEFAULT_TEMPLATES_URL: &str =
        "https://miriamwaldvogel.github.io/instagram-post/templates.json";
}

/// Layer names used by carousel templates.
pub mod layers {
    /// Cover headline text.
    pub const HEADLINE: &str = "Headline";

    /// Cover section label.
    pub const SECTION: &str = "Section";

    /// Combined speaker name and position text.
    pub const NAME_AND_POSITION: &str = "Name and position";

    /// Cover image fill target.
    pub const COVER_IMAGE: &str = "Dom media";

    /// Content slide background image fill target.
    pub const BACKGROUND_IMAGE: &str = "Background image";
}

/// Output container constants.
pub mod output {
    /// Name of the frame that collects generated slides.
    pub const CONTAINER_NAME: &str = "Generated Instagram Slides";

    /// Horizontal gap between generated slides.
    pub const ITEM_SPACING: f64 = 20.0;
}

/// Emphasis styling.
pub mod style {
    use crate::types::Color;

    /// Fill applied to `**bold**` ranges.
    pub const HIGHLIGHT: Color = Color { r: 1.0, g: 0.5, b: 0.0 };
}

/// Network constants.
pub mod net {
    /// Default HTTP timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
}
