//! Template configuration and slot discovery.

pub mod config;
pub mod slots;

pub use config::{TemplateConfig, TemplateConfigs, TemplateKind};
pub use slots::{Slot, SlotMap, SlotRole};
