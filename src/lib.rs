//! `Carousel` - Instagram carousel slides from JSON.
//!
//! This crate clones named template components, fills their slots with text
//! and images, and auto-fits text so every block stays inside its box.


// Re-export public modules for use in integration tests and as a library
pub mod config;
pub mod constants;
pub mod error;
pub mod pipeline;
pub mod relay;
pub mod scene;
pub mod services;
pub mod template;
pub mod text;
pub mod types;
