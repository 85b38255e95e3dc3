//! Add or update a template entry in a `templates.json` registry.
//!
//! Usage:
//!   `cargo run --bin add_template -- <templates.json> --name <name> [options]`
//!
//! Options:
//!   `--type slide|cover`        (default `slide`)
//!   `--section <name>`          (slides: always `all`; covers default `opinion`)
//!   `--structure "Quote 1,Quote 2"` (slides only, default `Quote 1`)
//!   `--max-font <n>`            (default 80)
//!   `--name-font <n>`           (default 60, 0 for none)
//!   `--position-font <n>`       (default 50, 0 for none)
//!   `--background-image`

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use carousel::constants::template::{DEFAULT_MAX_FONT, DEFAULT_NAME_FONT, DEFAULT_POSITION_FONT};
use carousel::template::{TemplateConfig, TemplateConfigs, TemplateKind};

fn number(flag: &str, value: Option<String>) -> Result<f64> {
    let value = value.with_context(|| format!("{flag} needs a value"))?;
    let n: f64 = value.trim().parse().with_context(|| format!("{flag}: \"{value}\" is not a number"))?;
    if !n.is_finite() || n < 0.0 {
        bail!("{flag} must be zero or positive");
    }
    Ok(n)
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let path = PathBuf::from(args.next().context("Usage: add_template <templates.json> --name <name> [options]")?);

    let mut name: Option<String> = None;
    let mut kind = TemplateKind::Slide;
    let mut section: Option<String> = None;
    let mut structure: Option<String> = None;
    let mut max_font = DEFAULT_MAX_FONT;
    let mut name_font = DEFAULT_NAME_FONT;
    let mut position_font = DEFAULT_POSITION_FONT;
    let mut background_image = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--name" => name = args.next(),
            "--type" => {
                kind = match args.next().as_deref().map(str::to_lowercase).as_deref() {
                    Some("cover") => TemplateKind::Cover,
                    _ => TemplateKind::Slide,
                };
            }
            "--section" => section = args.next(),
            "--structure" => structure = args.next(),
            "--max-font" => max_font = number(&arg, args.next())?,
            "--name-font" => name_font = number(&arg, args.next())?,
            "--position-font" => position_font = number(&arg, args.next())?,
            "--background-image" => background_image = true,
            other => bail!("unknown option {other}"),
        }
    }

    let name = name.filter(|n| !n.trim().is_empty()).context("Name is required (--name)")?;
    if max_font <= 0.0 {
        bail!("--max-font must be positive");
    }

    let (section, structure) = match kind {
        TemplateKind::Slide => {
            let layers: Vec<String> = structure
                .as_deref()
                .unwrap_or("Quote 1")
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            let layers = if layers.is_empty() { vec!["Quote 1".to_string()] } else { layers };
            ("all".to_string(), Some(layers))
        }
        TemplateKind::Cover => (section.unwrap_or_else(|| "opinion".to_string()), None),
    };

    let entry = TemplateConfig {
        kind: Some(kind),
        section: Some(section),
        max_font,
        name_font: Some(name_font),
        position_font: Some(position_font),
        background_image,
        structure,
    };

    let mut configs = TemplateConfigs::read(&path)?;
    configs.upsert(name.trim(), entry);
    configs.save(&path)?;

    println!("Updated {} with template \"{}\".", path.display(), name.trim());
    Ok(())
}
