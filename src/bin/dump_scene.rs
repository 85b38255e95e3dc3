//! Debug tool to print the node tree of a scene file.
//!
//! Usage:
//!   `cargo run --bin dump_scene -- <scene.json>`
//!
//! Numbered slots are tagged so template layer naming problems are easy to
//! spot.

use std::env;
use std::path::Path;

use carousel::scene::{MemoryScene, SceneDocument, SceneGraph};
use carousel::template::slots::numbered;
use carousel::types::NodeId;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <scene.json>", args[0]);
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    let scene = SceneDocument::load(path)
        .and_then(|doc| MemoryScene::from_document(&doc))
        .unwrap_or_else(|e| {
            eprintln!("Failed to load {}: {e}", path.display());
            std::process::exit(1);
        });

    println!("Scene: {}", path.display());
    let (x, y) = scene.viewport_center();
    println!("Viewport centre: ({x:.0}, {y:.0})");
    println!();

    for root in scene.roots() {
        dump_node(&scene, root, 0);
    }

    let selection = scene.selection();
    if !selection.is_empty() {
        println!();
        println!("Selection:");
        for id in &selection {
            if let Some(info) = scene.node(id) {
                println!("  {}", info.name);
            }
        }
    }
}

fn dump_node(scene: &MemoryScene, id: &NodeId, depth: usize) {
    let Ok(node) = scene.get(id) else { return };
    let indent = "  ".repeat(depth);
    let tag = numbered(&node.name).map(|(role, n)| format!(" [{role:?} {n}]")).unwrap_or_default();

    println!(
        "{indent}{} ({:?}, {:.0}x{:.0}){tag}",
        node.name, node.kind, node.size.width, node.size.height
    );
    if let Some(text) = &node.text {
        let preview: String = text.characters.chars().take(60).collect();
        println!(
            "{indent}  text: {preview:?} @ {:.1} {} ({:?}, {} range style(s))",
            text.font_size,
            text.font,
            text.auto_resize,
            text.ranges.len()
        );
    }
    if let Some(image) = &node.image {
        println!("{indent}  image: {image}");
    }
    for (name, value) in &node.properties {
        println!("{indent}  property {name} = {value}");
    }
    for child in scene.children(id) {
        dump_node(scene, child, depth + 1);
    }
}
