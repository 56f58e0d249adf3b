//! Session replay tool.
//!
//! Loads a base document and a saved history record, replays the session
//! against it, and prints the resulting scene tree. Useful for inspecting
//! what a saved edit session actually did.

use std::error::Error;
use std::path::Path;
use std::process::ExitCode;

use umbra_editor::Editor;
use umbra_scene::{NodeId, SceneGraph};

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let (scene_path, history_path) = match (args.next(), args.next()) {
        (Some(s), Some(h)) => (s, h),
        _ => {
            eprintln!("usage: umbra_replay <scene.json> <history.json>");
            return ExitCode::FAILURE;
        }
    };

    match run(Path::new(&scene_path), Path::new(&history_path)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("replay failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(scene_path: &Path, history_path: &Path) -> Result<(), Box<dyn Error>> {
    let graph = SceneGraph::load(scene_path)?;
    let mut editor = Editor::with_scene(graph);

    let record = std::fs::read_to_string(history_path)?;
    editor.replay_history_json(&record)?;

    println!(
        "{}: {} nodes, {} undo entries",
        editor.scene().name,
        editor.scene().node_count(),
        editor.history().undo_count(),
    );
    print_tree(editor.scene(), editor.scene().root(), 0);
    Ok(())
}

fn print_tree(graph: &SceneGraph, id: NodeId, depth: usize) {
    if let Some(node) = graph.get(id) {
        let p = node.transform.position;
        let mesh = node.mesh.map(|m| m.kind.name()).unwrap_or("group");
        println!(
            "{}{} ({mesh}) [{:.2}, {:.2}, {:.2}]",
            "  ".repeat(depth),
            node.name,
            p.x,
            p.y,
            p.z
        );
        for &child in &node.children {
            print_tree(graph, child, depth + 1);
        }
    }
}
