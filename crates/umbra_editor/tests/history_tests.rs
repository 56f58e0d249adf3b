//! Integration tests for the command history.
//!
//! These exercise the documented laws of the subsystem: the undo/redo
//! inverse law, stack invariants, coalescing, structural ordering, and
//! serialize/replay of whole sessions.

use std::cell::RefCell;
use std::rc::Rc;

use umbra_editor::*;
use umbra_math::Vector3;
use umbra_scene::{MeshData, MeshKind, NodeData, NodeId, SceneGraph, SceneNode};

fn editor_with_children(names: &[&str]) -> (Editor, Vec<NodeId>) {
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let ids = names
        .iter()
        .map(|&n| graph.add_node(root, SceneNode::new(n)).unwrap())
        .collect();
    (Editor::with_scene(graph), ids)
}

fn position_of(editor: &Editor, id: NodeId) -> Vector3 {
    editor.object_by_uuid(id).unwrap().transform.position
}

fn set_position(editor: &Editor, id: NodeId, to: Vector3) -> Command {
    Command::new(SetPositionCommand::new(editor.state(), id, to).unwrap())
}

fn rename(editor: &Editor, id: NodeId, to: &str) -> Command {
    Command::new(SetValueCommand::new(editor.state(), id, NodeProperty::Name(to.to_string())).unwrap())
}

#[test]
fn inverse_law_set_position() {
    let (mut editor, ids) = editor_with_children(&["target"]);
    let target = ids[0];
    assert_eq!(position_of(&editor, target), Vector3::ZERO);

    editor
        .execute(set_position(&editor, target, Vector3::new(1.0, 2.0, 3.0)))
        .unwrap();
    assert_eq!(position_of(&editor, target), Vector3::new(1.0, 2.0, 3.0));

    editor.undo().unwrap();
    assert_eq!(position_of(&editor, target), Vector3::ZERO);

    editor.redo().unwrap();
    assert_eq!(position_of(&editor, target), Vector3::new(1.0, 2.0, 3.0));
}

#[test]
fn execute_clears_redo_stack() {
    let (mut editor, ids) = editor_with_children(&["a"]);

    editor.execute(rename(&editor, ids[0], "one")).unwrap();
    editor.execute(rename(&editor, ids[0], "two")).unwrap();
    editor.undo().unwrap();
    assert!(editor.can_redo());

    editor.execute(rename(&editor, ids[0], "three")).unwrap();
    assert!(!editor.can_redo());
    assert_eq!(editor.history().undo_count(), 2);
}

#[test]
fn undo_redo_on_empty_stacks_are_noops() {
    let (mut editor, _) = editor_with_children(&["a"]);

    editor.undo().unwrap();
    editor.redo().unwrap();
    assert!(!editor.can_undo());
    assert!(!editor.can_redo());
}

#[test]
fn coalescing_merges_new_state_and_keeps_old() {
    let (mut editor, ids) = editor_with_children(&["dragged"]);
    let target = ids[0];

    editor.begin_gesture();
    editor
        .execute(set_position(&editor, target, Vector3::new(1.0, 0.0, 0.0)))
        .unwrap();
    editor
        .execute(set_position(&editor, target, Vector3::new(2.0, 0.0, 0.0)))
        .unwrap();
    editor.end_gesture();

    // one entry for the whole drag
    assert_eq!(editor.history().undo_count(), 1);
    assert_eq!(position_of(&editor, target), Vector3::new(2.0, 0.0, 0.0));

    // its old state is the pre-drag value, not the intermediate one
    editor.undo().unwrap();
    assert_eq!(position_of(&editor, target), Vector3::ZERO);
    editor.redo().unwrap();
    assert_eq!(position_of(&editor, target), Vector3::new(2.0, 0.0, 0.0));
}

#[test]
fn coalescing_stops_when_gesture_ends() {
    let (mut editor, ids) = editor_with_children(&["dragged"]);
    let target = ids[0];

    editor.begin_gesture();
    editor
        .execute(set_position(&editor, target, Vector3::new(1.0, 0.0, 0.0)))
        .unwrap();
    editor.end_gesture();
    editor
        .execute(set_position(&editor, target, Vector3::new(2.0, 0.0, 0.0)))
        .unwrap();

    assert_eq!(editor.history().undo_count(), 2);
}

#[test]
fn coalescing_requires_same_target() {
    let (mut editor, ids) = editor_with_children(&["a", "b"]);

    editor.begin_gesture();
    editor
        .execute(set_position(&editor, ids[0], Vector3::new(1.0, 0.0, 0.0)))
        .unwrap();
    editor
        .execute(set_position(&editor, ids[1], Vector3::new(2.0, 0.0, 0.0)))
        .unwrap();
    editor.end_gesture();

    assert_eq!(editor.history().undo_count(), 2);
}

#[test]
fn coalescing_requires_same_property() {
    let (mut editor, ids) = editor_with_children(&["a"]);

    editor.begin_gesture();
    editor.execute(rename(&editor, ids[0], "renamed")).unwrap();
    editor
        .execute(Command::new(
            SetValueCommand::new(editor.state(), ids[0], NodeProperty::Visible(false)).unwrap(),
        ))
        .unwrap();
    editor.end_gesture();

    assert_eq!(editor.history().undo_count(), 2);
}

#[test]
fn remove_then_undo_restores_sibling_order_and_selection() {
    let (mut editor, ids) = editor_with_children(&["a", "b", "c"]);
    let root = editor.scene().root();
    let b = ids[1];

    editor.select(Some(b));
    let cmd = Command::new(RemoveObjectCommand::new(editor.state(), b).unwrap());
    editor.execute(cmd).unwrap();

    assert_eq!(editor.scene().get(root).unwrap().children, vec![ids[0], ids[2]]);
    assert_eq!(editor.selected(), None);

    editor.undo().unwrap();
    assert_eq!(editor.scene().get(root).unwrap().children, ids);
    assert_eq!(editor.selected(), Some(b));
}

#[test]
fn add_then_undo_restores_exact_index() {
    let (mut editor, ids) = editor_with_children(&["a", "b", "c"]);
    let root = editor.scene().root();

    let data = NodeData::from_node(&SceneNode::new("inserted"));
    let inserted = data.id;
    editor
        .execute(Command::new(AddObjectCommand::new(root, data).at_index(1)))
        .unwrap();
    assert_eq!(
        editor.scene().get(root).unwrap().children,
        vec![ids[0], inserted, ids[1], ids[2]]
    );

    editor.undo().unwrap();
    assert_eq!(editor.scene().get(root).unwrap().children, ids);
    assert!(!editor.scene().contains(inserted));

    editor.redo().unwrap();
    assert_eq!(
        editor.scene().get(root).unwrap().children,
        vec![ids[0], inserted, ids[1], ids[2]]
    );
}

#[test]
fn move_then_undo_restores_both_locations() {
    let (mut editor, ids) = editor_with_children(&["a", "b", "c"]);
    let root = editor.scene().root();

    let cmd = Command::new(MoveObjectCommand::new(editor.state(), ids[2], ids[0], None).unwrap());
    editor.execute(cmd).unwrap();
    assert_eq!(editor.scene().get(root).unwrap().children, vec![ids[0], ids[1]]);
    assert_eq!(editor.scene().get(ids[0]).unwrap().children, vec![ids[2]]);

    editor.undo().unwrap();
    assert_eq!(editor.scene().get(root).unwrap().children, ids);
    assert!(editor.scene().get(ids[0]).unwrap().children.is_empty());
}

#[test]
fn multi_command_is_one_history_entry() {
    let (mut editor, ids) = editor_with_children(&["a"]);
    let target = ids[0];

    let multi = MultiCommand::new(vec![
        rename(&editor, target, "renamed"),
        set_position(&editor, target, Vector3::new(3.0, 0.0, 0.0)),
    ]);
    editor.execute(Command::new(multi).named("Rename and Move")).unwrap();

    assert_eq!(editor.history().undo_count(), 1);
    assert_eq!(editor.undo_label(), Some("Rename and Move"));
    assert_eq!(editor.object_by_uuid(target).unwrap().name, "renamed");

    editor.undo().unwrap();
    assert_eq!(editor.object_by_uuid(target).unwrap().name, "a");
    assert_eq!(position_of(&editor, target), Vector3::ZERO);
}

#[test]
fn world_matrices_follow_undo() {
    let (mut editor, ids) = editor_with_children(&["parent"]);
    let parent = ids[0];

    // child sits one unit above its parent
    let mut child_node = SceneNode::new("child");
    child_node.transform.position = Vector3::new(0.0, 1.0, 0.0);
    let child_data = NodeData::from_node(&child_node);
    let child = child_data.id;
    editor
        .execute(Command::new(AddObjectCommand::new(parent, child_data)))
        .unwrap();

    editor
        .execute(set_position(&editor, parent, Vector3::new(5.0, 0.0, 0.0)))
        .unwrap();
    assert_eq!(
        editor.object_by_uuid(child).unwrap().world_matrix.translation(),
        Vector3::new(5.0, 1.0, 0.0)
    );

    editor.undo().unwrap();
    assert_eq!(
        editor.object_by_uuid(child).unwrap().world_matrix.translation(),
        Vector3::new(0.0, 1.0, 0.0)
    );
}

#[test]
fn stale_target_undo_is_a_silent_noop() {
    let mut state = EditorState::new();
    let root = state.graph.root();
    let doomed = state.graph.add_node(root, SceneNode::new("doomed")).unwrap();
    let mut history = History::new();

    let cmd = Command::new(
        SetPositionCommand::new(&state, doomed, Vector3::new(1.0, 1.0, 1.0)).unwrap(),
    );
    history.execute(&mut state, cmd).unwrap();

    // the target vanishes behind the history's back
    state.graph.remove_node(doomed).unwrap();

    // undo completes without error and the entry still moves across
    history.undo(&mut state).unwrap();
    assert_eq!(history.undo_count(), 0);
    assert_eq!(history.redo_count(), 1);
}

#[test]
fn update_on_non_updatable_command_is_an_error() {
    let root_data = NodeData::from_node(&SceneNode::new("x"));
    let other_data = NodeData::from_node(&SceneNode::new("y"));
    let parent = NodeId::new();

    let mut a = Command::new(AddObjectCommand::new(parent, root_data));
    let b = Command::new(AddObjectCommand::new(parent, other_data));
    assert!(matches!(a.update(b), Err(CommandError::NotUpdatable(_))));
}

#[test]
fn command_ids_are_negative_and_monotonic() {
    let (editor, ids) = editor_with_children(&["a"]);
    let first = rename(&editor, ids[0], "one");
    let second = rename(&editor, ids[0], "two");

    assert!(first.id < 0);
    assert!(second.id < first.id);
}

#[test]
fn command_record_shape() {
    let (editor, ids) = editor_with_children(&["a"]);
    let cmd = set_position(&editor, ids[0], Vector3::new(1.0, 2.0, 3.0));

    let value = serde_json::to_value(&cmd).unwrap();
    assert_eq!(value["type"], "SetPosition");
    assert!(value["id"].as_i64().unwrap() < 0);
    assert_eq!(value["name"], "Set Position");
    assert!(value.get("node").is_some());
    assert!(value.get("old_position").is_some());
    assert!(value.get("new_position").is_some());

    let back: Command = serde_json::from_value(value).unwrap();
    assert_eq!(back, cmd);
}

#[test]
fn go_to_state_walks_both_directions() {
    let (mut editor, ids) = editor_with_children(&["a"]);
    let target = ids[0];

    let c1 = rename(&editor, target, "one");
    let id1 = c1.id;
    editor.execute(c1).unwrap();
    let c2 = rename(&editor, target, "two");
    editor.execute(c2).unwrap();
    let c3 = rename(&editor, target, "three");
    let id3 = c3.id;
    editor.execute(c3).unwrap();

    editor.go_to_state(id1).unwrap();
    assert_eq!(editor.object_by_uuid(target).unwrap().name, "one");

    editor.go_to_state(id3).unwrap();
    assert_eq!(editor.object_by_uuid(target).unwrap().name, "three");

    // id 0 is older than any command: roll everything back
    editor.go_to_state(0).unwrap();
    assert_eq!(editor.object_by_uuid(target).unwrap().name, "a");
}

#[test]
fn events_for_add_are_distinct() {
    let (mut editor, _) = editor_with_children(&[]);
    let root = editor.scene().root();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    editor.subscribe(move |e| sink.borrow_mut().push(e.clone()));

    let data = NodeData::from_node(&SceneNode::new("fresh"));
    let id = data.id;
    editor
        .execute(Command::new(AddObjectCommand::new(root, data)))
        .unwrap();

    let seen = seen.borrow();
    assert!(seen.contains(&EditorEvent::ObjectAdded(id)));
    assert!(seen.contains(&EditorEvent::SceneGraphChanged));
    assert!(seen.contains(&EditorEvent::HistoryChanged));
}

#[test]
fn serialize_and_replay_reproduces_the_session() {
    let (mut editor, ids) = editor_with_children(&["a"]);
    let a = ids[0];
    let root = editor.scene().root();

    // the base document, saved before the session starts
    let base = editor.scene().to_data();

    let fresh = NodeData::from_node(&SceneNode::new("b").with_mesh(MeshData::new(MeshKind::Sphere)));
    let b = fresh.id;
    editor
        .execute(Command::new(AddObjectCommand::new(root, fresh)))
        .unwrap();
    editor
        .execute(set_position(&editor, b, Vector3::new(1.0, 2.0, 3.0)))
        .unwrap();
    editor.execute(rename(&editor, a, "renamed")).unwrap();

    let final_state = editor.scene().to_data();
    let record = editor.history_to_json().unwrap();

    // a brand-new session over the reloaded base document
    let mut replayed = Editor::with_scene(SceneGraph::from_data(&base).unwrap());
    replayed.replay_history_json(&record).unwrap();

    assert_eq!(replayed.scene().to_data().root, final_state.root);

    // the restored stacks keep working
    assert_eq!(replayed.history().undo_count(), 3);
    replayed.undo().unwrap();
    assert_eq!(replayed.object_by_uuid(a).unwrap().name, "a");
}
