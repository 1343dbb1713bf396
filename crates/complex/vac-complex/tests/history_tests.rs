//! Undo/redo behavior: grouping, amending, pruning, capacity.

use vac_complex::{EditorConfig, Point2, Stroke, Time, VacEditor};

fn editor() -> VacEditor {
    VacEditor::new(EditorConfig::default())
}

fn line(a: (f64, f64), b: (f64, f64)) -> Stroke {
    Stroke::line(Point2::new(a.0, a.1), Point2::new(b.0, b.1), 1.0)
}

fn validate(ed: &VacEditor) {
    ed.complex().debug_validate().unwrap();
}

#[test]
fn undo_then_redo_restores_the_same_ids() {
    let mut ed = editor();
    let root = ed.root();
    let t = Time(0);
    let a = ed.create_key_vertex(Point2::new(0.0, 0.0), root, None, t).unwrap();
    let b = ed.create_key_vertex(Point2::new(10.0, 0.0), root, None, t).unwrap();
    let e = ed.create_key_open_edge(a, b, line((0.0, 0.0), (10.0, 0.0)), root, None).unwrap();

    assert!(ed.undo_one().unwrap());
    assert!(!ed.complex().contains(e));
    assert!(ed.complex().contains(a));
    assert_eq!(ed.last_diff().destroyed, vec![e]);

    assert!(ed.redo_one().unwrap());
    assert!(ed.complex().contains(e));
    assert_eq!(ed.complex().boundary(e), vec![a, b]);
    assert!(ed.complex().star(a).contains(&e));
    validate(&ed);
}

#[test]
fn undo_restores_geometry() {
    let mut ed = editor();
    let root = ed.root();
    let a = ed.create_key_vertex(Point2::new(0.0, 0.0), root, None, Time(0)).unwrap();
    ed.set_key_vertex_position(a, Point2::new(3.0, 4.0)).unwrap();
    assert_eq!(ed.complex().vertex_position(a).unwrap(), Point2::new(3.0, 4.0));

    assert!(ed.undo_one().unwrap());
    assert_eq!(ed.complex().vertex_position(a).unwrap(), Point2::new(0.0, 0.0));
    assert!(ed.redo_one().unwrap());
    assert_eq!(ed.complex().vertex_position(a).unwrap(), Point2::new(3.0, 4.0));
}

#[test]
fn each_call_is_one_implicit_group() {
    let mut ed = editor();
    let root = ed.root();
    ed.create_key_vertex(Point2::new(0.0, 0.0), root, None, Time(0)).unwrap();
    ed.create_key_vertex(Point2::new(1.0, 0.0), root, None, Time(0)).unwrap();
    ed.create_key_vertex(Point2::new(2.0, 0.0), root, None, Time(0)).unwrap();
    assert_eq!(ed.history().len(), 3);

    assert!(ed.undo_one().unwrap());
    assert!(ed.undo_one().unwrap());
    assert!(ed.undo_one().unwrap());
    assert!(!ed.undo_one().unwrap());
    // Only the root group remains.
    assert_eq!(ed.complex().len(), 1);
}

#[test]
fn explicit_group_undoes_as_one_step() {
    let mut ed = editor();
    let root = ed.root();
    let t = Time(0);
    ed.begin_group("draw stroke");
    let a = ed.create_key_vertex(Point2::new(0.0, 0.0), root, None, t).unwrap();
    let b = ed.create_key_vertex(Point2::new(10.0, 0.0), root, None, t).unwrap();
    let e = ed.create_key_open_edge(a, b, line((0.0, 0.0), (10.0, 0.0)), root, None).unwrap();
    // Undo is unavailable while the group is open.
    assert!(!ed.can_undo());
    assert!(ed.end_group());

    assert_eq!(ed.history().len(), 1);
    assert_eq!(ed.history().group_names().collect::<Vec<_>>(), vec!["draw stroke"]);

    assert!(ed.undo_one().unwrap());
    for id in [a, b, e] {
        assert!(!ed.complex().contains(id));
    }
    assert!(ed.redo_one().unwrap());
    for id in [a, b, e] {
        assert!(ed.complex().contains(id));
    }
    validate(&ed);
}

#[test]
fn nested_groups_fold_into_the_outermost() {
    let mut ed = editor();
    let root = ed.root();
    ed.begin_group("outer");
    ed.create_key_vertex(Point2::new(0.0, 0.0), root, None, Time(0)).unwrap();
    ed.begin_group("inner");
    ed.create_key_vertex(Point2::new(1.0, 0.0), root, None, Time(0)).unwrap();
    // Inner close commits nothing on its own.
    assert!(!ed.end_group());
    assert_eq!(ed.history().len(), 0);
    assert!(ed.end_group());

    assert_eq!(ed.history().len(), 1);
    assert_eq!(ed.history().group_names().collect::<Vec<_>>(), vec!["outer"]);
    assert!(ed.undo_one().unwrap());
    assert_eq!(ed.complex().len(), 1);
}

#[test]
fn empty_group_is_dropped() {
    let mut ed = editor();
    ed.begin_group("nothing");
    assert!(!ed.end_group());
    assert_eq!(ed.history().len(), 0);
    assert!(!ed.can_undo());
}

#[test]
fn amend_coalesces_successive_groups_of_the_same_name() {
    let mut ed = editor();
    let root = ed.root();
    let a = ed.create_key_vertex(Point2::new(0.0, 0.0), root, None, Time(0)).unwrap();

    // Three drag increments, each amended into the same undo step.
    for step in 1..=3 {
        ed.begin_group("drag vertex");
        ed.set_key_vertex_position(a, Point2::new(step as f64, 0.0)).unwrap();
        ed.end_group_amend();
    }

    // Creation plus one coalesced drag.
    assert_eq!(ed.history().len(), 2);
    assert_eq!(ed.complex().vertex_position(a).unwrap(), Point2::new(3.0, 0.0));

    assert!(ed.undo_one().unwrap());
    assert_eq!(ed.complex().vertex_position(a).unwrap(), Point2::new(0.0, 0.0));
    assert!(ed.redo_one().unwrap());
    assert_eq!(ed.complex().vertex_position(a).unwrap(), Point2::new(3.0, 0.0));
}

#[test]
fn amend_with_a_different_name_starts_a_new_group() {
    let mut ed = editor();
    let root = ed.root();
    let a = ed.create_key_vertex(Point2::new(0.0, 0.0), root, None, Time(0)).unwrap();

    ed.begin_group("drag vertex");
    ed.set_key_vertex_position(a, Point2::new(1.0, 0.0)).unwrap();
    ed.end_group_amend();
    ed.begin_group("nudge vertex");
    ed.set_key_vertex_position(a, Point2::new(2.0, 0.0)).unwrap();
    ed.end_group_amend();

    assert_eq!(ed.history().len(), 3);
}

#[test]
fn abort_group_reverts_its_edits() {
    let mut ed = editor();
    let root = ed.root();
    let t = Time(0);
    let a = ed.create_key_vertex(Point2::new(0.0, 0.0), root, None, t).unwrap();

    ed.begin_group("speculative");
    let b = ed.create_key_vertex(Point2::new(5.0, 0.0), root, None, t).unwrap();
    ed.set_key_vertex_position(a, Point2::new(-1.0, 0.0)).unwrap();
    ed.abort_group().unwrap();

    assert!(!ed.complex().contains(b));
    assert_eq!(ed.complex().vertex_position(a).unwrap(), Point2::new(0.0, 0.0));
    // Only the first creation stays undoable.
    assert_eq!(ed.history().len(), 1);
    assert!(ed.can_undo());
    validate(&ed);
}

#[test]
fn a_new_edit_prunes_the_redo_tail() {
    let mut ed = editor();
    let root = ed.root();
    let t = Time(0);
    ed.create_key_vertex(Point2::new(0.0, 0.0), root, None, t).unwrap();
    let b = ed.create_key_vertex(Point2::new(1.0, 0.0), root, None, t).unwrap();

    assert!(ed.undo_one().unwrap());
    assert!(ed.can_redo());
    let c = ed.create_key_vertex(Point2::new(2.0, 0.0), root, None, t).unwrap();

    assert!(!ed.can_redo());
    assert!(!ed.redo_one().unwrap());
    assert_eq!(ed.history().len(), 2);
    assert!(!ed.complex().contains(b));
    assert!(ed.complex().contains(c));
    // The pruned id is not recycled.
    assert!(c > b);
}

#[test]
fn capacity_evicts_the_oldest_group() {
    let mut ed = VacEditor::new(EditorConfig {
        history_capacity: Some(2),
    });
    let root = ed.root();
    let t = Time(0);
    let a = ed.create_key_vertex(Point2::new(0.0, 0.0), root, None, t).unwrap();
    let b = ed.create_key_vertex(Point2::new(1.0, 0.0), root, None, t).unwrap();
    let c = ed.create_key_vertex(Point2::new(2.0, 0.0), root, None, t).unwrap();

    assert_eq!(ed.history().len(), 2);
    assert!(ed.undo_one().unwrap());
    assert!(ed.undo_one().unwrap());
    assert!(!ed.undo_one().unwrap());
    // The evicted creation is no longer undoable; its vertex persists.
    assert!(ed.complex().contains(a));
    assert!(!ed.complex().contains(b));
    assert!(!ed.complex().contains(c));
}

#[test]
fn undo_redo_round_trips_a_structural_operation() {
    let mut ed = editor();
    let root = ed.root();
    let t = Time(0);
    let a = ed.create_key_vertex(Point2::new(0.0, 0.0), root, None, t).unwrap();
    let b = ed.create_key_vertex(Point2::new(10.0, 0.0), root, None, t).unwrap();
    let e = ed.create_key_open_edge(a, b, line((0.0, 0.0), (10.0, 0.0)), root, None).unwrap();

    let outcome = ed.cut_key_edge(e, &[0.5]).unwrap();

    assert!(ed.undo_one().unwrap());
    assert!(ed.complex().contains(e));
    assert_eq!(ed.complex().boundary(e), vec![a, b]);
    for id in outcome.new_vertices.iter().chain(&outcome.new_edges) {
        assert!(!ed.complex().contains(*id));
    }
    validate(&ed);

    assert!(ed.redo_one().unwrap());
    assert!(!ed.complex().contains(e));
    for id in outcome.new_vertices.iter().chain(&outcome.new_edges) {
        assert!(ed.complex().contains(*id));
    }
    validate(&ed);
}

#[test]
fn undo_redo_round_trips_a_cascading_delete() {
    let mut ed = editor();
    let root = ed.root();
    let t = Time(0);
    let a = ed.create_key_vertex(Point2::new(0.0, 0.0), root, None, t).unwrap();
    let b = ed.create_key_vertex(Point2::new(10.0, 0.0), root, None, t).unwrap();
    let e = ed.create_key_open_edge(a, b, line((0.0, 0.0), (10.0, 0.0)), root, None).unwrap();

    ed.hard_delete(a, false).unwrap();
    assert!(!ed.complex().contains(e));

    assert!(ed.undo_one().unwrap());
    assert!(ed.complex().contains(a));
    assert!(ed.complex().contains(e));
    assert_eq!(ed.complex().boundary(e), vec![a, b]);
    assert!(ed.complex().star(a).contains(&e));
    validate(&ed);

    assert!(ed.redo_one().unwrap());
    assert!(!ed.complex().contains(a));
    assert!(!ed.complex().contains(e));
    assert!(ed.complex().contains(b));
    validate(&ed);
}

#[test]
fn failed_operations_leave_no_history_entry() {
    let mut ed = editor();
    let root = ed.root();
    let a = ed.create_key_vertex(Point2::new(0.0, 0.0), root, None, Time(0)).unwrap();
    let b = ed.create_key_vertex(Point2::new(1.0, 0.0), root, None, Time(1)).unwrap();

    // Mismatched times.
    assert!(ed
        .create_key_open_edge(a, b, line((0.0, 0.0), (1.0, 0.0)), root, None)
        .is_err());
    assert_eq!(ed.history().len(), 2);
    validate(&ed);
}
