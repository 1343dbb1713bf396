use serde_json::to_string_pretty;
use vac_complex::{Cycle, EditorConfig, HalfEdge, Point2, Stroke, Time, VacEditor};

fn main() -> anyhow::Result<()> {
    let mut ed = VacEditor::new(EditorConfig::default());
    let root = ed.root();
    let t = Time(0);

    // Sketch one stroke with a face on it.
    ed.begin_group("draw shape");
    let a = ed.create_key_vertex(Point2::new(0.0, 0.0), root, None, t)?;
    let b = ed.create_key_vertex(Point2::new(10.0, 0.0), root, None, t)?;
    let top = ed.create_key_open_edge(
        a,
        b,
        Stroke::line(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0), 2.0),
        root,
        None,
    )?;
    let bottom = ed.create_key_open_edge(
        b,
        a,
        Stroke::line(Point2::new(10.0, 0.0), Point2::new(0.0, 0.0), 2.0),
        root,
        None,
    )?;
    ed.create_key_face(
        vec![Cycle::Halfedges(vec![
            HalfEdge::new(top, true),
            HalfEdge::new(bottom, true),
        ])],
        root,
        None,
        t,
    )?;
    ed.end_group();

    // Split the top edge and report the structural changes.
    let outcome = ed.cut_key_edge(top, &[0.5])?;
    println!(
        "cut produced vertices {:?}, edges {:?}",
        outcome.new_vertices, outcome.new_edges
    );
    println!("diff:\n{}", to_string_pretty(ed.last_diff())?);

    // One undo takes the whole cut back; another takes the whole sketch.
    ed.undo_one()?;
    ed.undo_one()?;
    println!("after undo, {} nodes remain", ed.complex().len());
    Ok(())
}
