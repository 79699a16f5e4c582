//! End-to-end pipeline test: load rows, infer a schema, project points,
//! brush a rectangle and re-aggregate the selection per category.

use std::sync::Arc;

use egui::pos2;

use bl_core::data::{Dataset, Record};
use bl_core::events::EventBus;
use bl_core::scale::{extent, LinearScale};
use bl_core::selection::SelectionController;
use bl_data::schema::SchemaInferencer;
use bl_views::plots::utils::colors::ColorAssignment;
use bl_views::plots::utils::stats::{GroupedValues, POINT_FALLBACK_THRESHOLD};
use bl_views::AttributeChoices;

fn six_row_dataset() -> Dataset {
    let sizes = ["1", "2", "3", "4", "5", "60"];
    let grps = ["a", "a", "a", "b", "b", "b"];
    Dataset::new(
        vec!["size".into(), "grp".into()],
        sizes
            .iter()
            .zip(grps.iter())
            .map(|(s, g)| Record::new(vec![s.to_string(), g.to_string()]))
            .collect(),
    )
}

fn project_all(dataset: &Dataset, x_col: usize, y_scale_col: usize) -> Vec<Option<egui::Pos2>> {
    let xs = (0..dataset.len()).filter_map(|id| dataset.numeric_value(id, x_col));
    let (min, max) = extent(xs).unwrap();
    let x_scale = LinearScale::new((min - 1.0, max + 1.0), (0.0, 800.0));
    // Second axis reuses the same column; the test only cares that every
    // record gets a position.
    let y_scale = LinearScale::new((min - 1.0, max + 1.0), (400.0, 0.0));

    (0..dataset.len())
        .map(|id| {
            let x = dataset.numeric_value(id, x_col)?;
            let y = dataset.numeric_value(id, y_scale_col)?;
            Some(pos2(x_scale.project(x), y_scale.project(y)))
        })
        .collect()
}

#[test]
fn brushing_everything_and_aggregating_by_group_yields_two_groups() {
    let dataset = six_row_dataset();

    let schema = SchemaInferencer::new().infer(&dataset);
    let choices = AttributeChoices::defaults_for(&schema);
    assert_eq!(choices.x.as_deref(), Some("size"));
    assert_eq!(choices.color.as_deref(), Some("grp"));

    let size_col = dataset.column_index("size").unwrap();
    let projected = project_all(&dataset, size_col, size_col);

    // Brush the whole panel, dragged bottom-right to top-left.
    let mut controller = SelectionController::new(Arc::new(EventBus::new()));
    controller.begin_drag(pos2(800.0, 400.0));
    controller.move_drag(pos2(0.0, 0.0));
    controller.end_drag(&projected);

    assert!(controller.state().brushed);
    assert_eq!(controller.state().len(), 6);

    let grouped = GroupedValues::collect(
        &dataset,
        &controller.state().selected,
        choices.target.as_deref().unwrap(),
        choices.color.as_deref().unwrap(),
    );
    let stats = grouped.box_stats();

    assert_eq!(stats.len(), 2);
    let a = &stats[0];
    let b = &stats[1];
    assert_eq!(a.key, "a");
    assert_eq!(b.key, "b");

    // Each group is assessed against its own quartiles.
    assert!(a.outliers.is_empty());
    assert_eq!(a.min, 1.0);
    assert_eq!(a.max, 3.0);
    assert_eq!(b.max, 60.0);

    // Above the fallback threshold, so the view would draw real boxes.
    assert!(grouped.total_len() > POINT_FALLBACK_THRESHOLD);

    // Colors come from the combined palette in first-seen order.
    let colors = ColorAssignment::from_column(&dataset, "grp");
    assert_eq!(colors.len(), 2);
    assert_ne!(colors.color("a"), colors.color("b"));
}

#[test]
fn partial_brush_filters_the_aggregation() {
    let dataset = six_row_dataset();
    let size_col = dataset.column_index("size").unwrap();
    let projected = project_all(&dataset, size_col, size_col);

    // Select only the small values: x in [1, 5] projects left of the
    // midpoint with a domain of [0, 61].
    let x_scale = LinearScale::new((0.0, 61.0), (0.0, 800.0));
    let right_edge = x_scale.project(6.0);

    let mut controller = SelectionController::new(Arc::new(EventBus::new()));
    controller.begin_drag(pos2(0.0, 0.0));
    controller.move_drag(pos2(right_edge, 400.0));
    controller.end_drag(&projected);

    let selected = &controller.state().selected;
    assert_eq!(selected.len(), 5);
    assert!(!selected.contains(&5)); // the size=60 row sits far right

    let grouped = GroupedValues::collect(&dataset, selected, "size", "grp");
    // Five points: the view falls back to raw points, no box statistics.
    assert_eq!(grouped.total_len(), POINT_FALLBACK_THRESHOLD);

    // Group membership follows the grouping attribute, not the brush.
    let keys: Vec<&str> = grouped.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["a", "b"]);
}

#[test]
fn reload_clears_selection_but_attribute_change_does_not() {
    let dataset = six_row_dataset();
    let size_col = dataset.column_index("size").unwrap();
    let projected = project_all(&dataset, size_col, size_col);

    let mut controller = SelectionController::new(Arc::new(EventBus::new()));
    controller.begin_drag(pos2(0.0, 0.0));
    controller.move_drag(pos2(800.0, 400.0));
    controller.end_drag(&projected);
    assert_eq!(controller.state().len(), 6);

    // Attribute change: identities survive, grouping may re-bucket them.
    let before = controller.state().selected.clone();
    let regrouped = GroupedValues::collect(&dataset, &before, "size", "size");
    assert_eq!(regrouped.total_len(), 6);
    assert_eq!(controller.state().selected, before);

    // Dataset reload: selection resets to "no brush made yet".
    controller.clear();
    assert!(!controller.state().brushed);
    assert!(controller.state().is_empty());
}
