//! Brush selection: drag state machine, hit-testing and selection state
//!
//! The controller owns the single process-wide selection. Every mutation
//! goes through the transitions below; views only read.

use std::sync::Arc;

use egui::{Pos2, Rect};

use crate::events::{events::SelectionChanged, EventBus};
use crate::RecordId;

/// The current selection.
///
/// `brushed` distinguishes "the user has brushed (possibly selecting
/// nothing)" from "no brush has been made yet". Both render the same
/// placeholder downstream, but reloads and tests need the distinction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub selected: Vec<RecordId>,
    pub brushed: bool,
}

impl SelectionState {
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }
}

/// In-progress drag gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging { origin: Pos2, current: Pos2 },
}

impl DragState {
    /// The brush rectangle of an in-progress drag, normalized so it is
    /// well-formed regardless of drag direction.
    pub fn rect(&self) -> Option<Rect> {
        match self {
            DragState::Idle => None,
            DragState::Dragging { origin, current } => {
                Some(Rect::from_two_pos(*origin, *current))
            }
        }
    }
}

/// Records whose projected position falls within the closed rectangle.
///
/// `projected[i]` is the screen position of record `i`, `None` when the
/// record has no position under the current scales. Bounds are inclusive on
/// all four sides.
pub fn hit_test(projected: &[Option<Pos2>], rect: Rect) -> Vec<RecordId> {
    projected
        .iter()
        .enumerate()
        .filter_map(|(id, pos)| match pos {
            Some(p) if rect.contains(*p) => Some(id),
            _ => None,
        })
        .collect()
}

/// Owns the selection and the drag gesture that produces it.
pub struct SelectionController {
    state: SelectionState,
    drag: DragState,
    events: Arc<EventBus>,
}

impl SelectionController {
    pub fn new(events: Arc<EventBus>) -> Self {
        Self {
            state: SelectionState::default(),
            drag: DragState::Idle,
            events,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn is_selected(&self, id: RecordId) -> bool {
        self.state.selected.contains(&id)
    }

    /// `Idle -> Dragging(p, p)`. Ignored if a drag is already in progress.
    pub fn begin_drag(&mut self, at: Pos2) {
        if matches!(self.drag, DragState::Idle) {
            self.drag = DragState::Dragging {
                origin: at,
                current: at,
            };
        }
    }

    /// Update the moving corner; the origin never changes.
    pub fn move_drag(&mut self, to: Pos2) {
        if let DragState::Dragging { origin, .. } = self.drag {
            self.drag = DragState::Dragging {
                origin,
                current: to,
            };
        }
    }

    /// Finish the gesture: the selection becomes the hit-test result over
    /// the final rectangle. A drag that never moved resolves a point
    /// rectangle, which usually selects nothing - that is still a brush.
    pub fn end_drag(&mut self, projected: &[Option<Pos2>]) {
        let Some(rect) = self.drag.rect() else {
            return;
        };
        self.drag = DragState::Idle;
        self.state = SelectionState {
            selected: hit_test(projected, rect),
            brushed: true,
        };
        tracing::debug!(selected = self.state.len(), "brush selection resolved");
        self.events.emit(&SelectionChanged {
            selected_count: self.state.len(),
        });
    }

    /// Dataset reload: back to "no brush made yet".
    pub fn clear(&mut self) {
        self.drag = DragState::Idle;
        if self.state != SelectionState::default() {
            self.state = SelectionState::default();
            self.events.emit(&SelectionChanged { selected_count: 0 });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn controller() -> SelectionController {
        SelectionController::new(Arc::new(EventBus::new()))
    }

    fn grid() -> Vec<Option<Pos2>> {
        // Records 0..=3 at the corners of a 10x10 square, record 4 outside,
        // record 5 unprojectable.
        vec![
            Some(pos2(0.0, 0.0)),
            Some(pos2(10.0, 0.0)),
            Some(pos2(0.0, 10.0)),
            Some(pos2(10.0, 10.0)),
            Some(pos2(20.0, 20.0)),
            None,
        ]
    }

    #[test]
    fn hit_test_is_inclusive_on_all_sides() {
        let rect = Rect::from_two_pos(pos2(0.0, 0.0), pos2(10.0, 10.0));
        assert_eq!(hit_test(&grid(), rect), vec![0, 1, 2, 3]);
    }

    #[test]
    fn drag_direction_does_not_matter() {
        let points = grid();
        let forward = Rect::from_two_pos(pos2(0.0, 0.0), pos2(10.0, 10.0));
        let reverse = Rect::from_two_pos(pos2(10.0, 10.0), pos2(0.0, 0.0));
        assert_eq!(hit_test(&points, forward), hit_test(&points, reverse));
    }

    #[test]
    fn drag_transitions() {
        let mut ctrl = controller();
        assert_eq!(*ctrl.drag(), DragState::Idle);

        ctrl.begin_drag(pos2(1.0, 1.0));
        assert_eq!(
            *ctrl.drag(),
            DragState::Dragging {
                origin: pos2(1.0, 1.0),
                current: pos2(1.0, 1.0)
            }
        );

        ctrl.move_drag(pos2(9.0, 9.0));
        assert_eq!(
            *ctrl.drag(),
            DragState::Dragging {
                origin: pos2(1.0, 1.0),
                current: pos2(9.0, 9.0)
            }
        );

        ctrl.end_drag(&grid());
        assert_eq!(*ctrl.drag(), DragState::Idle);
    }

    #[test]
    fn end_drag_sets_selection_from_hit_test() {
        let mut ctrl = controller();
        ctrl.begin_drag(pos2(-1.0, -1.0));
        ctrl.move_drag(pos2(11.0, 11.0));
        ctrl.end_drag(&grid());

        assert!(ctrl.state().brushed);
        assert_eq!(ctrl.state().selected, vec![0, 1, 2, 3]);
    }

    #[test]
    fn point_drag_is_a_brush_that_selects_nothing() {
        let mut ctrl = controller();
        ctrl.begin_drag(pos2(5.0, 5.0));
        ctrl.end_drag(&grid());

        assert!(ctrl.state().brushed);
        assert!(ctrl.state().is_empty());
    }

    #[test]
    fn point_drag_on_a_point_selects_it() {
        let mut ctrl = controller();
        ctrl.begin_drag(pos2(10.0, 10.0));
        ctrl.end_drag(&grid());
        assert_eq!(ctrl.state().selected, vec![3]);
    }

    #[test]
    fn move_and_end_are_noops_when_idle() {
        let mut ctrl = controller();
        ctrl.move_drag(pos2(3.0, 3.0));
        ctrl.end_drag(&grid());
        assert!(!ctrl.state().brushed);
    }

    #[test]
    fn clear_resets_to_unbrushed() {
        let mut ctrl = controller();
        ctrl.begin_drag(pos2(0.0, 0.0));
        ctrl.move_drag(pos2(10.0, 10.0));
        ctrl.end_drag(&grid());
        assert!(ctrl.state().brushed);

        ctrl.clear();
        assert!(!ctrl.state().brushed);
        assert!(ctrl.state().is_empty());
    }
}
