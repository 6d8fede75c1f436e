//! Drag-reorder coordinator.
//!
//! Tracks one gesture at a time and, on release, translates it into a
//! [`DropIntent`]. The coordinator never touches documents itself; the intent
//! is handed to `FormStore::apply_drop`.

use formwork_domain::FieldType;
use tracing::debug;
use uuid::Uuid;

/// What is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    Palette(FieldType),
    Field(Uuid),
}

/// What the pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    DropZone,
    FieldSlot(Uuid),
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source: DragSource,
        over: Option<DropTarget>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropIntent {
    AddField(FieldType),
    MoveField { field_id: Uuid, to_index: usize },
}

#[derive(Debug, Default)]
pub struct DragCoordinator {
    state: DragState,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Begins a gesture, replacing any gesture still in flight.
    pub fn start(&mut self, source: DragSource) {
        debug!(?source, "drag started");
        self.state = DragState::Dragging { source, over: None };
    }

    /// Records the candidate target. Ignored while idle.
    pub fn hover(&mut self, target: DropTarget) {
        if let DragState::Dragging { over, .. } = &mut self.state {
            *over = Some(target);
        }
    }

    pub fn cancel(&mut self) {
        debug!("drag cancelled");
        self.state = DragState::Idle;
    }

    /// Ends the gesture and returns what should happen, if anything.
    /// `current_order` is the document's field order at release time.
    pub fn release(&mut self, current_order: &[Uuid]) -> Option<DropIntent> {
        let state = std::mem::take(&mut self.state);
        let DragState::Dragging { source, over } = state else {
            return None;
        };
        let intent = match (source, over?) {
            (_, DropTarget::Outside) => None,
            (DragSource::Palette(kind), _) => Some(DropIntent::AddField(kind)),
            (DragSource::Field(field_id), target) => {
                let from = current_order.iter().position(|id| *id == field_id)?;
                let to_index = match target {
                    DropTarget::FieldSlot(slot) => {
                        current_order.iter().position(|id| *id == slot)?
                    }
                    _ => current_order.len() - 1,
                };
                (from != to_index).then_some(DropIntent::MoveField { field_id, to_index })
            }
        };
        debug!(?intent, "drag released");
        intent
    }
}

/// Moves `field_id` to `to_index` (clamped to the end), shifting the others.
/// `None` when the id is not part of `order`.
pub fn move_in_order(order: &[Uuid], field_id: Uuid, to_index: usize) -> Option<Vec<Uuid>> {
    let from = order.iter().position(|id| *id == field_id)?;
    let mut moved = order.to_vec();
    let item = moved.remove(from);
    let to_index = to_index.min(moved.len());
    moved.insert(to_index, item);
    Some(moved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn palette_drop_on_zone_or_slot_adds_field() {
        let order = ids(2);
        let mut drag = DragCoordinator::new();

        drag.start(DragSource::Palette(FieldType::Email));
        drag.hover(DropTarget::DropZone);
        assert_eq!(
            drag.release(&order),
            Some(DropIntent::AddField(FieldType::Email))
        );
        assert_eq!(drag.state(), DragState::Idle);

        drag.start(DragSource::Palette(FieldType::Text));
        drag.hover(DropTarget::FieldSlot(order[1]));
        assert_eq!(drag.release(&order), Some(DropIntent::AddField(FieldType::Text)));
    }

    #[test]
    fn releasing_outside_or_without_target_does_nothing() {
        let order = ids(2);
        let mut drag = DragCoordinator::new();

        drag.start(DragSource::Palette(FieldType::Text));
        drag.hover(DropTarget::Outside);
        assert_eq!(drag.release(&order), None);

        drag.start(DragSource::Field(order[0]));
        assert_eq!(drag.release(&order), None);

        assert_eq!(drag.release(&order), None);
    }

    #[test]
    fn field_drop_on_slot_targets_slot_index() {
        let order = ids(3);
        let mut drag = DragCoordinator::new();
        drag.start(DragSource::Field(order[0]));
        drag.hover(DropTarget::FieldSlot(order[2]));
        assert_eq!(
            drag.release(&order),
            Some(DropIntent::MoveField {
                field_id: order[0],
                to_index: 2
            })
        );
    }

    #[test]
    fn field_over_itself_yields_no_intent() {
        let order = ids(3);
        let mut drag = DragCoordinator::new();
        drag.start(DragSource::Field(order[1]));
        drag.hover(DropTarget::FieldSlot(order[1]));
        assert_eq!(drag.release(&order), None);
    }

    #[test]
    fn bare_zone_moves_to_end() {
        let order = ids(3);
        let mut drag = DragCoordinator::new();
        drag.start(DragSource::Field(order[0]));
        drag.hover(DropTarget::DropZone);
        assert_eq!(
            drag.release(&order),
            Some(DropIntent::MoveField {
                field_id: order[0],
                to_index: 2
            })
        );
    }

    #[test]
    fn new_gesture_replaces_old_one() {
        let mut drag = DragCoordinator::new();
        drag.start(DragSource::Palette(FieldType::Text));
        drag.hover(DropTarget::DropZone);
        drag.start(DragSource::Palette(FieldType::Date));
        assert_eq!(
            drag.state(),
            DragState::Dragging {
                source: DragSource::Palette(FieldType::Date),
                over: None
            }
        );
        drag.cancel();
        assert!(!drag.is_dragging());
    }

    #[test]
    fn move_in_order_matches_array_move() {
        let order = ids(4);
        let moved = move_in_order(&order, order[0], 2).expect("known id");
        assert_eq!(moved, vec![order[1], order[2], order[0], order[3]]);

        let moved = move_in_order(&order, order[3], 0).expect("known id");
        assert_eq!(moved, vec![order[3], order[0], order[1], order[2]]);

        let moved = move_in_order(&order, order[1], 99).expect("known id");
        assert_eq!(moved.last(), Some(&order[1]));

        assert!(move_in_order(&order, Uuid::new_v4(), 0).is_none());
    }
}
