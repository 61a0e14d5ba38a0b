use super::{DateWindow, SelectionMode};
use crate::model::ActivityId;

pub(super) fn in_window(window: Option<&DateWindow>, ts: i64) -> bool {
    window.map_or(true, |w| w.contains(ts))
}

/// Règle de participation : date attendue non nulle, puis prédicat du mode.
pub(super) fn qualifies(id: ActivityId, expected: i64, mode: &SelectionMode) -> bool {
    if expected == 0 {
        return false;
    }
    match mode {
        SelectionMode::AllActivities { window } => in_window(window.as_ref(), expected),
        SelectionMode::SelectedActivities(ids) => ids.contains(&id),
    }
}
