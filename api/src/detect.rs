//! Change detection between consecutive score polls.

use crate::{GameStatus, ScoresSnapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Changed(ScoresSnapshot),
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub change: Change,
    pub any_in_progress: bool,
}

/// Compare two snapshots by ordered structural equality. A reordering of the
/// same games counts as a change.
pub fn detect(previous: &ScoresSnapshot, current: ScoresSnapshot) -> Detection {
    let any_in_progress = any_in_progress(current.iter().map(|line| &line.status));
    let change = if *previous == current {
        Change::Unchanged
    } else {
        Change::Changed(current)
    };
    Detection { change, any_in_progress }
}

/// True if any status is neither exactly `Final` nor exactly `Scheduled`.
pub fn any_in_progress<'a>(statuses: impl IntoIterator<Item = &'a GameStatus>) -> bool {
    statuses.into_iter().any(GameStatus::is_live)
}
