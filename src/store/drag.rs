use crate::domain::{CardId, ColumnId};
use crate::error::Result;
use crate::store::BoardStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What the drag-gesture collaborator reports once a gesture finishes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DragOutcome {
    /// A card dropped at `index` of `to` (post-removal coordinates)
    Move {
        card: CardId,
        from: ColumnId,
        to: ColumnId,
        index: usize,
    },
    /// A same-column drag settled into a new card order
    Reorder { column: ColumnId, order: Vec<CardId> },
    /// The gesture was aborted before dropping
    Cancelled,
}

impl BoardStore {
    /// Applies a completed drag gesture. Returns whether the board changed.
    pub fn apply_drag(&mut self, outcome: DragOutcome) -> Result<bool> {
        match outcome {
            DragOutcome::Move {
                card,
                from,
                to,
                index,
            } => self.move_card(&card, &from, &to, index),
            DragOutcome::Reorder { column, order } => self.reorder_column(&column, &order),
            DragOutcome::Cancelled => {
                debug!("drag cancelled, board left untouched");
                Ok(false)
            }
        }
    }
}
