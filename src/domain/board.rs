use crate::domain::card::{Card, CardId};
use crate::domain::column::{Column, ColumnId};
use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Where a card currently sits on the board
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardLocation {
    pub column: ColumnId,
    pub column_index: usize,
    pub index: usize,
}

/// Kanban board state: an ordered sequence of columns.
///
/// A `Board` is published by the store as an immutable snapshot. Columns and
/// cards are reference counted so consecutive snapshots share everything an
/// operation did not touch; `Arc::ptr_eq` on a column tells whether it changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub columns: Vec<Arc<Column>>,
}

impl Board {
    pub fn new(columns: impl IntoIterator<Item = Column>) -> Self {
        Self {
            columns: columns.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Arc<Column>> {
        self.columns.iter().find(|column| &column.id == id)
    }

    pub fn column_index(&self, id: &ColumnId) -> Option<usize> {
        self.columns.iter().position(|column| &column.id == id)
    }

    pub fn contains_column(&self, id: &ColumnId) -> bool {
        self.column_index(id).is_some()
    }

    /// Finds the column and index holding a card
    pub fn locate_card(&self, id: &CardId) -> Option<CardLocation> {
        self.columns
            .iter()
            .enumerate()
            .find_map(|(column_index, column)| {
                column.position(id).map(|index| CardLocation {
                    column: column.id.clone(),
                    column_index,
                    index,
                })
            })
    }

    pub fn card(&self, id: &CardId) -> Option<&Arc<Card>> {
        self.columns.iter().find_map(|column| column.card(id))
    }

    pub fn contains_card(&self, id: &CardId) -> bool {
        self.card(id).is_some()
    }

    /// Total number of cards across all columns
    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|column| column.len()).sum()
    }

    /// All card IDs in board order (column by column, top to bottom)
    pub fn card_ids(&self) -> impl Iterator<Item = &CardId> {
        self.columns.iter().flat_map(|column| column.card_ids())
    }

    /// Searches cards by title, description, tags or assignee (case-insensitive).
    /// Results keep board order and carry the owning column.
    pub fn search_cards(&self, query: &str) -> Vec<(&ColumnId, &Arc<Card>)> {
        let query_lower = query.to_lowercase();

        self.columns
            .iter()
            .flat_map(|column| column.cards.iter().map(move |card| (&column.id, card)))
            .filter(|(_, card)| card.matches(&query_lower))
            .collect()
    }

    /// Checks that column IDs and card IDs are unique board-wide
    pub fn validate(&self) -> Result<()> {
        let mut column_ids = HashSet::new();
        let mut card_ids = HashSet::new();

        for column in &self.columns {
            if !column_ids.insert(&column.id) {
                return Err(BoardError::DuplicateId {
                    kind: "column",
                    id: column.id.to_string(),
                });
            }
            for card in &column.cards {
                if !card_ids.insert(&card.id) {
                    return Err(BoardError::DuplicateId {
                        kind: "card",
                        id: card.id.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}
