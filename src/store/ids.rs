use crate::config::{IdStrategy, StoreConfig};
use crate::domain::{Board, CardId, ColumnId};
use uuid::Uuid;

/// Synthesizes card and column IDs that are unique on the board they are
/// generated against.
///
/// Sequential counters only ever move forward, so an ID is never handed out
/// twice by the same store even after its card was removed.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    strategy: IdStrategy,
    card_prefix: String,
    column_prefix: String,
    next_card_number: u64,
    next_column_number: u64,
}

impl IdGenerator {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            strategy: config.id_strategy,
            card_prefix: config.card_id_prefix.clone(),
            column_prefix: config.column_id_prefix.clone(),
            next_card_number: 1,
            next_column_number: 1,
        }
    }

    /// Creates a generator whose sequential counters start above every
    /// numbered ID already on `board`, so seeded IDs are never reissued
    /// even after their cards or columns are removed.
    pub fn for_board(config: &StoreConfig, board: &Board) -> Self {
        let mut ids = Self::new(config);
        ids.next_card_number = Self::next_after(
            &ids.card_prefix,
            board.card_ids().map(CardId::as_str),
        );
        ids.next_column_number = Self::next_after(
            &ids.column_prefix,
            board.columns.iter().map(|column| column.id.as_str()),
        );
        ids
    }

    fn next_after<'a>(prefix: &str, existing: impl Iterator<Item = &'a str>) -> u64 {
        existing
            .filter_map(|id| id.strip_prefix(prefix))
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .max()
            .map(|highest| highest.saturating_add(1))
            .unwrap_or(1)
    }

    /// Generates the next card ID not already present on `board`
    pub fn next_card_id(&mut self, board: &Board) -> CardId {
        loop {
            let id = CardId::new(Self::candidate(
                self.strategy,
                &self.card_prefix,
                &mut self.next_card_number,
            ));
            if !board.contains_card(&id) {
                return id;
            }
        }
    }

    /// Generates the next column ID not already present on `board`
    pub fn next_column_id(&mut self, board: &Board) -> ColumnId {
        loop {
            let id = ColumnId::new(Self::candidate(
                self.strategy,
                &self.column_prefix,
                &mut self.next_column_number,
            ));
            if !board.contains_column(&id) {
                return id;
            }
        }
    }

    fn candidate(strategy: IdStrategy, prefix: &str, counter: &mut u64) -> String {
        match strategy {
            IdStrategy::Sequential => {
                let id = format!("{}{}", prefix, counter);
                *counter += 1;
                id
            }
            IdStrategy::Random => format!("{}{}", prefix, Uuid::new_v4()),
        }
    }
}
