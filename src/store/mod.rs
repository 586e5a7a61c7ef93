//! The board store: single owner of the canonical board.
//!
//! Every mutation builds a new [`Board`] from the current snapshot, sharing
//! untouched columns and cards by `Arc`, swaps it in, bumps the revision and
//! hands the snapshot to the registered listener. Operations that reference a
//! column or card that no longer exists (stale drag state) are absorbed as
//! no-ops and publish nothing.

use crate::config::StoreConfig;
use crate::domain::{
    sort_cards, Board, Card, CardFields, CardId, CardPatch, Column, ColumnFields, ColumnId,
    ColumnPatch, SortField, SortOrder,
};
use crate::error::{BoardError, Result};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

pub mod drag;
pub mod ids;
pub mod listener;

pub use drag::DragOutcome;
pub use ids::IdGenerator;
pub use listener::{BoardListener, WatchListener};

/// An immutable, shareable view of the board at one revision
pub type Snapshot = Arc<Board>;

pub struct BoardStore {
    snapshot: Snapshot,
    revision: u64,
    config: StoreConfig,
    ids: IdGenerator,
    listener: Option<Box<dyn BoardListener>>,
}

impl fmt::Debug for BoardStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardStore")
            .field("revision", &self.revision)
            .field("config", &self.config)
            .field("columns", &self.snapshot.columns.len())
            .field("cards", &self.snapshot.card_count())
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardStore {
    /// Creates a store with an empty board and the default configuration
    pub fn new() -> Self {
        let config = StoreConfig::default();
        Self {
            snapshot: Arc::new(Board::default()),
            revision: 0,
            ids: IdGenerator::new(&config),
            config,
            listener: None,
        }
    }

    /// Creates a store with an empty board
    pub fn with_config(config: StoreConfig) -> Result<Self> {
        Self::with_board(Board::default(), config)
    }

    /// Seeds a store with an existing board after checking ID uniqueness
    pub fn with_board(board: Board, config: StoreConfig) -> Result<Self> {
        config.validate()?;
        board.validate()?;

        Ok(Self {
            ids: IdGenerator::for_board(&config, &board),
            snapshot: Arc::new(board),
            revision: 0,
            config,
            listener: None,
        })
    }

    /// The current snapshot
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.snapshot)
    }

    pub fn board(&self) -> &Board {
        &self.snapshot
    }

    /// Number of snapshots published since the store was created
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Installs the listener, replacing any previous one
    pub fn subscribe(&mut self, listener: impl BoardListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Removes and returns the current listener
    pub fn unsubscribe(&mut self) -> Option<Box<dyn BoardListener>> {
        self.listener.take()
    }

    /// Appends a new card to the end of a column.
    ///
    /// Returns `Ok(None)` when the column does not exist. Fails with
    /// `CapacityExceeded` only when limits are enforced.
    pub fn add_card(
        &mut self,
        column_id: &ColumnId,
        fields: CardFields,
    ) -> Result<Option<Arc<Card>>> {
        let column_index = match self.require_column(column_id) {
            Ok(index) => index,
            Err(err) => {
                self.skip("add_card", &err);
                return Ok(None);
            }
        };
        if let Err(err) = self.check_capacity(&self.snapshot.columns[column_index]) {
            warn!(column = %column_id, error = %err, "add rejected");
            return Err(err);
        }

        let id = self.ids.next_card_id(&self.snapshot);
        let card = Arc::new(Card::from_fields(id, fields));

        let mut columns = self.snapshot.columns.clone();
        Arc::make_mut(&mut columns[column_index])
            .cards
            .push(Arc::clone(&card));

        debug!(card = %card.id, column = %column_id, "card added");
        self.publish(Board { columns }, "add_card");
        Ok(Some(card))
    }

    /// Removes a card from a column, returning it if it was there
    pub fn remove_card(&mut self, column_id: &ColumnId, card_id: &CardId) -> Option<Arc<Card>> {
        let (column_index, position) = match self.require_card(column_id, card_id) {
            Ok(found) => found,
            Err(err) => {
                self.skip("remove_card", &err);
                return None;
            }
        };

        let mut columns = self.snapshot.columns.clone();
        let removed = Arc::make_mut(&mut columns[column_index])
            .cards
            .remove(position);

        self.publish(Board { columns }, "remove_card");
        Some(removed)
    }

    /// Shallow-merges `patch` into a card, keeping its column and index
    pub fn update_card(
        &mut self,
        column_id: &ColumnId,
        card_id: &CardId,
        patch: CardPatch,
    ) -> Option<Arc<Card>> {
        let (column_index, position) = match self.require_card(column_id, card_id) {
            Ok(found) => found,
            Err(err) => {
                self.skip("update_card", &err);
                return None;
            }
        };

        let mut columns = self.snapshot.columns.clone();
        let column = Arc::make_mut(&mut columns[column_index]);
        Arc::make_mut(&mut column.cards[position]).apply(patch);
        let updated = Arc::clone(&column.cards[position]);

        self.publish(Board { columns }, "update_card");
        Some(updated)
    }

    /// Moves a card to `new_index` of `to_column`.
    ///
    /// The index is interpreted against the destination after the card has
    /// left its source slot and is clamped to the destination length, so
    /// moving `c1` in `[c1, c2, c3]` to index 2 yields `[c2, c3, c1]`.
    /// Returns whether the board changed; stale references are no-ops.
    pub fn move_card(
        &mut self,
        card_id: &CardId,
        from_column: &ColumnId,
        to_column: &ColumnId,
        new_index: usize,
    ) -> Result<bool> {
        match self.plan_move(card_id, from_column, to_column, new_index) {
            Ok(Some(board)) => {
                debug!(
                    card = %card_id,
                    from = %from_column,
                    to = %to_column,
                    index = new_index,
                    "card moved"
                );
                self.publish(board, "move_card");
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(err) if err.is_not_found() => {
                self.skip("move_card", &err);
                Ok(false)
            }
            Err(err) => {
                warn!(card = %card_id, to = %to_column, error = %err, "move rejected");
                Err(err)
            }
        }
    }

    fn plan_move(
        &self,
        card_id: &CardId,
        from_column: &ColumnId,
        to_column: &ColumnId,
        new_index: usize,
    ) -> Result<Option<Board>> {
        let (from_index, position) = self.require_card(from_column, card_id)?;
        let to_index = self.require_column(to_column)?;

        if from_index == to_index {
            let target = new_index.min(self.snapshot.columns[from_index].len() - 1);
            if target == position {
                return Ok(None);
            }

            let mut columns = self.snapshot.columns.clone();
            let cards = &mut Arc::make_mut(&mut columns[from_index]).cards;
            let card = cards.remove(position);
            cards.insert(target, card);
            return Ok(Some(Board { columns }));
        }

        self.check_capacity(&self.snapshot.columns[to_index])?;

        let mut columns = self.snapshot.columns.clone();
        let card = Arc::make_mut(&mut columns[from_index])
            .cards
            .remove(position);
        let destination = &mut Arc::make_mut(&mut columns[to_index]).cards;
        let target = new_index.min(destination.len());
        destination.insert(target, card);

        Ok(Some(Board { columns }))
    }

    /// Replaces a column's card order with `new_order`.
    ///
    /// `new_order` must list exactly the cards already in the column; anything
    /// else is rejected with `InvalidPermutation` and the board is untouched.
    /// Returns whether the order changed.
    pub fn reorder_column(&mut self, column_id: &ColumnId, new_order: &[CardId]) -> Result<bool> {
        let column_index = match self.require_column(column_id) {
            Ok(index) => index,
            Err(err) => {
                self.skip("reorder_column", &err);
                return Ok(false);
            }
        };

        let column = &self.snapshot.columns[column_index];
        let reordered = match permute(column, new_order) {
            Ok(cards) => cards,
            Err(err) => {
                warn!(column = %column_id, error = %err, "reorder rejected");
                return Err(err);
            }
        };

        if reordered
            .iter()
            .map(|card| &card.id)
            .eq(column.card_ids())
        {
            return Ok(false);
        }

        let mut columns = self.snapshot.columns.clone();
        Arc::make_mut(&mut columns[column_index]).cards = reordered;

        self.publish(Board { columns }, "reorder_column");
        Ok(true)
    }

    /// Sorts one column's cards. Returns whether the order changed.
    pub fn sort_column(
        &mut self,
        column_id: &ColumnId,
        field: SortField,
        order: SortOrder,
    ) -> Result<bool> {
        let mut cards = match self.snapshot.column(column_id) {
            Some(column) => column.cards.clone(),
            None => {
                self.skip("sort_column", &BoardError::ColumnNotFound(column_id.to_string()));
                return Ok(false);
            }
        };

        sort_cards(&mut cards, field, order);
        let new_order: Vec<CardId> = cards.iter().map(|card| card.id.clone()).collect();

        self.reorder_column(column_id, &new_order)
    }

    /// Appends an empty column to the end of the board
    pub fn add_column(&mut self, fields: ColumnFields) -> Arc<Column> {
        let id = self.ids.next_column_id(&self.snapshot);
        let column = Arc::new(Column::from_fields(id, fields));

        let mut columns = self.snapshot.columns.clone();
        columns.push(Arc::clone(&column));

        debug!(column = %column.id, "column added");
        self.publish(Board { columns }, "add_column");
        column
    }

    /// Merges presentation fields into a column; its ID and cards stay put
    pub fn update_column(&mut self, column_id: &ColumnId, patch: ColumnPatch) -> Option<Arc<Column>> {
        let column_index = match self.require_column(column_id) {
            Ok(index) => index,
            Err(err) => {
                self.skip("update_column", &err);
                return None;
            }
        };

        let mut columns = self.snapshot.columns.clone();
        Arc::make_mut(&mut columns[column_index]).apply(patch);
        let updated = Arc::clone(&columns[column_index]);

        self.publish(Board { columns }, "update_column");
        Some(updated)
    }

    /// Removes a column together with all of its cards
    pub fn remove_column(&mut self, column_id: &ColumnId) -> Option<Arc<Column>> {
        let column_index = match self.require_column(column_id) {
            Ok(index) => index,
            Err(err) => {
                self.skip("remove_column", &err);
                return None;
            }
        };

        let mut columns = self.snapshot.columns.clone();
        let removed = columns.remove(column_index);

        debug!(column = %column_id, cards = removed.len(), "column removed");
        self.publish(Board { columns }, "remove_column");
        Some(removed)
    }

    fn require_column(&self, column_id: &ColumnId) -> Result<usize> {
        self.snapshot
            .column_index(column_id)
            .ok_or_else(|| BoardError::ColumnNotFound(column_id.to_string()))
    }

    fn require_card(&self, column_id: &ColumnId, card_id: &CardId) -> Result<(usize, usize)> {
        let column_index = self.require_column(column_id)?;
        let position = self.snapshot.columns[column_index]
            .position(card_id)
            .ok_or_else(|| BoardError::CardNotFound {
                card: card_id.to_string(),
                column: column_id.to_string(),
            })?;
        Ok((column_index, position))
    }

    fn check_capacity(&self, column: &Column) -> Result<()> {
        if !self.config.enforce_limits {
            return Ok(());
        }
        match column.limit {
            Some(limit) if column.len() >= limit => Err(BoardError::CapacityExceeded {
                column: column.id.to_string(),
                limit,
            }),
            _ => Ok(()),
        }
    }

    fn skip(&self, operation: &'static str, err: &BoardError) {
        debug!(operation, error = %err, "stale reference, operation skipped");
    }

    fn publish(&mut self, board: Board, operation: &'static str) {
        self.snapshot = Arc::new(board);
        self.revision += 1;
        trace!(
            operation,
            revision = self.revision,
            columns = self.snapshot.columns.len(),
            cards = self.snapshot.card_count(),
            "snapshot published"
        );

        if let Some(listener) = self.listener.as_mut() {
            listener.on_change(&self.snapshot);
        }
    }
}

/// Builds the column's cards in `order`, rejecting anything that is not an
/// exact permutation of the current sequence.
fn permute(column: &Column, order: &[CardId]) -> Result<Vec<Arc<Card>>> {
    let invalid = |reason: String| BoardError::InvalidPermutation {
        column: column.id.to_string(),
        reason,
    };

    let by_id: HashMap<&CardId, &Arc<Card>> =
        column.cards.iter().map(|card| (&card.id, card)).collect();
    let mut seen = HashSet::with_capacity(order.len());
    let mut reordered = Vec::with_capacity(order.len());

    for id in order {
        let card = by_id
            .get(id)
            .ok_or_else(|| invalid(format!("card {} is not in this column", id)))?;
        if !seen.insert(id) {
            return Err(invalid(format!("card {} is listed more than once", id)));
        }
        reordered.push(Arc::clone(card));
    }

    if let Some(missing) = column.card_ids().find(|id| !seen.contains(id)) {
        return Err(invalid(format!("card {} is missing", missing)));
    }

    Ok(reordered)
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        AddCard(usize),
        RemoveCard(usize),
        MoveCard { card: usize, to: usize, index: usize },
        Rotate { column: usize, by: usize },
        DropFromOrder(usize),
        AddColumn,
        RemoveColumn(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..4usize).prop_map(Op::AddCard),
            (0..16usize).prop_map(Op::RemoveCard),
            (0..16usize, 0..4usize, 0..8usize)
                .prop_map(|(card, to, index)| Op::MoveCard { card, to, index }),
            (0..4usize, 0..8usize).prop_map(|(column, by)| Op::Rotate { column, by }),
            (0..4usize).prop_map(Op::DropFromOrder),
            Just(Op::AddColumn),
            (0..4usize).prop_map(Op::RemoveColumn),
        ]
    }

    fn seeded_store() -> BoardStore {
        let card = |id: &str| Card::new(CardId::new(id), id);
        let board = Board::new(vec![
            Column::new(ColumnId::new("todo"), "Todo").with_cards(vec![card("t1"), card("t2")]),
            Column::new(ColumnId::new("doing"), "Doing").with_cards(vec![card("d1")]),
            Column::new(ColumnId::new("done"), "Done")
                .with_cards(vec![card("x1"), card("x2"), card("x3")]),
        ]);
        BoardStore::with_board(board, StoreConfig::default()).unwrap()
    }

    fn column_at(board: &Board, index: usize) -> ColumnId {
        if board.columns.is_empty() {
            ColumnId::new("ghost")
        } else {
            board.columns[index % board.columns.len()].id.clone()
        }
    }

    fn sorted_card_ids(board: &Board) -> Vec<CardId> {
        let mut ids: Vec<CardId> = board.card_ids().cloned().collect();
        ids.sort();
        ids
    }

    proptest! {
        /// Tests that ids stay unique and moves/reorders conserve the card set.
        #[test]
        fn operations_preserve_board_invariants(ops in prop::collection::vec(op_strategy(), 1..40)) {
            let mut store = seeded_store();

            for op in ops {
                let before = store.snapshot();
                let before_ids = sorted_card_ids(&before);
                let all_ids: Vec<CardId> = before.card_ids().cloned().collect();
                let mut conserving = false;

                match op {
                    Op::AddCard(column) => {
                        let column = column_at(&before, column);
                        store.add_card(&column, CardFields::new("generated")).unwrap();
                    }
                    Op::RemoveCard(card) => {
                        let id = all_ids.get(card).cloned().unwrap_or_else(|| CardId::new("ghost"));
                        let column = before
                            .locate_card(&id)
                            .map(|location| location.column)
                            .unwrap_or_else(|| column_at(&before, card));
                        store.remove_card(&column, &id);
                    }
                    Op::MoveCard { card, to, index } => {
                        let id = all_ids.get(card).cloned().unwrap_or_else(|| CardId::new("ghost"));
                        let from = before
                            .locate_card(&id)
                            .map(|location| location.column)
                            .unwrap_or_else(|| column_at(&before, card));
                        let to = column_at(&before, to);
                        // Destination length once the card has left its source slot
                        let expected = before.column(&to).map(|destination| {
                            if destination.id == from {
                                index.min(destination.len() - 1)
                            } else {
                                index.min(destination.len())
                            }
                        });
                        store.move_card(&id, &from, &to, index).unwrap();
                        conserving = true;

                        if let Some(location) = store.board().locate_card(&id) {
                            prop_assert_eq!(&location.column, &to);
                            prop_assert_eq!(Some(location.index), expected);
                        }
                    }
                    Op::Rotate { column, by } => {
                        let column = column_at(&before, column);
                        let mut order: Vec<CardId> = before
                            .column(&column)
                            .map(|c| c.card_ids().cloned().collect())
                            .unwrap_or_default();
                        if !order.is_empty() {
                            let by = by % order.len();
                            order.rotate_left(by);
                        }
                        prop_assert!(store.reorder_column(&column, &order).is_ok());
                        conserving = true;
                    }
                    Op::DropFromOrder(column) => {
                        let column = column_at(&before, column);
                        let order: Vec<CardId> = before
                            .column(&column)
                            .map(|c| c.card_ids().skip(1).cloned().collect())
                            .unwrap_or_default();
                        if before.column(&column).map(|c| !c.is_empty()).unwrap_or(false) {
                            prop_assert!(store.reorder_column(&column, &order).is_err());
                            prop_assert!(Arc::ptr_eq(&before, &store.snapshot()));
                        }
                        conserving = true;
                    }
                    Op::AddColumn => {
                        store.add_column(ColumnFields::new("generated"));
                    }
                    Op::RemoveColumn(column) => {
                        let column = column_at(&before, column);
                        store.remove_column(&column);
                    }
                }

                prop_assert!(store.board().validate().is_ok());
                if conserving {
                    prop_assert_eq!(sorted_card_ids(store.board()), before_ids);
                }
            }
        }
    }
}
