//! # Kanban Core
//!
//! State core for ordered multi-column kanban boards.
//!
//! [`BoardStore`] owns the canonical board and is the only way to change it:
//! cards are added, updated, moved between or within columns, reordered and
//! removed; columns are added, updated and removed. Every change publishes a
//! new immutable [`Snapshot`] to a registered [`BoardListener`]. Rendering and
//! drag-gesture capture live outside this crate.

pub mod config;
pub mod domain;
pub mod error;
pub mod store;

// Re-export commonly used types
pub use config::{IdStrategy, StoreConfig};
pub use domain::{
    board::{Board, CardLocation},
    card::{Card, CardFields, CardId, CardPatch, Priority},
    column::{Column, ColumnFields, ColumnId, ColumnPatch},
    sorting::{SortField, SortOrder},
};
pub use error::{BoardError, Result};
pub use store::{BoardListener, BoardStore, DragOutcome, Snapshot, WatchListener};
