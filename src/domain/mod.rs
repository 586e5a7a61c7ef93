pub mod board;
pub mod card;
pub mod column;
pub mod sorting;

pub use board::{Board, CardLocation};
pub use card::{Card, CardFields, CardId, CardPatch, Priority};
pub use column::{Column, ColumnFields, ColumnId, ColumnPatch};
pub use sorting::{sort_cards, SortField, SortOrder};
