use crate::domain::card::{Card, CardId};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::Arc};

/// Unique identifier for a column
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ColumnId {
    type Err = crate::error::BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            Err(crate::error::BoardError::InvalidId(s.to_string()))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A board column holding an ordered sequence of cards (index 0 = top)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Advisory cap on the number of cards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default)]
    pub cards: Vec<Arc<Card>>,
}

impl Column {
    pub fn new(id: ColumnId, title: impl Into<String>) -> Self {
        Self::from_fields(id, ColumnFields::new(title))
    }

    /// Creates an empty column from caller-supplied fields and a store-assigned ID
    pub fn from_fields(id: ColumnId, fields: ColumnFields) -> Self {
        Self {
            id,
            title: fields.title,
            color: fields.color,
            limit: fields.limit,
            cards: Vec::new(),
        }
    }

    pub fn with_cards(mut self, cards: impl IntoIterator<Item = Card>) -> Self {
        self.cards.extend(cards.into_iter().map(Arc::new));
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Index of a card within this column
    pub fn position(&self, card_id: &CardId) -> Option<usize> {
        self.cards.iter().position(|card| &card.id == card_id)
    }

    pub fn card(&self, card_id: &CardId) -> Option<&Arc<Card>> {
        self.cards.iter().find(|card| &card.id == card_id)
    }

    pub fn card_ids(&self) -> impl Iterator<Item = &CardId> {
        self.cards.iter().map(|card| &card.id)
    }

    /// Checks if the column reached its limit; columns without a limit are never full
    pub fn is_full(&self) -> bool {
        self.limit
            .map(|limit| self.cards.len() >= limit)
            .unwrap_or(false)
    }

    /// Free slots before the limit is reached, or `None` for unlimited columns
    pub fn remaining_capacity(&self) -> Option<usize> {
        self.limit
            .map(|limit| limit.saturating_sub(self.cards.len()))
    }

    pub fn apply(&mut self, patch: ColumnPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(limit) = patch.limit {
            self.limit = limit;
        }
    }
}

/// Fields for a new column; the store assigns the ID
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFields {
    pub title: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ColumnFields {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Partial update for a column's presentation fields.
/// `Some(None)` clears color or limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPatch {
    pub title: Option<String>,
    pub color: Option<Option<String>>,
    pub limit: Option<Option<usize>>,
}

impl ColumnPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn color(mut self, color: Option<String>) -> Self {
        self.color = Some(color);
        self
    }

    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_with(ids: &[&str]) -> Column {
        Column::new(ColumnId::new("todo"), "To Do")
            .with_cards(ids.iter().map(|id| Card::new(CardId::new(*id), *id)))
    }

    #[test]
    fn test_column_creation() {
        let column = Column::from_fields(
            ColumnId::new("todo"),
            ColumnFields::new("To Do").with_color("#ff8800").with_limit(3),
        );

        assert_eq!(column.title, "To Do");
        assert_eq!(column.color.as_deref(), Some("#ff8800"));
        assert_eq!(column.limit, Some(3));
        assert!(column.is_empty());
    }

    #[test]
    fn test_position_and_lookup() {
        let column = column_with(&["c1", "c2", "c3"]);

        assert_eq!(column.position(&CardId::new("c2")), Some(1));
        assert!(column.position(&CardId::new("c9")).is_none());
        assert_eq!(
            column.card(&CardId::new("c3")).map(|c| c.title.as_str()),
            Some("c3")
        );
        let ids: Vec<&str> = column.card_ids().map(CardId::as_str).collect();
        assert_eq!(ids, vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn test_capacity() {
        let unlimited = column_with(&["c1", "c2"]);
        assert!(!unlimited.is_full());
        assert_eq!(unlimited.remaining_capacity(), None);

        let limited = column_with(&["c1", "c2"]).with_limit(3);
        assert!(!limited.is_full());
        assert_eq!(limited.remaining_capacity(), Some(1));

        let over = column_with(&["c1", "c2"]).with_limit(1);
        assert!(over.is_full());
        assert_eq!(over.remaining_capacity(), Some(0));

        let zero = Column::new(ColumnId::new("frozen"), "Frozen").with_limit(0);
        assert!(zero.is_full());
    }

    #[test]
    fn test_apply_patch() {
        let mut column = column_with(&["c1"]).with_limit(5);

        column.apply(
            ColumnPatch::new()
                .title("Backlog")
                .color(Some("blue".to_string()))
                .limit(None),
        );

        assert_eq!(column.id.as_str(), "todo");
        assert_eq!(column.title, "Backlog");
        assert_eq!(column.color.as_deref(), Some("blue"));
        assert_eq!(column.limit, None);
        assert_eq!(column.len(), 1);
    }

    #[test]
    fn test_column_id_parsing() {
        assert_eq!(ColumnId::from_str("done").unwrap().as_str(), "done");
        assert!(ColumnId::from_str("").is_err());
    }
}
