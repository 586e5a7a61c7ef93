use crate::domain::card::Card;
use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::Arc;

/// Fields available for sorting cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    Priority,
    DueDate,
    Assignee,
    Created,
    Updated,
}

/// Sort order direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "title" => Ok(SortField::Title),
            "priority" => Ok(SortField::Priority),
            "due" | "due-date" => Ok(SortField::DueDate),
            "assignee" => Ok(SortField::Assignee),
            "created" => Ok(SortField::Created),
            "updated" => Ok(SortField::Updated),
            _ => Err(format!(
                "Invalid sort field '{}'. Valid fields: title, priority, due-date, assignee, created, updated",
                s
            )),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            _ => Err(format!(
                "Invalid sort order '{}'. Valid orders: asc, desc",
                s
            )),
        }
    }
}

/// Sorts cards in-place by the given field and order.
///
/// The sort is stable, so cards that compare equal keep their relative
/// board order.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use kanban_core::domain::card::{Card, CardFields, CardId, Priority};
/// use kanban_core::domain::sorting::{sort_cards, SortField, SortOrder};
///
/// let mut cards = vec![
///     Arc::new(Card::from_fields(CardId::new("c1"), CardFields::new("A").with_priority(Priority::Low))),
///     Arc::new(Card::from_fields(CardId::new("c2"), CardFields::new("B").with_priority(Priority::High))),
/// ];
///
/// sort_cards(&mut cards, SortField::Priority, SortOrder::Descending);
/// assert_eq!(cards[0].id.as_str(), "c2");
/// ```
pub fn sort_cards(cards: &mut [Arc<Card>], field: SortField, order: SortOrder) {
    cards.sort_by(|a, b| {
        let cmp = match field {
            SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortField::Priority => compare_present_first(a.priority, b.priority, order),
            SortField::DueDate => {
                compare_present_first(a.due_date.as_deref(), b.due_date.as_deref(), order)
            }
            SortField::Assignee => compare_present_first(
                a.assignee.as_deref().map(str::to_lowercase),
                b.assignee.as_deref().map(str::to_lowercase),
                order,
            ),
            SortField::Created => a.created_at.cmp(&b.created_at),
            SortField::Updated => a.updated_at.cmp(&b.updated_at),
        };

        match order {
            SortOrder::Ascending => cmp,
            SortOrder::Descending => cmp.reverse(),
        }
    });
}

/// Compare optional values with None always sorting to the end.
///
/// The caller reverses the result for descending order, so the None
/// placement is pre-flipped here to survive that reversal.
fn compare_present_first<T: Ord>(a: Option<T>, b: Option<T>, order: SortOrder) -> Ordering {
    let none_last = match (a, b) {
        (Some(a), Some(b)) => return a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    match order {
        SortOrder::Ascending => none_last,
        SortOrder::Descending => none_last.reverse(),
    }
}
