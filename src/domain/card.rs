use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};
use tracing::debug;

/// Unique identifier for a card (e.g., card-1, card-2)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CardId {
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

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Card priority, ordered low < medium < high
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!(
                "Invalid priority '{}'. Valid priorities: low, medium, high",
                s
            )),
        }
    }
}

/// A kanban card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Caller-defined fields the board carries without interpreting
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Card {
    /// Serialized names of the card's own fields. Extra fields using one of
    /// these keys are dropped so they cannot shadow the real value.
    pub const RESERVED_FIELDS: &'static [&'static str] = &[
        "id",
        "title",
        "description",
        "tags",
        "assignee",
        "priority",
        "due_date",
        "created_at",
        "updated_at",
    ];

    /// Creates a new card with the given ID and title
    pub fn new(id: CardId, title: impl Into<String>) -> Self {
        Self::from_fields(id, CardFields::new(title))
    }

    /// Creates a card from caller-supplied fields and a store-assigned ID
    pub fn from_fields(id: CardId, fields: CardFields) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: fields.title,
            description: fields.description,
            tags: fields.tags,
            assignee: fields.assignee,
            priority: fields.priority,
            due_date: fields.due_date,
            created_at: now,
            updated_at: now,
            extra: without_reserved(fields.extra),
        }
    }

    /// Shallow-merges a patch into this card; the ID never changes
    pub fn apply(&mut self, patch: CardPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(assignee) = patch.assignee {
            self.assignee = assignee;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        self.extra.extend(without_reserved(patch.extra));
        self.updated_at = Utc::now();
    }

    /// Case-insensitive match over title, description, tags and assignee.
    /// `query_lower` must already be lowercased.
    pub(crate) fn matches(&self, query_lower: &str) -> bool {
        let contains = |s: &str| s.to_lowercase().contains(query_lower);

        contains(self.title.as_str())
            || self.description.as_deref().map(contains).unwrap_or(false)
            || self.tags.iter().any(|tag| contains(tag.as_str()))
            || self.assignee.as_deref().map(contains).unwrap_or(false)
    }
}

fn without_reserved(mut extra: Map<String, Value>) -> Map<String, Value> {
    extra.retain(|key, _| {
        let reserved = Card::RESERVED_FIELDS.contains(&key.as_str());
        if reserved {
            debug!(key = %key, "dropping extra field that shadows a card field");
        }
        !reserved
    });
    extra
}

/// Fields for a new card; the store assigns the ID
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardFields {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CardFields {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Partial update for a card.
///
/// Outer `None` leaves a field untouched. For optional fields the inner
/// value is written as-is, so `Some(None)` clears the field. Extra fields
/// are merged key by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub assignee: Option<Option<String>>,
    pub priority: Option<Option<Priority>>,
    pub due_date: Option<Option<String>>,
    pub extra: Map<String, Value>,
}

impl CardPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn assignee(mut self, assignee: Option<String>) -> Self {
        self.assignee = Some(assignee);
        self
    }

    pub fn priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn due_date(mut self, due_date: Option<String>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}
