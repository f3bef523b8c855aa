use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod association;
pub mod relation;
pub mod store;
pub mod story_object;

pub use association::{Association, AssociationKind};
pub use relation::{Relation, RelationKind};
pub use store::{EntityStore, RelationStore};
pub use story_object::{Character, Faction, Plot, StoryObject, StoryObjectBase, Thread};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct StoryObjectId(pub i64);

impl fmt::Display for StoryObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies the live event that scopes every story object and relation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EventId(pub i64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub type IdSet = BTreeSet<StoryObjectId>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum StoryObjectKind {
    Character,
    Faction,
    Thread,
    Quest,
    Event,
    Place,
    Item,
    /// Relations share the object id space but are rendered as edges, never as nodes.
    Relation,
    LoreDocument,
}

impl StoryObjectKind {
    pub const ALL: [StoryObjectKind; 9] = [
        StoryObjectKind::Character,
        StoryObjectKind::Faction,
        StoryObjectKind::Thread,
        StoryObjectKind::Quest,
        StoryObjectKind::Event,
        StoryObjectKind::Place,
        StoryObjectKind::Item,
        StoryObjectKind::Relation,
        StoryObjectKind::LoreDocument,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StoryObjectKind::Character => "character",
            StoryObjectKind::Faction => "faction",
            StoryObjectKind::Thread => "thread",
            StoryObjectKind::Quest => "quest",
            StoryObjectKind::Event => "event",
            StoryObjectKind::Place => "place",
            StoryObjectKind::Item => "item",
            StoryObjectKind::Relation => "relation",
            StoryObjectKind::LoreDocument => "lore_document",
        }
    }

    /// Kinds that can become graph nodes.
    pub fn renderable() -> Vec<StoryObjectKind> {
        Self::ALL
            .into_iter()
            .filter(|kind| *kind != StoryObjectKind::Relation)
            .collect()
    }
}

impl fmt::Display for StoryObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoryObjectKind {
    type Err = EnumConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| EnumConversionError::UnknownKindName(s.to_string()))
    }
}

impl TryFrom<i32> for StoryObjectKind {
    type Error = EnumConversionError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(StoryObjectKind::Character),
            1 => Ok(StoryObjectKind::Faction),
            2 => Ok(StoryObjectKind::Thread),
            3 => Ok(StoryObjectKind::Quest),
            4 => Ok(StoryObjectKind::Event),
            5 => Ok(StoryObjectKind::Place),
            6 => Ok(StoryObjectKind::Item),
            7 => Ok(StoryObjectKind::Relation),
            8 => Ok(StoryObjectKind::LoreDocument),
            _ => Err(EnumConversionError::InvalidStoryObjectKind(value)),
        }
    }
}

/// A typed pointer at a story object. Every link in the model carries the kind of
/// both ends so traversal never has to look an id up just to learn its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StoryObjectRef {
    pub id: StoryObjectId,
    pub kind: StoryObjectKind,
}

impl StoryObjectRef {
    pub fn new(id: StoryObjectId, kind: StoryObjectKind) -> Self {
        Self { id, kind }
    }
}

/// Error type for enum conversion failures
#[derive(Error, Debug, Clone)]
pub enum EnumConversionError {
    #[error("Invalid StoryObjectKind value: {0}")]
    InvalidStoryObjectKind(i32),
    #[error("Invalid RelationKind value: {0}")]
    InvalidRelationKind(i32),
    #[error("Invalid AssociationKind value: {0}")]
    InvalidAssociationKind(i32),
    #[error("Unknown story object kind: {0}")]
    UnknownKindName(String),
}
