use crate::{EnumConversionError, EventId, StoryObjectId, StoryObjectRef};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum RelationKind {
    Friend,
    Enemy,
    Family,
    Romance,
    Rival,
    Ally,
    Mentor,
    #[default]
    Other,
}

impl TryFrom<i32> for RelationKind {
    type Error = EnumConversionError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RelationKind::Friend),
            1 => Ok(RelationKind::Enemy),
            2 => Ok(RelationKind::Family),
            3 => Ok(RelationKind::Romance),
            4 => Ok(RelationKind::Rival),
            5 => Ok(RelationKind::Ally),
            6 => Ok(RelationKind::Mentor),
            7 => Ok(RelationKind::Other),
            _ => Err(EnumConversionError::InvalidRelationKind(value)),
        }
    }
}

/// A stored, directed, typed edge between two story objects of the same event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub id: StoryObjectId,
    pub event_id: EventId,
    pub from: StoryObjectRef,
    pub to: StoryObjectRef,
    #[serde(default)]
    pub kind: RelationKind,
    pub title: String,
}
