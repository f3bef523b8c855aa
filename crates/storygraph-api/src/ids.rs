use crate::errors::ApiError;
use serde::{Deserialize, Serialize};
use specta::Type;
use storygraph_core as core;

/// Story object id as it travels over the wire.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Type)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl ObjectId {
    pub fn to_core(&self) -> Result<core::StoryObjectId, ApiError> {
        let raw = self.0.trim();
        let parsed = raw
            .parse::<i64>()
            .map_err(|_| ApiError::invalid_argument(format!("Invalid ObjectId: {raw}")))?;
        Ok(core::StoryObjectId(parsed))
    }
}

impl From<core::StoryObjectId> for ObjectId {
    fn from(value: core::StoryObjectId) -> Self {
        Self(value.0.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Type)]
#[serde(transparent)]
pub struct EventId(pub String);

impl EventId {
    pub fn to_core(&self) -> Result<core::EventId, ApiError> {
        let raw = self.0.trim();
        let parsed = raw
            .parse::<i64>()
            .map_err(|_| ApiError::invalid_argument(format!("Invalid EventId: {raw}")))?;
        Ok(core::EventId(parsed))
    }
}

impl From<core::EventId> for EventId {
    fn from(value: core::EventId) -> Self {
        Self(value.0.to_string())
    }
}
