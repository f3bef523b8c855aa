use crate::ids::{EventId, ObjectId};
use crate::types::{EdgeType, NodeType};
use serde::{Deserialize, Serialize};
use specta::Type;

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct OpenEventRequest {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct StorageStatsDto {
    // Use u32 so TS can safely represent these as `number` without BigInt.
    pub event_count: u32,
    pub object_count: u32,
    pub association_count: u32,
    pub relation_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct EventSummary {
    pub path: String,
    pub events: Vec<EventId>,
    pub stats: StorageStatsDto,
}

/// Seed selection for one graph. Empty id lists mean "no filter" for that
/// dimension; all three empty renders the whole event.
#[derive(Debug, Clone, Serialize, Deserialize, Type)]
#[serde(rename_all = "camelCase")]
pub struct GraphRequest {
    pub scope: EventId,
    #[serde(default)]
    pub thread_ids: Vec<ObjectId>,
    #[serde(default)]
    pub character_ids: Vec<ObjectId>,
    #[serde(default)]
    pub faction_ids: Vec<ObjectId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
#[serde(rename_all = "camelCase")]
pub struct GraphNodeDto {
    pub id: ObjectId,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub title: String,
    /// May name a faction or thread that is not among the returned nodes.
    pub group_id: Option<ObjectId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct GraphEdgeDto {
    pub source: ObjectId,
    pub target: ObjectId,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Type)]
pub struct GraphResponse {
    pub nodes: Vec<GraphNodeDto>,
    pub edges: Vec<GraphEdgeDto>,
}
