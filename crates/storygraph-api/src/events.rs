use crate::ids::EventId;
use serde::{Deserialize, Serialize};
use specta::Type;

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
#[serde(tag = "type", content = "data")]
pub enum AppEventPayload {
    // Use u32 so TS can safely represent these as `number` without BigInt.
    GraphComputed {
        scope: EventId,
        node_count: u32,
        edge_count: u32,
        duration_ms: u32,
    },
    StatusUpdate {
        message: String,
    },
}
