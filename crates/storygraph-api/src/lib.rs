mod dto;
mod errors;
mod events;
mod ids;
mod types;

pub use dto::{
    EventSummary, GraphEdgeDto, GraphNodeDto, GraphRequest, GraphResponse, OpenEventRequest,
    StorageStatsDto,
};
pub use errors::ApiError;
pub use events::AppEventPayload;
pub use ids::{EventId, ObjectId};
pub use types::{EdgeType, NodeType};
