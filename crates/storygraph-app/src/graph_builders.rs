use super::*;

pub(super) fn seed_set(req: &GraphRequest) -> Result<SeedSet, ApiError> {
    let parse = |ids: &[ObjectId]| -> Result<IdSet, ApiError> {
        ids.iter().map(ObjectId::to_core).collect()
    };
    Ok(SeedSet {
        thread_ids: parse(&req.thread_ids)?,
        character_ids: parse(&req.character_ids)?,
        faction_ids: parse(&req.faction_ids)?,
    })
}

pub(super) fn graph_response(graph: StoryGraph) -> GraphResponse {
    let nodes = graph
        .nodes
        .into_iter()
        .map(|node| GraphNodeDto {
            id: ObjectId::from(node.id),
            node_type: NodeType::from(node.kind),
            title: node.title,
            group_id: node.group_id.map(ObjectId::from),
        })
        .collect();
    let edges = graph
        .edges
        .into_iter()
        .map(|edge| GraphEdgeDto {
            source: ObjectId::from(edge.source),
            target: ObjectId::from(edge.target),
            edge_type: match edge.edge_type {
                storygraph_graph::EdgeType::Relation => EdgeType::Relation,
                storygraph_graph::EdgeType::Implicit => EdgeType::Implicit,
            },
            title: edge.title,
        })
        .collect();
    GraphResponse { nodes, edges }
}

pub(super) fn stats_dto(stats: &StorageStats) -> StorageStatsDto {
    StorageStatsDto {
        event_count: clamp_i64_to_u32(stats.event_count),
        object_count: clamp_i64_to_u32(stats.object_count),
        association_count: clamp_i64_to_u32(stats.association_count),
        relation_count: clamp_i64_to_u32(stats.relation_count),
    }
}
