#![allow(dead_code)]

use std::collections::HashSet;
use storygraph_core::{
    Character, EventId, Faction, Plot, Relation, RelationKind, StoryObject, StoryObjectBase,
    StoryObjectId, StoryObjectKind, StoryObjectRef, Thread,
};
use storygraph_graph::{EdgeType, StoryGraph};

pub const EVENT: EventId = EventId(1);

pub fn id(raw: i64) -> StoryObjectId {
    StoryObjectId(raw)
}

pub fn ids(raw: &[i64]) -> Vec<StoryObjectId> {
    raw.iter().copied().map(StoryObjectId).collect()
}

pub fn base(event: EventId, raw: i64, title: &str) -> StoryObjectBase {
    StoryObjectBase {
        id: StoryObjectId(raw),
        event_id: event,
        title: title.to_string(),
        description: None,
    }
}

pub fn character(raw: i64, title: &str, factions: &[i64], threads: &[i64]) -> StoryObject {
    StoryObject::Character(Character {
        base: base(EVENT, raw, title),
        factions: ids(factions),
        threads: ids(threads),
        ..Default::default()
    })
}

pub fn faction(raw: i64, title: &str, members: &[i64]) -> StoryObject {
    StoryObject::Faction(Faction {
        base: base(EVENT, raw, title),
        members: ids(members),
        ..Default::default()
    })
}

pub fn thread(raw: i64, title: &str, characters: &[i64]) -> StoryObject {
    StoryObject::Thread(Thread {
        base: base(EVENT, raw, title),
        characters: ids(characters),
        ..Default::default()
    })
}

pub fn quest(raw: i64, title: &str, thread: Option<i64>) -> StoryObject {
    StoryObject::Quest(Plot {
        base: base(EVENT, raw, title),
        thread: thread.map(StoryObjectId),
        ..Default::default()
    })
}

pub fn relation(
    raw: i64,
    from: (i64, StoryObjectKind),
    to: (i64, StoryObjectKind),
    title: &str,
) -> Relation {
    Relation {
        id: StoryObjectId(raw),
        event_id: EVENT,
        from: StoryObjectRef::new(StoryObjectId(from.0), from.1),
        to: StoryObjectRef::new(StoryObjectId(to.0), to.1),
        kind: RelationKind::Other,
        title: title.to_string(),
    }
}

pub fn node_ids(graph: &StoryGraph) -> HashSet<StoryObjectId> {
    graph.nodes.iter().map(|node| node.id).collect()
}

/// Unordered endpoint pairs with their edge type.
pub fn edge_set(graph: &StoryGraph) -> HashSet<((StoryObjectId, StoryObjectId), EdgeType)> {
    graph
        .edges
        .iter()
        .map(|edge| (edge.pair_key(), edge.edge_type))
        .collect()
}

/// No duplicate node, no duplicate unordered edge, no dangling endpoint.
pub fn well_formed_violation(graph: &StoryGraph) -> Option<String> {
    let mut nodes = HashSet::new();
    for node in &graph.nodes {
        if !nodes.insert(node.id) {
            return Some(format!("duplicate node {}", node.id));
        }
    }
    let mut pairs = HashSet::new();
    for edge in &graph.edges {
        if !pairs.insert(edge.pair_key()) {
            return Some(format!("duplicate edge {}-{}", edge.source, edge.target));
        }
        if !nodes.contains(&edge.source) || !nodes.contains(&edge.target) {
            return Some(format!("dangling edge {}-{}", edge.source, edge.target));
        }
    }
    None
}

pub fn assert_well_formed(graph: &StoryGraph) {
    if let Some(violation) = well_formed_violation(graph) {
        panic!("malformed graph: {violation}");
    }
}
