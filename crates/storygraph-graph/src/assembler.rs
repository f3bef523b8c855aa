use crate::implicit::linked_kinds;
use crate::model::{GraphEdge, GraphNode};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};
use storygraph_core::{EventId, IdSet, RelationStore, StoryObject, StoryObjectId, StoryObjectKind};

/// Materialized objects grouped by kind, each id held at most once.
#[derive(Debug, Clone, Default)]
pub struct MaterializedSet {
    by_kind: BTreeMap<StoryObjectKind, Vec<StoryObject>>,
    ids: HashSet<StoryObjectId>,
}

impl MaterializedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `object` unless its id is already present.
    pub fn insert(&mut self, object: StoryObject) -> bool {
        if !self.ids.insert(object.id()) {
            return false;
        }
        self.by_kind.entry(object.kind()).or_default().push(object);
        true
    }

    pub fn extend(&mut self, objects: impl IntoIterator<Item = StoryObject>) {
        for object in objects {
            self.insert(object);
        }
    }

    pub fn objects(&self) -> impl Iterator<Item = &StoryObject> {
        self.by_kind.values().flatten()
    }

    pub fn id_set(&self) -> IdSet {
        self.ids.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct NodeBuild {
    pub nodes: Vec<GraphNode>,
    /// Edges to anything outside this set are rejected.
    pub valid_node_ids: HashSet<StoryObjectId>,
}

pub fn build_nodes(materialized: &MaterializedSet) -> NodeBuild {
    let mut build = NodeBuild::default();
    for object in materialized.objects() {
        if build.valid_node_ids.insert(object.id()) {
            build.nodes.push(GraphNode::from_object(object));
        }
    }
    build
}

/// Per-call edge bookkeeping: the first edge written for an unordered pair wins.
#[derive(Debug, Default)]
pub struct EdgeAccumulator {
    seen: HashSet<(StoryObjectId, StoryObjectId)>,
    edges: Vec<GraphEdge>,
}

impl EdgeAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edge: GraphEdge) -> bool {
        if !self.seen.insert(edge.pair_key()) {
            return false;
        }
        self.edges.push(edge);
        true
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn into_edges(self) -> Vec<GraphEdge> {
        self.edges
    }
}

/// Builds the deduplicated edge list for `materialized`.
///
/// Explicit relations are written before any implicit link, so a pair joined
/// both ways keeps its relation edge. Implicit candidates may be derived in
/// parallel; they are emitted in materialization order either way.
pub fn build_edges<R: RelationStore>(
    relations: &R,
    scope: EventId,
    materialized: &MaterializedSet,
    valid_node_ids: &HashSet<StoryObjectId>,
    parallel: bool,
) -> Result<Vec<GraphEdge>, R::Error> {
    let mut acc = EdgeAccumulator::new();

    for relation in relations.find_relations_between(scope, &materialized.id_set())? {
        let (source, target) = (relation.from.id, relation.to.id);
        if valid_node_ids.contains(&source) && valid_node_ids.contains(&target) {
            acc.push(GraphEdge::relation(source, target, &relation.title));
        }
    }

    let objects: Vec<&StoryObject> = materialized.objects().collect();
    let candidates: Vec<Vec<GraphEdge>> = if parallel {
        objects
            .par_iter()
            .map(|object| implicit_candidates(object, valid_node_ids))
            .collect()
    } else {
        objects
            .iter()
            .map(|object| implicit_candidates(object, valid_node_ids))
            .collect()
    };
    for edge in candidates.into_iter().flatten() {
        acc.push(edge);
    }

    Ok(acc.into_edges())
}

fn implicit_candidates(
    object: &StoryObject,
    valid_node_ids: &HashSet<StoryObjectId>,
) -> Vec<GraphEdge> {
    let source = object.id();
    let allowed = linked_kinds(object.kind());
    object
        .implicit_links()
        .into_iter()
        .filter(|link| {
            link.id != source
                && allowed.contains(&link.kind)
                && valid_node_ids.contains(&link.id)
        })
        .map(|link| GraphEdge::implicit(source, link.id))
        .collect()
}
