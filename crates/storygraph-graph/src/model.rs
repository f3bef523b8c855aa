use serde::{Deserialize, Serialize};
use std::fmt;
use storygraph_core::{IdSet, StoryObject, StoryObjectId, StoryObjectKind, StoryObjectRef};

/// Seed ids per filter dimension. Any or all may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSet {
    #[serde(default)]
    pub thread_ids: IdSet,
    #[serde(default)]
    pub character_ids: IdSet,
    #[serde(default)]
    pub faction_ids: IdSet,
}

impl SeedSet {
    pub fn is_empty(&self) -> bool {
        self.thread_ids.is_empty() && self.character_ids.is_empty() && self.faction_ids.is_empty()
    }

    pub fn dimensions(&self) -> [(StoryObjectKind, &IdSet); 3] {
        [
            (StoryObjectKind::Thread, &self.thread_ids),
            (StoryObjectKind::Character, &self.character_ids),
            (StoryObjectKind::Faction, &self.faction_ids),
        ]
    }

    pub fn refs(&self) -> Vec<StoryObjectRef> {
        self.dimensions()
            .into_iter()
            .flat_map(|(kind, ids)| ids.iter().map(move |id| StoryObjectRef::new(*id, kind)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.thread_ids.len() + self.character_ids.len() + self.faction_ids.len()
    }

    /// Seeds rebuilt from objects that actually resolved. Objects of kinds that
    /// are not a filter dimension are ignored.
    pub fn from_objects<'a>(objects: impl IntoIterator<Item = &'a StoryObject>) -> Self {
        let mut seeds = Self::default();
        for object in objects {
            let target = match object.kind() {
                StoryObjectKind::Thread => &mut seeds.thread_ids,
                StoryObjectKind::Character => &mut seeds.character_ids,
                StoryObjectKind::Faction => &mut seeds.faction_ids,
                _ => continue,
            };
            target.insert(object.id());
        }
        seeds
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    Relation,
    Implicit,
}

impl EdgeType {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeType::Relation => "relation",
            EdgeType::Implicit => "implicit",
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: StoryObjectId,
    pub kind: StoryObjectKind,
    pub title: String,
    /// Faction or thread cluster, when one could be inferred.
    ///
    /// The cluster object need not be a node of the same graph: a character
    /// reached through a thread still carries its first faction.
    pub group_id: Option<StoryObjectId>,
}

impl GraphNode {
    pub fn from_object(object: &StoryObject) -> Self {
        Self {
            id: object.id(),
            kind: object.kind(),
            title: object.title().to_string(),
            group_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: StoryObjectId,
    pub target: StoryObjectId,
    pub edge_type: EdgeType,
    pub title: Option<String>,
}

impl GraphEdge {
    pub fn relation(source: StoryObjectId, target: StoryObjectId, title: &str) -> Self {
        Self {
            source,
            target,
            edge_type: EdgeType::Relation,
            title: Some(title.to_string()),
        }
    }

    pub fn implicit(source: StoryObjectId, target: StoryObjectId) -> Self {
        Self {
            source,
            target,
            edge_type: EdgeType::Implicit,
            title: None,
        }
    }

    /// Direction-independent identity of the edge.
    pub fn pair_key(&self) -> (StoryObjectId, StoryObjectId) {
        if self.source <= self.target {
            (self.source, self.target)
        } else {
            (self.target, self.source)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub relation_edge_count: usize,
    pub implicit_edge_count: usize,
    pub grouped_node_count: usize,
}

impl StoryGraph {
    pub fn summary(&self) -> GraphSummary {
        let relation_edge_count = self
            .edges
            .iter()
            .filter(|edge| edge.edge_type == EdgeType::Relation)
            .count();
        GraphSummary {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            relation_edge_count,
            implicit_edge_count: self.edges.len() - relation_edge_count,
            grouped_node_count: self
                .nodes
                .iter()
                .filter(|node| node.group_id.is_some())
                .count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Kinds materialized when no seed is given.
    pub unfiltered_kinds: Vec<StoryObjectKind>,
    /// Annotate nodes with their faction/thread cluster.
    pub annotate_groups: bool,
    /// Derive implicit edge candidates on the rayon pool.
    pub parallel_implicit_edges: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            unfiltered_kinds: StoryObjectKind::renderable(),
            annotate_groups: true,
            parallel_implicit_edges: true,
        }
    }
}
