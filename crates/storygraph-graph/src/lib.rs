//! Story relationship graph engine.
//!
//! Expands a seed selection of threads, characters and factions into its
//! connected neighborhood and assembles a deduplicated node/edge graph for
//! visualization. Every call works on freshly allocated state; nothing is
//! cached between requests.

pub mod assembler;
pub mod engine;
pub mod expander;
pub mod group_tracker;
pub mod implicit;
pub mod model;

pub use assembler::{EdgeAccumulator, MaterializedSet, NodeBuild, build_edges, build_nodes};
pub use engine::StoryGraphEngine;
pub use expander::{ExpandedIds, Expansion, NeighborhoodExpander};
pub use group_tracker::GroupTracker;
pub use implicit::{ImplicitLinkResolver, linked_kinds};
pub use model::{EdgeType, EngineOptions, GraphEdge, GraphNode, GraphSummary, SeedSet, StoryGraph};

const ENGINE_TARGET: &str = "storygraph::engine";
