use crate::ENGINE_TARGET;
use crate::assembler::{MaterializedSet, build_edges, build_nodes};
use crate::expander::{Expansion, NeighborhoodExpander};
use crate::group_tracker::GroupTracker;
use crate::model::{EngineOptions, SeedSet, StoryGraph};
use std::time::Instant;
use storygraph_core::{EntityStore, EventId, RelationStore, StoryObjectKind};
use tracing::debug;

/// Entry point: seeds in, deduplicated node/edge graph out.
///
/// Holds only borrowed read-only stores and options, so one engine may serve
/// concurrent requests. All per-request state is allocated inside
/// [`StoryGraphEngine::compute_graph`].
pub struct StoryGraphEngine<'a, E, R> {
    entities: &'a E,
    relations: &'a R,
    options: EngineOptions,
}

impl<'a, E, R> StoryGraphEngine<'a, E, R>
where
    E: EntityStore,
    R: RelationStore<Error = E::Error>,
{
    pub fn new(entities: &'a E, relations: &'a R) -> Self {
        Self::with_options(entities, relations, EngineOptions::default())
    }

    pub fn with_options(entities: &'a E, relations: &'a R, options: EngineOptions) -> Self {
        Self {
            entities,
            relations,
            options,
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Computes the graph around `seeds` in `scope`.
    ///
    /// With no seeds every object of the configured kinds in scope is rendered.
    /// Seeds that resolve to nothing are dropped; if none resolve the graph is
    /// empty. Only store failures are returned as errors.
    pub fn compute_graph(&self, scope: EventId, seeds: &SeedSet) -> Result<StoryGraph, E::Error> {
        let started_at = Instant::now();
        let materialized = if seeds.is_empty() {
            self.materialize_all(scope)?
        } else {
            match self.materialize_neighborhood(scope, seeds)? {
                Some(materialized) => materialized,
                None => {
                    debug!(
                        target: ENGINE_TARGET,
                        scope = scope.0,
                        seeds = seeds.len(),
                        "No seed resolved in scope"
                    );
                    return Ok(StoryGraph::default());
                }
            }
        };

        let build = build_nodes(&materialized);
        let edges = build_edges(
            self.relations,
            scope,
            &materialized,
            &build.valid_node_ids,
            self.options.parallel_implicit_edges,
        )?;
        let mut graph = StoryGraph {
            nodes: build.nodes,
            edges,
        };

        if self.options.annotate_groups {
            let mut tracker = GroupTracker::new();
            for object in materialized.objects() {
                tracker.observe(object.id(), object);
            }
            for node in &mut graph.nodes {
                node.group_id = tracker.group_for(node.id);
            }
        }

        let summary = graph.summary();
        debug!(
            target: ENGINE_TARGET,
            scope = scope.0,
            seeds = seeds.len(),
            nodes = summary.node_count,
            relation_edges = summary.relation_edge_count,
            implicit_edges = summary.implicit_edge_count,
            duration_ms = started_at.elapsed().as_millis().min(u32::MAX as u128) as u32,
            "Computed story graph"
        );
        Ok(graph)
    }

    fn materialize_all(&self, scope: EventId) -> Result<MaterializedSet, E::Error> {
        let mut materialized = MaterializedSet::new();
        for kind in &self.options.unfiltered_kinds {
            if *kind == StoryObjectKind::Relation {
                continue;
            }
            materialized.extend(self.entities.find_by_kind(scope, *kind)?);
        }
        Ok(materialized)
    }

    /// Seeds first, then everything the expander reaches from the seeds that
    /// actually resolved. `None` when no seed resolved.
    fn materialize_neighborhood(
        &self,
        scope: EventId,
        seeds: &SeedSet,
    ) -> Result<Option<MaterializedSet>, E::Error> {
        let mut materialized = MaterializedSet::new();
        for (kind, ids) in seeds.dimensions() {
            materialized.extend(self.entities.find_by_kind_and_ids(scope, kind, ids)?);
        }
        let live = SeedSet::from_objects(materialized.objects());
        if live.is_empty() {
            return Ok(None);
        }

        let expander = NeighborhoodExpander::new(self.entities, self.relations, scope);
        if let Expansion::Filtered(expanded) = expander.expand(&live)? {
            for (kind, ids) in expanded.iter() {
                materialized.extend(self.entities.find_by_kind_and_ids(scope, kind, ids)?);
            }
        }
        Ok(Some(materialized))
    }
}
