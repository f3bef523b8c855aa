use crate::ENGINE_TARGET;
use crate::implicit::ImplicitLinkResolver;
use crate::model::SeedSet;
use std::collections::{BTreeMap, BTreeSet};
use storygraph_core::{EntityStore, EventId, IdSet, RelationStore, StoryObjectKind, StoryObjectRef};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    /// No seed was given: the caller renders every object in scope.
    Unfiltered,
    Filtered(ExpandedIds),
}

/// Ids to materialize, partitioned by kind.
///
/// For a kind that was a filter dimension the seeds themselves are left out;
/// same-kind ids reached through other seeds stay in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedIds {
    by_kind: BTreeMap<StoryObjectKind, IdSet>,
}

impl ExpandedIds {
    pub fn ids(&self, kind: StoryObjectKind) -> Option<&IdSet> {
        self.by_kind.get(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StoryObjectKind, &IdSet)> {
        self.by_kind.iter().map(|(kind, ids)| (*kind, ids))
    }

    pub fn len(&self) -> usize {
        self.by_kind.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Computes the bounded neighborhood of a seed selection: one implicit hop from
/// every seed, then exactly one explicit-relation hop from the result.
pub struct NeighborhoodExpander<'a, E, R> {
    entities: &'a E,
    relations: &'a R,
    scope: EventId,
}

impl<'a, E, R> NeighborhoodExpander<'a, E, R>
where
    E: EntityStore,
    R: RelationStore<Error = E::Error>,
{
    pub fn new(entities: &'a E, relations: &'a R, scope: EventId) -> Self {
        Self {
            entities,
            relations,
            scope,
        }
    }

    pub fn expand(&self, seeds: &SeedSet) -> Result<Expansion, E::Error> {
        if seeds.is_empty() {
            return Ok(Expansion::Unfiltered);
        }

        let seed_refs = seeds.refs();
        let mut working: BTreeSet<StoryObjectRef> = seed_refs.iter().copied().collect();
        let implicit = ImplicitLinkResolver::new(self.entities, self.scope).resolve(&seed_refs)?;
        working.extend(implicit);

        // One hop through explicit relations, never iterated.
        let working_ids: IdSet = working.iter().map(|r| r.id).collect();
        let touching = self
            .relations
            .find_relations_touching(self.scope, &working_ids)?;
        let relation_count = touching.len();
        for relation in touching {
            working.insert(relation.from);
            working.insert(relation.to);
        }

        let mut by_kind: BTreeMap<StoryObjectKind, IdSet> = BTreeMap::new();
        for r in working {
            if r.kind == StoryObjectKind::Relation {
                continue;
            }
            by_kind.entry(r.kind).or_default().insert(r.id);
        }
        for (kind, seed_ids) in seeds.dimensions() {
            if seed_ids.is_empty() {
                continue;
            }
            if let Some(ids) = by_kind.get_mut(&kind) {
                ids.retain(|id| !seed_ids.contains(id));
            }
        }
        by_kind.retain(|_, ids| !ids.is_empty());

        let expanded = ExpandedIds { by_kind };
        debug!(
            target: ENGINE_TARGET,
            seeds = seeds.len(),
            relations = relation_count,
            expanded = expanded.len(),
            "Expanded seed neighborhood"
        );
        Ok(Expansion::Filtered(expanded))
    }
}
