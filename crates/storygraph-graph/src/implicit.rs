use std::collections::{BTreeSet, HashMap};
use storygraph_core::{
    EntityStore, EventId, IdSet, StoryObjectId, StoryObjectKind, StoryObjectRef,
};

/// Dispatch table: the kinds an object of `kind` is implicitly linked to.
pub fn linked_kinds(kind: StoryObjectKind) -> &'static [StoryObjectKind] {
    use StoryObjectKind as K;
    match kind {
        K::Thread => &[K::Quest, K::Event, K::Character, K::Faction],
        K::Character => &[K::Faction, K::Thread, K::Quest, K::Event],
        K::Faction => &[K::Character, K::Thread, K::Quest, K::Event],
        K::Quest | K::Event => &[K::Thread, K::Character, K::Faction],
        K::Place | K::Item | K::Relation | K::LoreDocument => &[],
    }
}

/// Stateless one-hop lookups over association rows.
///
/// Rows are matched from either end, so a link declared by only one side is
/// still found when querying from the other.
pub struct ImplicitLinkResolver<'a, S> {
    store: &'a S,
    scope: EventId,
}

impl<'a, S: EntityStore> ImplicitLinkResolver<'a, S> {
    pub fn new(store: &'a S, scope: EventId) -> Self {
        Self { store, scope }
    }

    /// Union of the one-hop implicit neighbors of every seed, in one batched query.
    ///
    /// A seed whose id exists under another kind contributes nothing, and so
    /// does a row whose ends do not fit its association kind.
    pub fn resolve(&self, seeds: &[StoryObjectRef]) -> Result<BTreeSet<StoryObjectRef>, S::Error> {
        let mut found = BTreeSet::new();
        if seeds.is_empty() {
            return Ok(found);
        }
        let seed_kinds: HashMap<StoryObjectId, Vec<StoryObjectKind>> =
            seeds.iter().fold(HashMap::new(), |mut acc, seed| {
                acc.entry(seed.id).or_default().push(seed.kind);
                acc
            });
        let ids: IdSet = seed_kinds.keys().copied().collect();

        let rows = self.store.find_associations(self.scope, &ids)?;
        for row in rows.into_iter().filter(|row| row.is_well_formed()) {
            for (end, other) in [(row.subject, row.object), (row.object, row.subject)] {
                let Some(kinds) = seed_kinds.get(&end.id) else {
                    continue;
                };
                if kinds.contains(&end.kind) && linked_kinds(end.kind).contains(&other.kind) {
                    found.insert(other);
                }
            }
        }
        Ok(found)
    }

    /// Quests and events owned by the thread, characters and factions involved in it.
    pub fn thread_links(&self, id: StoryObjectId) -> Result<BTreeSet<StoryObjectRef>, S::Error> {
        self.resolve(&[StoryObjectRef::new(id, StoryObjectKind::Thread)])
    }

    /// Factions the character belongs to, threads, quests and events it is involved in.
    pub fn character_links(
        &self,
        id: StoryObjectId,
    ) -> Result<BTreeSet<StoryObjectRef>, S::Error> {
        self.resolve(&[StoryObjectRef::new(id, StoryObjectKind::Character)])
    }

    /// Member characters, threads, quests and events the faction is involved in.
    pub fn faction_links(&self, id: StoryObjectId) -> Result<BTreeSet<StoryObjectRef>, S::Error> {
        self.resolve(&[StoryObjectRef::new(id, StoryObjectKind::Faction)])
    }
}
