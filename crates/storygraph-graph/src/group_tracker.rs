use std::collections::HashMap;
use storygraph_core::{StoryObject, StoryObjectId};

/// Best-effort cluster assignment for rendering.
///
/// Factions and threads group under themselves. A character groups under its
/// first faction in storage order, even when it belongs to several; a quest or
/// event groups under its owning thread. Anything else stays ungrouped.
#[derive(Debug, Default)]
pub struct GroupTracker {
    faction_groups: HashMap<StoryObjectId, StoryObjectId>,
    thread_groups: HashMap<StoryObjectId, StoryObjectId>,
}

impl GroupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the group of `object` under `context_id`. The first observation
    /// for a context wins.
    pub fn observe(&mut self, context_id: StoryObjectId, object: &StoryObject) {
        match object {
            StoryObject::Faction(faction) => {
                self.faction_groups
                    .entry(context_id)
                    .or_insert(faction.base.id);
            }
            StoryObject::Thread(thread) => {
                self.thread_groups
                    .entry(context_id)
                    .or_insert(thread.base.id);
            }
            StoryObject::Character(character) => {
                if let Some(first) = character.factions.first() {
                    self.faction_groups.entry(context_id).or_insert(*first);
                }
            }
            StoryObject::Quest(plot) | StoryObject::Event(plot) => {
                if let Some(thread) = plot.thread {
                    self.thread_groups.entry(context_id).or_insert(thread);
                }
            }
            StoryObject::Place(_) | StoryObject::Item(_) | StoryObject::LoreDocument(_) => {}
        }
    }

    pub fn faction_group(&self, context_id: StoryObjectId) -> Option<StoryObjectId> {
        self.faction_groups.get(&context_id).copied()
    }

    pub fn thread_group(&self, context_id: StoryObjectId) -> Option<StoryObjectId> {
        self.thread_groups.get(&context_id).copied()
    }

    /// Faction clusters take precedence over thread clusters.
    pub fn group_for(&self, context_id: StoryObjectId) -> Option<StoryObjectId> {
        self.faction_group(context_id)
            .or_else(|| self.thread_group(context_id))
    }
}
