use storygraph_core::{
    Character, EventId, Faction, Plot, Relation, RelationKind, StoryObject, StoryObjectBase,
    StoryObjectId, StoryObjectKind, StoryObjectRef, Thread,
};
use storygraph_storage::Storage;

pub const BENCH_EVENT: EventId = EventId(1);

const FACTION_BASE: i64 = 1_000;
const THREAD_BASE: i64 = 2_000;
const CHARACTER_BASE: i64 = 10_000;
const QUEST_BASE: i64 = 50_000;
const RELATION_BASE: i64 = 90_000;

fn base(id: i64, title: String) -> StoryObjectBase {
    StoryObjectBase {
        id: StoryObjectId(id),
        event_id: BENCH_EVENT,
        title,
        description: None,
    }
}

/// Builds an in-memory event with `characters` characters spread over a
/// handful of factions and threads, two quests per thread, and one relation
/// between every pair of neighbouring characters.
pub fn generate_synthetic_event(characters: usize) -> anyhow::Result<Storage> {
    let factions = (characters / 20).max(1) as i64;
    let threads = (characters / 10).max(1) as i64;
    let characters = characters as i64;

    let mut objects = Vec::new();
    for f in 0..factions {
        objects.push(StoryObject::Faction(Faction {
            base: base(FACTION_BASE + f, format!("Faction {f}")),
            ..Default::default()
        }));
    }
    for t in 0..threads {
        objects.push(StoryObject::Thread(Thread {
            base: base(THREAD_BASE + t, format!("Thread {t}")),
            ..Default::default()
        }));
        for q in 0..2 {
            let id = QUEST_BASE + t * 2 + q;
            objects.push(StoryObject::Quest(Plot {
                base: base(id, format!("Quest {t}.{q}")),
                thread: Some(StoryObjectId(THREAD_BASE + t)),
                ..Default::default()
            }));
        }
    }
    for c in 0..characters {
        objects.push(StoryObject::Character(Character {
            base: base(CHARACTER_BASE + c, format!("Character {c}")),
            factions: vec![StoryObjectId(FACTION_BASE + c % factions)],
            threads: vec![
                StoryObjectId(THREAD_BASE + c % threads),
                StoryObjectId(THREAD_BASE + (c * 7) % threads),
            ],
            ..Default::default()
        }));
    }

    let relations: Vec<Relation> = (1..characters)
        .map(|c| Relation {
            id: StoryObjectId(RELATION_BASE + c),
            event_id: BENCH_EVENT,
            from: StoryObjectRef::new(
                StoryObjectId(CHARACTER_BASE + c - 1),
                StoryObjectKind::Character,
            ),
            to: StoryObjectRef::new(StoryObjectId(CHARACTER_BASE + c), StoryObjectKind::Character),
            kind: RelationKind::Ally,
            title: "knows".to_string(),
        })
        .collect();

    let mut storage = Storage::new_in_memory()?;
    storage.insert_objects_batch(&objects)?;
    storage.insert_relations_batch(&relations)?;
    Ok(storage)
}

pub fn first_thread() -> StoryObjectId {
    StoryObjectId(THREAD_BASE)
}

pub fn first_faction() -> StoryObjectId {
    StoryObjectId(FACTION_BASE)
}
