use super::*;
use storygraph_core::{Character, Faction, Plot, Thread};

const EVENT: EventId = EventId(1);
const OTHER_EVENT: EventId = EventId(2);

fn base(id: i64, event: EventId, title: &str) -> StoryObjectBase {
    StoryObjectBase {
        id: StoryObjectId(id),
        event_id: event,
        title: title.to_string(),
        description: None,
    }
}

fn ids(raw: &[i64]) -> IdSet {
    raw.iter().copied().map(StoryObjectId).collect()
}

fn character(id: i64, title: &str, factions: &[i64]) -> StoryObject {
    StoryObject::Character(Character {
        base: base(id, EVENT, title),
        factions: factions.iter().copied().map(StoryObjectId).collect(),
        ..Default::default()
    })
}

fn faction(id: i64, title: &str, members: &[i64]) -> StoryObject {
    StoryObject::Faction(Faction {
        base: base(id, EVENT, title),
        members: members.iter().copied().map(StoryObjectId).collect(),
        ..Default::default()
    })
}

fn relation(id: i64, event: EventId, from: StoryObjectRef, to: StoryObjectRef) -> Relation {
    Relation {
        id: StoryObjectId(id),
        event_id: event,
        from,
        to,
        kind: RelationKind::Enemy,
        title: format!("relation {id}"),
    }
}

fn char_ref(id: i64) -> StoryObjectRef {
    StoryObjectRef::new(StoryObjectId(id), StoryObjectKind::Character)
}

#[test]
fn test_tables_and_indexes_are_created() -> Result<(), StorageError> {
    let storage = Storage::new_in_memory()?;

    let mut stmt = storage.conn.prepare("PRAGMA index_list('association')")?;
    let indexes = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    assert!(indexes.iter().any(|name| name == "idx_association_unique"));
    assert!(
        indexes
            .iter()
            .any(|name| name == "idx_association_event_object")
    );
    assert_eq!(storage.schema_version()?, SCHEMA_VERSION);
    Ok(())
}

#[test]
fn test_find_by_kind_is_scoped_to_event() -> Result<(), StorageError> {
    let mut storage = Storage::new_in_memory()?;
    storage.insert_objects_batch(&[
        character(1, "Mara", &[]),
        character(2, "Tobin", &[]),
        StoryObject::Character(Character {
            base: base(3, OTHER_EVENT, "Elsewhere"),
            ..Default::default()
        }),
        faction(10, "Night Watch", &[]),
    ])?;

    let characters = storage.find_by_kind(EVENT, StoryObjectKind::Character)?;
    let found: Vec<_> = characters.iter().map(StoryObject::id).collect();
    assert_eq!(found, vec![StoryObjectId(1), StoryObjectId(2)]);

    let other = storage.find_by_kind(OTHER_EVENT, StoryObjectKind::Character)?;
    assert_eq!(other.len(), 1);
    assert_eq!(other[0].title(), "Elsewhere");
    Ok(())
}

#[test]
fn test_membership_declared_by_faction_is_visible_on_character() -> Result<(), StorageError> {
    let mut storage = Storage::new_in_memory()?;
    storage.insert_objects_batch(&[character(1, "Mara", &[]), faction(10, "Night Watch", &[1])])?;

    let loaded = storage.find_by_kind_and_ids(EVENT, StoryObjectKind::Character, &ids(&[1]))?;
    let StoryObject::Character(mara) = &loaded[0] else {
        panic!("expected a character");
    };
    assert_eq!(mara.factions, vec![StoryObjectId(10)]);

    let loaded = storage.find_by_kind_and_ids(EVENT, StoryObjectKind::Faction, &ids(&[10]))?;
    let StoryObject::Faction(watch) = &loaded[0] else {
        panic!("expected a faction");
    };
    assert_eq!(watch.members, vec![StoryObjectId(1)]);
    Ok(())
}

#[test]
fn test_link_declared_on_both_sides_is_stored_once() -> Result<(), StorageError> {
    let mut storage = Storage::new_in_memory()?;
    storage.insert_objects_batch(&[character(1, "Mara", &[10]), faction(10, "Night Watch", &[1])])?;

    let rows = storage.find_associations(EVENT, &ids(&[1]))?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind, AssociationKind::Membership);
    Ok(())
}

#[test]
fn test_character_faction_order_follows_storage_order() -> Result<(), StorageError> {
    let mut storage = Storage::new_in_memory()?;
    storage.insert_objects_batch(&[
        faction(20, "Second", &[]),
        faction(10, "First", &[]),
        character(1, "Mara", &[20, 10]),
    ])?;

    let loaded = storage.find_by_kind_and_ids(EVENT, StoryObjectKind::Character, &ids(&[1]))?;
    let StoryObject::Character(mara) = &loaded[0] else {
        panic!("expected a character");
    };
    assert_eq!(mara.factions, vec![StoryObjectId(20), StoryObjectId(10)]);
    Ok(())
}

#[test]
fn test_unknown_and_mistyped_ids_are_dropped() -> Result<(), StorageError> {
    let mut storage = Storage::new_in_memory()?;
    storage.insert_objects_batch(&[character(1, "Mara", &[]), faction(10, "Night Watch", &[])])?;

    let loaded =
        storage.find_by_kind_and_ids(EVENT, StoryObjectKind::Character, &ids(&[1, 10, 999]))?;
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id(), StoryObjectId(1));

    let none = storage.find_by_kind_and_ids(EVENT, StoryObjectKind::Character, &IdSet::new())?;
    assert!(none.is_empty());
    Ok(())
}

#[test]
fn test_dangling_association_is_filtered_on_read() -> Result<(), StorageError> {
    let mut storage = Storage::new_in_memory()?;
    // Faction 99 never exists.
    storage.insert_objects_batch(&[character(1, "Mara", &[99])])?;

    assert!(storage.find_associations(EVENT, &ids(&[1]))?.is_empty());
    let loaded = storage.find_by_kind_and_ids(EVENT, StoryObjectKind::Character, &ids(&[1]))?;
    let StoryObject::Character(mara) = &loaded[0] else {
        panic!("expected a character");
    };
    assert!(mara.factions.is_empty());
    Ok(())
}

#[test]
fn test_quest_thread_ownership_round_trip() -> Result<(), StorageError> {
    let mut storage = Storage::new_in_memory()?;
    storage.insert_objects_batch(&[
        StoryObject::Thread(Thread {
            base: base(30, EVENT, "Heist"),
            ..Default::default()
        }),
        StoryObject::Quest(Plot {
            base: base(40, EVENT, "Find the Key"),
            thread: Some(StoryObjectId(30)),
            characters: vec![],
            factions: vec![],
        }),
    ])?;

    let threads = storage.find_by_kind(EVENT, StoryObjectKind::Thread)?;
    let StoryObject::Thread(heist) = &threads[0] else {
        panic!("expected a thread");
    };
    assert_eq!(heist.quests, vec![StoryObjectId(40)]);
    Ok(())
}

#[test]
fn test_relations_between_and_touching() -> Result<(), StorageError> {
    let mut storage = Storage::new_in_memory()?;
    storage.insert_objects_batch(&[
        character(1, "Mara", &[]),
        character(2, "Tobin", &[]),
        character(3, "Ilse", &[]),
    ])?;
    storage.insert_relations_batch(&[
        relation(100, EVENT, char_ref(1), char_ref(2)),
        relation(101, EVENT, char_ref(2), char_ref(3)),
    ])?;

    let between = storage.find_relations_between(EVENT, &ids(&[1, 2]))?;
    assert_eq!(between.len(), 1);
    assert_eq!(between[0].id, StoryObjectId(100));
    assert_eq!(between[0].kind, RelationKind::Enemy);

    let touching = storage.find_relations_touching(EVENT, &ids(&[3]))?;
    assert_eq!(touching.len(), 1);
    assert_eq!(touching[0].from.id, StoryObjectId(2));
    assert_eq!(touching[0].to.kind, StoryObjectKind::Character);
    Ok(())
}

#[test]
fn test_relation_with_endpoint_outside_scope_is_never_returned() -> Result<(), StorageError> {
    let mut storage = Storage::new_in_memory()?;
    storage.insert_objects_batch(&[
        character(1, "Mara", &[]),
        StoryObject::Character(Character {
            base: base(5, OTHER_EVENT, "Stranger"),
            ..Default::default()
        }),
    ])?;
    storage.insert_relations_batch(&[relation(100, EVENT, char_ref(1), char_ref(5))])?;

    assert!(storage.find_relations_touching(EVENT, &ids(&[1, 5]))?.is_empty());
    assert!(storage.find_relations_between(EVENT, &ids(&[1, 5]))?.is_empty());
    Ok(())
}

#[test]
fn test_object_kind_is_immutable() -> Result<(), StorageError> {
    let mut storage = Storage::new_in_memory()?;
    storage.insert_objects_batch(&[character(1, "Mara", &[])])?;
    storage.insert_objects_batch(&[faction(1, "Impostor", &[])])?;

    assert!(storage.find_by_kind(EVENT, StoryObjectKind::Faction)?.is_empty());
    assert_eq!(storage.find_by_kind(EVENT, StoryObjectKind::Character)?.len(), 1);
    Ok(())
}

#[test]
fn test_stats_and_clear() -> Result<(), StorageError> {
    let mut storage = Storage::new_in_memory()?;
    storage.insert_objects_batch(&[character(1, "Mara", &[10]), faction(10, "Night Watch", &[])])?;
    storage.insert_relations_batch(&[relation(100, EVENT, char_ref(1), char_ref(1))])?;

    let stats = storage.get_stats()?;
    assert_eq!(stats.event_count, 1);
    assert_eq!(stats.object_count, 2);
    assert_eq!(stats.association_count, 1);
    assert_eq!(stats.relation_count, 1);
    assert_eq!(storage.get_event_ids()?, vec![EVENT]);

    storage.clear()?;
    let stats = storage.get_stats()?;
    assert_eq!(stats.object_count, 0);
    assert_eq!(stats.relation_count, 0);
    Ok(())
}

#[test]
fn test_fixture_import_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("fixture.json");
    std::fs::write(
        &path,
        r#"{
            "objects": [
                {"kind": "faction", "id": 10, "event_id": 1, "title": "Night Watch", "members": [1]},
                {"kind": "character", "id": 1, "event_id": 1, "title": "Mara"},
                {"kind": "place", "id": 50, "event_id": 1, "title": "Harbour", "description": "Docks"}
            ],
            "relations": [
                {"id": 100, "event_id": 1,
                 "from": {"id": 1, "kind": "character"},
                 "to": {"id": 50, "kind": "place"},
                 "kind": "other", "title": "lives at"}
            ]
        }"#,
    )?;

    let fixture = StoryFixture::load(&path)?;
    let mut storage = Storage::open(dir.path().join("story.db"))?;
    storage.import_fixture(&fixture)?;

    let places = storage.find_by_kind(EVENT, StoryObjectKind::Place)?;
    assert_eq!(places[0].base().description.as_deref(), Some("Docks"));
    let relations = storage.find_relations_between(EVENT, &ids(&[1, 50]))?;
    assert_eq!(relations[0].title, "lives at");
    Ok(())
}

#[test]
fn test_newer_schema_version_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("story.db");
    {
        let storage = Storage::open(&path)?;
        storage.set_schema_version(SCHEMA_VERSION + 1)?;
    }
    assert!(matches!(Storage::open(&path), Err(StorageError::Other(_))));
    Ok(())
}

#[test]
fn test_read_only_open_never_creates_a_database() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("missing.db");
    assert!(matches!(
        Storage::open_read_only(&path),
        Err(StorageError::Sqlite(_))
    ));
    assert!(!path.exists());
    Ok(())
}

#[test]
fn test_read_only_open_reads_but_rejects_writes() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("story.db");
    {
        let mut storage = Storage::open(&path)?;
        storage.insert_objects_batch(&[character(1, "Mara", &[])])?;
    }

    let mut storage = Storage::open_read_only(&path)?;
    assert_eq!(storage.get_stats()?.object_count, 1);
    assert!(
        storage
            .insert_objects_batch(&[character(2, "Tobin", &[])])
            .is_err()
    );

    {
        let writer = Storage::open(&path)?;
        writer.set_schema_version(SCHEMA_VERSION + 1)?;
    }
    assert!(matches!(
        Storage::open_read_only(&path),
        Err(StorageError::Other(_))
    ));
    Ok(())
}
