use super::*;

const TABLE_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS story_object (
        id INTEGER PRIMARY KEY,
        event_id INTEGER NOT NULL,
        kind INTEGER NOT NULL,
        title TEXT NOT NULL,
        description TEXT
    )",
    // Endpoints are not foreign keys: rows that point at deleted or foreign
    // objects are filtered by the read joins instead of failing the write.
    "CREATE TABLE IF NOT EXISTS association (
        id INTEGER PRIMARY KEY,
        event_id INTEGER NOT NULL,
        subject_id INTEGER NOT NULL,
        object_id INTEGER NOT NULL,
        kind INTEGER NOT NULL
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_association_unique
     ON association(subject_id, object_id, kind)",
    "CREATE TABLE IF NOT EXISTS relation (
        id INTEGER PRIMARY KEY,
        event_id INTEGER NOT NULL,
        from_id INTEGER NOT NULL,
        to_id INTEGER NOT NULL,
        kind INTEGER NOT NULL,
        title TEXT NOT NULL
    )",
];

const INDEX_STATEMENTS: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_story_object_event_kind ON story_object(event_id, kind)",
    "CREATE INDEX IF NOT EXISTS idx_association_event_subject ON association(event_id, subject_id)",
    "CREATE INDEX IF NOT EXISTS idx_association_event_object ON association(event_id, object_id)",
    "CREATE INDEX IF NOT EXISTS idx_relation_event_from ON relation(event_id, from_id)",
    "CREATE INDEX IF NOT EXISTS idx_relation_event_to ON relation(event_id, to_id)",
];

pub(super) fn create_tables(conn: &Connection) -> Result<(), StorageError> {
    for statement in TABLE_STATEMENTS {
        conn.execute(statement, [])?;
    }
    Ok(())
}

pub(super) fn create_indexes(conn: &Connection) -> Result<(), StorageError> {
    for statement in INDEX_STATEMENTS {
        conn.execute(statement, [])?;
    }
    Ok(())
}

pub(super) fn check_schema_version(stored_version: u32) -> Result<(), StorageError> {
    if stored_version > SCHEMA_VERSION {
        return Err(StorageError::Other(format!(
            "Unsupported database schema version: {stored_version} (max supported: {SCHEMA_VERSION})"
        )));
    }
    Ok(())
}

pub(super) fn apply_schema_migrations(storage: &Storage) -> Result<(), StorageError> {
    let stored_version = storage.schema_version()?;
    check_schema_version(stored_version)?;

    if stored_version < SCHEMA_VERSION {
        storage.set_schema_version(SCHEMA_VERSION)?;
    }
    Ok(())
}
