use rusqlite::{Connection, OpenFlags, Result, Row, params};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use storygraph_core::{
    Association, AssociationKind, EntityStore, EnumConversionError, EventId, IdSet, Relation,
    RelationKind, RelationStore, StoryObject, StoryObjectBase, StoryObjectId, StoryObjectKind,
    StoryObjectRef,
};
use thiserror::Error;
use tracing::debug;

mod fixture;
mod row_mapping;
mod schema;

pub use fixture::StoryFixture;

const SCHEMA_VERSION: u32 = 1;
const OBJECT_SELECT_BASE: &str = "SELECT id, event_id, kind, title, description FROM story_object";
const ASSOCIATION_SELECT_BASE: &str = "SELECT a.subject_id, s.kind, a.object_id, o.kind, a.kind
                 FROM association a
                 JOIN story_object s ON s.id = a.subject_id AND s.event_id = a.event_id
                 JOIN story_object o ON o.id = a.object_id AND o.event_id = a.event_id";
const RELATION_SELECT_BASE: &str = "SELECT r.id, r.event_id, r.from_id, f.kind, r.to_id, t.kind, r.kind, r.title
                 FROM relation r
                 JOIN story_object f ON f.id = r.from_id AND f.event_id = r.event_id
                 JOIN story_object t ON t.id = r.to_id AND t.event_id = r.event_id";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Invalid enum value: {0}")]
    EnumConversion(#[from] EnumConversionError),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Other error: {0}")]
    Other(String),
}

/// SQLite-backed store of story objects, their associations and explicit relations.
pub struct Storage {
    conn: Connection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageStats {
    pub event_count: i64,
    pub object_count: i64,
    pub association_count: i64,
    pub relation_count: i64,
}

impl Storage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        // Graph requests read while the admin tool writes; don't fail on a held lock.
        let _ = conn.busy_timeout(Duration::from_millis(2_500));
        let _ = conn.pragma_update(None, "journal_mode", "WAL");
        let _ = conn.pragma_update(None, "synchronous", "NORMAL");
        let storage = Self { conn };
        storage.init()?;
        Ok(storage)
    }

    pub fn new_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let storage = Self { conn };
        storage.init()?;
        Ok(storage)
    }

    /// Opens an existing database for graph reads.
    ///
    /// Never creates the file or touches the schema; a missing file or a
    /// schema newer than this build is an error.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        let _ = conn.busy_timeout(Duration::from_millis(2_500));
        let storage = Self { conn };
        schema::check_schema_version(storage.schema_version()?)?;
        Ok(storage)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM relation", [])?;
        tx.execute("DELETE FROM association", [])?;
        tx.execute("DELETE FROM story_object", [])?;
        tx.commit()?;
        Ok(())
    }

    fn init(&self) -> Result<(), StorageError> {
        schema::create_tables(&self.conn)?;
        schema::create_indexes(&self.conn)?;
        schema::apply_schema_migrations(self)
    }

    fn schema_version(&self) -> Result<u32, StorageError> {
        let version: i64 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;
        Ok(version.max(0) as u32)
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StorageError> {
        self.conn
            .pragma_update(None, "user_version", version.to_string())?;
        Ok(())
    }

    /// Inserts objects and the association rows their fields describe.
    ///
    /// An object's kind never changes: re-inserting an existing id is ignored.
    /// Association rows are deduplicated, so both sides of a link may declare it.
    pub fn insert_objects_batch(&mut self, objects: &[StoryObject]) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        {
            let mut object_stmt = tx.prepare(
                "INSERT INTO story_object (id, event_id, kind, title, description)
                 VALUES (?1, ?2, ?3, ?4, ?5) ON CONFLICT(id) DO NOTHING",
            )?;
            for object in objects {
                let base = object.base();
                object_stmt.execute(params![
                    base.id.0,
                    base.event_id.0,
                    object.kind() as i32,
                    base.title,
                    base.description
                ])?;
            }

            let mut association_stmt = tx.prepare(
                "INSERT OR IGNORE INTO association (event_id, subject_id, object_id, kind)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for object in objects {
                for row in object.associations() {
                    association_stmt.execute(params![
                        object.event_id().0,
                        row.subject.id.0,
                        row.object.id.0,
                        row.kind as i32
                    ])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn insert_relations_batch(&mut self, relations: &[Relation]) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO relation (id, event_id, from_id, to_id, kind, title)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6) ON CONFLICT(id) DO NOTHING",
            )?;
            for relation in relations {
                stmt.execute(params![
                    relation.id.0,
                    relation.event_id.0,
                    relation.from.id.0,
                    relation.to.id.0,
                    relation.kind as i32,
                    relation.title
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn import_fixture(&mut self, fixture: &StoryFixture) -> Result<(), StorageError> {
        self.insert_objects_batch(&fixture.objects)?;
        self.insert_relations_batch(&fixture.relations)?;
        debug!(
            objects = fixture.objects.len(),
            relations = fixture.relations.len(),
            "Imported story fixture"
        );
        Ok(())
    }

    pub fn get_stats(&self) -> Result<StorageStats, StorageError> {
        let count = |sql: &str| -> Result<i64, StorageError> {
            Ok(self.conn.query_row(sql, [], |row| row.get(0))?)
        };
        Ok(StorageStats {
            event_count: count("SELECT count(DISTINCT event_id) FROM story_object")?,
            object_count: count("SELECT count(*) FROM story_object")?,
            association_count: count("SELECT count(*) FROM association")?,
            relation_count: count("SELECT count(*) FROM relation")?,
        })
    }

    pub fn get_event_ids(&self) -> Result<Vec<EventId>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT event_id FROM story_object ORDER BY event_id ASC")?;
        let mut ids = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            ids.push(EventId(row.get(0)?));
        }
        Ok(ids)
    }

    fn query_objects(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<StoryObject>, StorageError> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut objects = Vec::new();
        let mut rows = stmt.query(params)?;
        while let Some(row) = rows.next()? {
            if let Some(object) = row_mapping::object_from_row(row)? {
                objects.push(object);
            }
        }
        Ok(objects)
    }

    /// Fills association fields of freshly loaded objects from one batched query.
    fn hydrate(
        &self,
        scope: EventId,
        mut objects: Vec<StoryObject>,
    ) -> Result<Vec<StoryObject>, StorageError> {
        if objects.is_empty() {
            return Ok(objects);
        }
        let ids: IdSet = objects.iter().map(StoryObject::id).collect();
        let index: HashMap<StoryObjectId, usize> = objects
            .iter()
            .enumerate()
            .map(|(i, object)| (object.id(), i))
            .collect();
        for row in self.find_associations(scope, &ids)? {
            for end in [row.subject.id, row.object.id] {
                if let Some(&i) = index.get(&end) {
                    objects[i].attach(&row);
                }
            }
        }
        Ok(objects)
    }

    fn query_relations(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Relation>, StorageError> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut relations = Vec::new();
        let mut rows = stmt.query(params)?;
        while let Some(row) = rows.next()? {
            relations.push(row_mapping::relation_from_row(row)?);
        }
        Ok(relations)
    }
}

impl EntityStore for Storage {
    type Error = StorageError;

    fn find_by_kind(
        &self,
        scope: EventId,
        kind: StoryObjectKind,
    ) -> Result<Vec<StoryObject>, StorageError> {
        let sql = format!("{OBJECT_SELECT_BASE} WHERE event_id = ?1 AND kind = ?2 ORDER BY id");
        let objects = self.query_objects(&sql, params![scope.0, kind as i32])?;
        self.hydrate(scope, objects)
    }

    fn find_by_kind_and_ids(
        &self,
        scope: EventId,
        kind: StoryObjectKind,
        ids: &IdSet,
    ) -> Result<Vec<StoryObject>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "{OBJECT_SELECT_BASE} WHERE event_id = ?1 AND kind = ?2
             AND id IN (SELECT value FROM json_each(?3)) ORDER BY id"
        );
        let objects = self.query_objects(
            &sql,
            params![scope.0, kind as i32, row_mapping::id_set_param(ids)?],
        )?;
        self.hydrate(scope, objects)
    }

    fn find_associations(
        &self,
        scope: EventId,
        ids: &IdSet,
    ) -> Result<Vec<Association>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "{ASSOCIATION_SELECT_BASE} WHERE a.event_id = ?1
             AND (a.subject_id IN (SELECT value FROM json_each(?2))
                  OR a.object_id IN (SELECT value FROM json_each(?2)))
             ORDER BY a.id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![scope.0, row_mapping::id_set_param(ids)?])?;
        let mut associations = Vec::new();
        while let Some(row) = rows.next()? {
            associations.push(row_mapping::association_from_row(row)?);
        }
        Ok(associations)
    }
}

impl RelationStore for Storage {
    type Error = StorageError;

    fn find_relations_between(
        &self,
        scope: EventId,
        ids: &IdSet,
    ) -> Result<Vec<Relation>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "{RELATION_SELECT_BASE} WHERE r.event_id = ?1
             AND r.from_id IN (SELECT value FROM json_each(?2))
             AND r.to_id IN (SELECT value FROM json_each(?2))
             ORDER BY r.id"
        );
        self.query_relations(&sql, params![scope.0, row_mapping::id_set_param(ids)?])
    }

    fn find_relations_touching(
        &self,
        scope: EventId,
        ids: &IdSet,
    ) -> Result<Vec<Relation>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "{RELATION_SELECT_BASE} WHERE r.event_id = ?1
             AND (r.from_id IN (SELECT value FROM json_each(?2))
                  OR r.to_id IN (SELECT value FROM json_each(?2)))
             ORDER BY r.id"
        );
        self.query_relations(&sql, params![scope.0, row_mapping::id_set_param(ids)?])
    }
}

#[cfg(test)]
mod tests;
