use super::*;

/// Columns: id, event_id, kind, title, description
pub(super) fn object_from_row(row: &Row) -> Result<Option<StoryObject>, StorageError> {
    let kind = StoryObjectKind::try_from(row.get::<_, i32>(2)?)?;
    let base = StoryObjectBase {
        id: StoryObjectId(row.get(0)?),
        event_id: EventId(row.get(1)?),
        title: row.get(3)?,
        description: row.get(4)?,
    };
    Ok(StoryObject::from_base(kind, base))
}

/// Columns: subject_id, subject kind, object_id, object kind, association kind
pub(super) fn association_from_row(row: &Row) -> Result<Association, StorageError> {
    let subject = StoryObjectRef::new(
        StoryObjectId(row.get(0)?),
        StoryObjectKind::try_from(row.get::<_, i32>(1)?)?,
    );
    let object = StoryObjectRef::new(
        StoryObjectId(row.get(2)?),
        StoryObjectKind::try_from(row.get::<_, i32>(3)?)?,
    );
    let kind = AssociationKind::try_from(row.get::<_, i32>(4)?)?;
    Ok(Association::new(subject, object, kind))
}

/// Columns: id, event_id, from_id, from kind, to_id, to kind, relation kind, title
pub(super) fn relation_from_row(row: &Row) -> Result<Relation, StorageError> {
    Ok(Relation {
        id: StoryObjectId(row.get(0)?),
        event_id: EventId(row.get(1)?),
        from: StoryObjectRef::new(
            StoryObjectId(row.get(2)?),
            StoryObjectKind::try_from(row.get::<_, i32>(3)?)?,
        ),
        to: StoryObjectRef::new(
            StoryObjectId(row.get(4)?),
            StoryObjectKind::try_from(row.get::<_, i32>(5)?)?,
        ),
        kind: RelationKind::try_from(row.get::<_, i32>(6)?)?,
        title: row.get(7)?,
    })
}

/// Id sets are bound as one JSON array parameter and unpacked with `json_each`,
/// so a batched query never depends on the number of ids.
pub(super) fn id_set_param(ids: &IdSet) -> Result<String, StorageError> {
    Ok(serde_json::to_string(ids)?)
}
