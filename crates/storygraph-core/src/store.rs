//! Read-only collaborator interfaces the graph engine consumes.
//!
//! Implementations must scope every query to the given event and must only
//! return rows whose endpoints resolve to live objects of that event. Ids that
//! resolve to nothing are skipped, not reported.

use crate::{Association, EventId, IdSet, Relation, StoryObject, StoryObjectKind};

pub trait EntityStore {
    type Error;

    /// Every object of `kind` in `scope`.
    fn find_by_kind(
        &self,
        scope: EventId,
        kind: StoryObjectKind,
    ) -> Result<Vec<StoryObject>, Self::Error>;

    /// Objects of `kind` in `scope` whose id is in `ids`.
    fn find_by_kind_and_ids(
        &self,
        scope: EventId,
        kind: StoryObjectKind,
        ids: &IdSet,
    ) -> Result<Vec<StoryObject>, Self::Error>;

    /// Association rows in `scope` with either end in `ids`.
    fn find_associations(&self, scope: EventId, ids: &IdSet)
    -> Result<Vec<Association>, Self::Error>;
}

pub trait RelationStore {
    type Error;

    /// Relations in `scope` with both `from` and `to` in `ids`.
    fn find_relations_between(
        &self,
        scope: EventId,
        ids: &IdSet,
    ) -> Result<Vec<Relation>, Self::Error>;

    /// Relations in `scope` with either `from` or `to` in `ids`.
    fn find_relations_touching(
        &self,
        scope: EventId,
        ids: &IdSet,
    ) -> Result<Vec<Relation>, Self::Error>;
}
