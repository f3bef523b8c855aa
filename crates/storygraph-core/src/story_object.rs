use crate::{
    Association, AssociationKind, EventId, StoryObjectId, StoryObjectKind, StoryObjectRef,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryObjectBase {
    pub id: StoryObjectId,
    pub event_id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    #[serde(flatten)]
    pub base: StoryObjectBase,
    /// Storage order. Grouping uses the first entry.
    #[serde(default)]
    pub factions: Vec<StoryObjectId>,
    #[serde(default)]
    pub threads: Vec<StoryObjectId>,
    #[serde(default)]
    pub quests: Vec<StoryObjectId>,
    #[serde(default)]
    pub events: Vec<StoryObjectId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faction {
    #[serde(flatten)]
    pub base: StoryObjectBase,
    #[serde(default)]
    pub members: Vec<StoryObjectId>,
    #[serde(default)]
    pub threads: Vec<StoryObjectId>,
    #[serde(default)]
    pub quests: Vec<StoryObjectId>,
    #[serde(default)]
    pub events: Vec<StoryObjectId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    #[serde(flatten)]
    pub base: StoryObjectBase,
    #[serde(default)]
    pub characters: Vec<StoryObjectId>,
    #[serde(default)]
    pub factions: Vec<StoryObjectId>,
    #[serde(default)]
    pub quests: Vec<StoryObjectId>,
    #[serde(default)]
    pub events: Vec<StoryObjectId>,
}

/// Shared shape of quests and events: an optional owning thread plus the
/// characters and factions involved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plot {
    #[serde(flatten)]
    pub base: StoryObjectBase,
    #[serde(default)]
    pub thread: Option<StoryObjectId>,
    #[serde(default)]
    pub characters: Vec<StoryObjectId>,
    #[serde(default)]
    pub factions: Vec<StoryObjectId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoryObject {
    Character(Character),
    Faction(Faction),
    Thread(Thread),
    Quest(Plot),
    Event(Plot),
    Place(StoryObjectBase),
    Item(StoryObjectBase),
    LoreDocument(StoryObjectBase),
}

fn refs(ids: &[StoryObjectId], kind: StoryObjectKind) -> impl Iterator<Item = StoryObjectRef> + '_ {
    ids.iter().map(move |id| StoryObjectRef::new(*id, kind))
}

fn push_unique(ids: &mut Vec<StoryObjectId>, id: StoryObjectId) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}

impl StoryObject {
    /// Builds an object with empty association fields. Relations are not story
    /// objects in this model, so `StoryObjectKind::Relation` yields `None`.
    pub fn from_base(kind: StoryObjectKind, base: StoryObjectBase) -> Option<Self> {
        let object = match kind {
            StoryObjectKind::Character => StoryObject::Character(Character {
                base,
                ..Default::default()
            }),
            StoryObjectKind::Faction => StoryObject::Faction(Faction {
                base,
                ..Default::default()
            }),
            StoryObjectKind::Thread => StoryObject::Thread(Thread {
                base,
                ..Default::default()
            }),
            StoryObjectKind::Quest => StoryObject::Quest(Plot {
                base,
                ..Default::default()
            }),
            StoryObjectKind::Event => StoryObject::Event(Plot {
                base,
                ..Default::default()
            }),
            StoryObjectKind::Place => StoryObject::Place(base),
            StoryObjectKind::Item => StoryObject::Item(base),
            StoryObjectKind::LoreDocument => StoryObject::LoreDocument(base),
            StoryObjectKind::Relation => return None,
        };
        Some(object)
    }

    pub fn base(&self) -> &StoryObjectBase {
        match self {
            StoryObject::Character(character) => &character.base,
            StoryObject::Faction(faction) => &faction.base,
            StoryObject::Thread(thread) => &thread.base,
            StoryObject::Quest(plot) | StoryObject::Event(plot) => &plot.base,
            StoryObject::Place(base) | StoryObject::Item(base) | StoryObject::LoreDocument(base) => {
                base
            }
        }
    }

    pub fn id(&self) -> StoryObjectId {
        self.base().id
    }

    pub fn event_id(&self) -> EventId {
        self.base().event_id
    }

    pub fn title(&self) -> &str {
        &self.base().title
    }

    pub fn kind(&self) -> StoryObjectKind {
        match self {
            StoryObject::Character(_) => StoryObjectKind::Character,
            StoryObject::Faction(_) => StoryObjectKind::Faction,
            StoryObject::Thread(_) => StoryObjectKind::Thread,
            StoryObject::Quest(_) => StoryObjectKind::Quest,
            StoryObject::Event(_) => StoryObjectKind::Event,
            StoryObject::Place(_) => StoryObjectKind::Place,
            StoryObject::Item(_) => StoryObjectKind::Item,
            StoryObject::LoreDocument(_) => StoryObjectKind::LoreDocument,
        }
    }

    pub fn to_ref(&self) -> StoryObjectRef {
        StoryObjectRef::new(self.id(), self.kind())
    }

    /// Every object this one is linked to through its own association fields.
    pub fn implicit_links(&self) -> Vec<StoryObjectRef> {
        use StoryObjectKind as K;
        match self {
            StoryObject::Character(c) => refs(&c.factions, K::Faction)
                .chain(refs(&c.threads, K::Thread))
                .chain(refs(&c.quests, K::Quest))
                .chain(refs(&c.events, K::Event))
                .collect(),
            StoryObject::Faction(f) => refs(&f.members, K::Character)
                .chain(refs(&f.threads, K::Thread))
                .chain(refs(&f.quests, K::Quest))
                .chain(refs(&f.events, K::Event))
                .collect(),
            StoryObject::Thread(t) => refs(&t.quests, K::Quest)
                .chain(refs(&t.events, K::Event))
                .chain(refs(&t.characters, K::Character))
                .chain(refs(&t.factions, K::Faction))
                .collect(),
            StoryObject::Quest(p) | StoryObject::Event(p) => p
                .thread
                .iter()
                .map(|id| StoryObjectRef::new(*id, K::Thread))
                .chain(refs(&p.characters, K::Character))
                .chain(refs(&p.factions, K::Faction))
                .collect(),
            StoryObject::Place(_) | StoryObject::Item(_) | StoryObject::LoreDocument(_) => {
                Vec::new()
            }
        }
    }

    /// Canonical association rows for this object's fields.
    pub fn associations(&self) -> Vec<Association> {
        use AssociationKind as A;
        let this = self.to_ref();
        let mut rows = Vec::new();
        for other in self.implicit_links() {
            let row = match (this.kind, other.kind) {
                (StoryObjectKind::Character, StoryObjectKind::Faction) => {
                    Association::new(this, other, A::Membership)
                }
                (StoryObjectKind::Faction, StoryObjectKind::Character) => {
                    Association::new(other, this, A::Membership)
                }
                (StoryObjectKind::Character | StoryObjectKind::Faction, _) => {
                    Association::new(this, other, A::Involvement)
                }
                (StoryObjectKind::Thread, StoryObjectKind::Quest | StoryObjectKind::Event) => {
                    Association::new(this, other, A::Ownership)
                }
                (StoryObjectKind::Quest | StoryObjectKind::Event, StoryObjectKind::Thread) => {
                    Association::new(other, this, A::Ownership)
                }
                _ => Association::new(other, this, A::Involvement),
            };
            rows.push(row);
        }
        rows
    }

    /// Folds one association row into the matching field. Rows that do not
    /// touch this object or are not well formed are ignored.
    pub fn attach(&mut self, association: &Association) {
        if !association.is_well_formed() {
            return;
        }
        let Some(other) = association.counterpart(self.id()) else {
            return;
        };
        use AssociationKind as A;
        use StoryObjectKind as K;
        match (self, association.kind, other.kind) {
            (StoryObject::Character(c), A::Membership, K::Faction) => {
                push_unique(&mut c.factions, other.id)
            }
            (StoryObject::Character(c), A::Involvement, K::Thread) => {
                push_unique(&mut c.threads, other.id)
            }
            (StoryObject::Character(c), A::Involvement, K::Quest) => {
                push_unique(&mut c.quests, other.id)
            }
            (StoryObject::Character(c), A::Involvement, K::Event) => {
                push_unique(&mut c.events, other.id)
            }
            (StoryObject::Faction(f), A::Membership, K::Character) => {
                push_unique(&mut f.members, other.id)
            }
            (StoryObject::Faction(f), A::Involvement, K::Thread) => {
                push_unique(&mut f.threads, other.id)
            }
            (StoryObject::Faction(f), A::Involvement, K::Quest) => {
                push_unique(&mut f.quests, other.id)
            }
            (StoryObject::Faction(f), A::Involvement, K::Event) => {
                push_unique(&mut f.events, other.id)
            }
            (StoryObject::Thread(t), A::Involvement, K::Character) => {
                push_unique(&mut t.characters, other.id)
            }
            (StoryObject::Thread(t), A::Involvement, K::Faction) => {
                push_unique(&mut t.factions, other.id)
            }
            (StoryObject::Thread(t), A::Ownership, K::Quest) => {
                push_unique(&mut t.quests, other.id)
            }
            (StoryObject::Thread(t), A::Ownership, K::Event) => {
                push_unique(&mut t.events, other.id)
            }
            (StoryObject::Quest(p) | StoryObject::Event(p), A::Ownership, K::Thread) => {
                // A quest or event has a single owner; the first row wins.
                if p.thread.is_none() {
                    p.thread = Some(other.id);
                }
            }
            (StoryObject::Quest(p) | StoryObject::Event(p), A::Involvement, K::Character) => {
                push_unique(&mut p.characters, other.id)
            }
            (StoryObject::Quest(p) | StoryObject::Event(p), A::Involvement, K::Faction) => {
                push_unique(&mut p.factions, other.id)
            }
            _ => {}
        }
    }
}
