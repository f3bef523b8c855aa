use crate::{EnumConversionError, StoryObjectId, StoryObjectKind, StoryObjectRef};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum AssociationKind {
    /// character -> faction
    Membership,
    /// character or faction -> thread, quest or event
    Involvement,
    /// thread -> quest or event
    Ownership,
}

impl AssociationKind {
    /// Whether a row of this kind may join a `subject` of one kind to an `object` of another.
    pub fn accepts(self, subject: StoryObjectKind, object: StoryObjectKind) -> bool {
        use StoryObjectKind as K;
        match self {
            AssociationKind::Membership => subject == K::Character && object == K::Faction,
            AssociationKind::Involvement => {
                matches!(subject, K::Character | K::Faction)
                    && matches!(object, K::Thread | K::Quest | K::Event)
            }
            AssociationKind::Ownership => {
                subject == K::Thread && matches!(object, K::Quest | K::Event)
            }
        }
    }
}

impl TryFrom<i32> for AssociationKind {
    type Error = EnumConversionError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AssociationKind::Membership),
            1 => Ok(AssociationKind::Involvement),
            2 => Ok(AssociationKind::Ownership),
            _ => Err(EnumConversionError::InvalidAssociationKind(value)),
        }
    }
}

/// Canonical form of an association field.
///
/// A character listing a faction and that faction listing the character as a
/// member are the same row. Typed story objects are views over these rows, so
/// whichever side declared the link, both sides see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Association {
    pub subject: StoryObjectRef,
    pub object: StoryObjectRef,
    pub kind: AssociationKind,
}

impl Association {
    pub fn new(subject: StoryObjectRef, object: StoryObjectRef, kind: AssociationKind) -> Self {
        Self {
            subject,
            object,
            kind,
        }
    }

    /// Rows whose endpoint kinds do not fit the association kind are never links.
    pub fn is_well_formed(&self) -> bool {
        self.kind.accepts(self.subject.kind, self.object.kind)
    }

    /// The other end of the association as seen from `id`, if `id` is an end at all.
    pub fn counterpart(&self, id: StoryObjectId) -> Option<StoryObjectRef> {
        if self.subject.id == id {
            Some(self.object)
        } else if self.object.id == id {
            Some(self.subject)
        } else {
            None
        }
    }
}
