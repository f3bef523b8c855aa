use serde::{Deserialize, Serialize};
use specta::Type;
use storygraph_core::StoryObjectKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Character,
    Faction,
    Thread,
    Quest,
    Event,
    Place,
    Item,
    Relation,
    LoreDocument,
}

impl From<StoryObjectKind> for NodeType {
    fn from(value: StoryObjectKind) -> Self {
        match value {
            StoryObjectKind::Character => Self::Character,
            StoryObjectKind::Faction => Self::Faction,
            StoryObjectKind::Thread => Self::Thread,
            StoryObjectKind::Quest => Self::Quest,
            StoryObjectKind::Event => Self::Event,
            StoryObjectKind::Place => Self::Place,
            StoryObjectKind::Item => Self::Item,
            StoryObjectKind::Relation => Self::Relation,
            StoryObjectKind::LoreDocument => Self::LoreDocument,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    Relation,
    Implicit,
}
