use super::*;
use std::fs;

/// Serialized snapshot of an event's story objects and explicit relations,
/// used to seed a database from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryFixture {
    #[serde(default)]
    pub objects: Vec<StoryObject>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl StoryFixture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            StorageError::Other(format!(
                "Failed to read fixture {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}
