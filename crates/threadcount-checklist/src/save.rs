//! Save document access.
//!
//! A save document is one decoded snapshot of a player's progress,
//! produced by an external decoder. The snapshot is partial and
//! schema-evolving: every accessor treats a missing substructure as
//! empty rather than as an error.

use serde_json::Value;

/// One decoded save snapshot.
///
/// Wraps the loosely-typed nested record an external save decoder
/// produces. The document is read-only for the duration of a scan;
/// callers that refresh saves concurrently must snapshot first.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveDocument {
    root: Value,
}

impl SaveDocument {
    /// Player-state section holding quest completion records.
    pub const QUESTS: &'static str = "QuestCompletionData";
    /// Player-state section holding tool inventory records.
    pub const TOOLS: &'static str = "Tools";
    /// Player-state section holding crest equip records.
    pub const TOOL_EQUIPS: &'static str = "ToolEquips";
    /// Player-state section holding collectable count records.
    pub const COLLECTABLES: &'static str = "Collectables";

    /// Wraps a decoded save value.
    #[must_use]
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// Returns the underlying decoded value.
    #[must_use]
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Flat player-state record, if present.
    fn player_data(&self) -> Option<&serde_json::Map<String, Value>> {
        self.root.get("playerData")?.as_object()
    }

    /// Value stored at `key` in the player-state record.
    #[must_use]
    pub fn player_value(&self, key: &str) -> Option<&Value> {
        self.player_data()?.get(key)
    }

    /// Records of a named player-state list section (`<section>.savedData`).
    pub fn saved_records(&self, section: &str) -> impl Iterator<Item = &Value> {
        self.player_value(section)
            .and_then(|s| s.get("savedData"))
            .and_then(Value::as_array)
            .map(|records| records.iter())
            .into_iter()
            .flatten()
    }

    /// First record in `section` whose `Name` matches, in document order.
    ///
    /// Document order is authoritative when names repeat.
    #[must_use]
    pub fn find_record(&self, section: &str, name: &str) -> Option<&Value> {
        self.saved_records(section)
            .find(|record| record.get("Name").and_then(Value::as_str) == Some(name))
    }

    /// `Data` sub-record of the first record in `section` whose `Name`
    /// matches.
    #[must_use]
    pub fn record_data(&self, section: &str, name: &str) -> Option<&Value> {
        self.find_record(section, name)?.get("Data")
    }

    /// Per-scene persisted boolean entries.
    pub fn scene_entries(&self) -> impl Iterator<Item = &Value> {
        self.root
            .get("sceneData")
            .and_then(|scene| scene.get("persistentBools"))
            .and_then(|bools| bools.get("serializedList"))
            .and_then(Value::as_array)
            .map(|entries| entries.iter())
            .into_iter()
            .flatten()
    }

    /// Stored value of the first scene entry matching both the scene
    /// identifier and the value identifier, in document order.
    #[must_use]
    pub fn scene_value(&self, scene: &str, id: &str) -> Option<&Value> {
        self.scene_entries()
            .find(|entry| {
                entry.get("SceneName").and_then(Value::as_str) == Some(scene)
                    && entry.get("ID").and_then(Value::as_str) == Some(id)
            })?
            .get("Value")
    }
}

impl From<Value> for SaveDocument {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}

/// Truthiness of a loosely-typed save value.
///
/// Mirrors the coercion rules of the save format's host runtime: `null`
/// is false, booleans are themselves, numbers are false iff zero,
/// strings are false iff empty, arrays and objects are always true.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(truthy) => *truthy,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
