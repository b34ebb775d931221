//! Unlock rules: where and how an entry's unlock state is stored.
//!
//! This module provides:
//! - The closed set of lookup rules a catalog entry can carry
//! - Key-shape validation when rules are built from catalog data
//! - Resolution of a rule against a save document

use crate::save::{is_truthy, SaveDocument};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use threadcount_common::{RuleError, RuleResult};

/// Kind tags accepted in catalog data.
pub mod kind {
    /// Truthy player-state flag.
    pub const FLAG: &str = "flag";
    /// Player-state counter with a threshold.
    pub const COUNTER_FLAG: &str = "counter_flag";
    /// Completed quest record.
    pub const QUEST: &str = "quest";
    /// Per-scene persisted value.
    pub const SCENE_VALUE: &str = "scene_value";
    /// Unlocked, non-hidden tool inventory record.
    pub const INVENTORY_ITEM: &str = "inventory_item";
    /// Any of several tool variants.
    pub const UPGRADABLE_INVENTORY_ITEM: &str = "upgradable_inventory_item";
    /// Unlocked crest equip record.
    pub const EQUIP_ITEM: &str = "equip_item";
    /// Collectable record with a positive amount.
    pub const COLLECTABLE_COUNT: &str = "collectable_count";
}

/// An unlock rule as it appears on the wire: a kind tag plus a key whose
/// shape depends on the kind (a name, a pair, or a list of names).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRule {
    /// Kind tag.
    pub kind: String,
    /// Identifying key for the kind.
    #[serde(default)]
    pub key: Value,
}

/// Where and how one checklist entry's unlock state is stored in a save
/// document.
///
/// Key shape is validated when a rule is built from catalog data, never
/// during resolution. Resolution is total: a missing path in the save
/// document resolves to locked, not to an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRule", into = "RawRule")]
pub enum UnlockRule {
    /// Truthy value stored at a player-state key.
    Flag {
        /// Player-state key.
        flag: String,
    },
    /// Numeric player-state value that must reach a threshold.
    CounterFlag {
        /// Player-state key.
        flag: String,
        /// Minimum value counted as unlocked.
        threshold: i64,
    },
    /// Quest record whose completion flag is set.
    Quest {
        /// Quest name.
        quest: String,
    },
    /// Truthy per-scene persisted value.
    SceneValue {
        /// Scene identifier.
        scene: String,
        /// Value identifier within the scene.
        id: String,
    },
    /// Tool inventory record that is unlocked and not hidden.
    InventoryItem {
        /// Tool name.
        item: String,
    },
    /// Any of several tool variants under the inventory-item rule.
    UpgradableInventoryItem {
        /// Variant names, checked in order; the first hit short-circuits.
        variants: Vec<String>,
    },
    /// Crest equip record that is unlocked.
    EquipItem {
        /// Crest name.
        equip: String,
    },
    /// Collectable record with a positive amount.
    CollectableCount {
        /// Collectable name.
        collectable: String,
    },
}

impl UnlockRule {
    /// Creates a flag rule.
    #[must_use]
    pub fn flag(flag: impl Into<String>) -> Self {
        Self::Flag { flag: flag.into() }
    }

    /// Creates a counter-flag rule.
    #[must_use]
    pub fn counter_flag(flag: impl Into<String>, threshold: i64) -> Self {
        Self::CounterFlag {
            flag: flag.into(),
            threshold,
        }
    }

    /// Creates a quest rule.
    #[must_use]
    pub fn quest(quest: impl Into<String>) -> Self {
        Self::Quest {
            quest: quest.into(),
        }
    }

    /// Creates a scene-value rule.
    #[must_use]
    pub fn scene_value(scene: impl Into<String>, id: impl Into<String>) -> Self {
        Self::SceneValue {
            scene: scene.into(),
            id: id.into(),
        }
    }

    /// Creates an inventory-item rule.
    #[must_use]
    pub fn inventory_item(item: impl Into<String>) -> Self {
        Self::InventoryItem { item: item.into() }
    }

    /// Creates an upgradable inventory-item rule over variant names.
    #[must_use]
    pub fn upgradable_inventory_item<I, S>(variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::UpgradableInventoryItem {
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates an equip-item rule.
    #[must_use]
    pub fn equip_item(equip: impl Into<String>) -> Self {
        Self::EquipItem {
            equip: equip.into(),
        }
    }

    /// Creates a collectable-count rule.
    #[must_use]
    pub fn collectable_count(collectable: impl Into<String>) -> Self {
        Self::CollectableCount {
            collectable: collectable.into(),
        }
    }

    /// Returns the rule's kind tag.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Flag { .. } => kind::FLAG,
            Self::CounterFlag { .. } => kind::COUNTER_FLAG,
            Self::Quest { .. } => kind::QUEST,
            Self::SceneValue { .. } => kind::SCENE_VALUE,
            Self::InventoryItem { .. } => kind::INVENTORY_ITEM,
            Self::UpgradableInventoryItem { .. } => kind::UPGRADABLE_INVENTORY_ITEM,
            Self::EquipItem { .. } => kind::EQUIP_ITEM,
            Self::CollectableCount { .. } => kind::COLLECTABLE_COUNT,
        }
    }

    /// Validates a raw catalog value into a rule.
    pub fn from_value(value: &Value) -> RuleResult<Self> {
        let object = value.as_object().ok_or(RuleError::MissingKind)?;
        let kind = object
            .get("kind")
            .and_then(Value::as_str)
            .ok_or(RuleError::MissingKind)?;
        let key = object.get("key").cloned().unwrap_or(Value::Null);
        Self::try_from(RawRule {
            kind: kind.to_string(),
            key,
        })
    }

    /// Resolves this rule against a save document.
    ///
    /// Total function: every absent key or substructure resolves to
    /// `false`.
    #[must_use]
    pub fn resolve(&self, save: &SaveDocument) -> bool {
        match self {
            Self::Flag { flag } => save.player_value(flag).is_some_and(is_truthy),
            Self::CounterFlag { flag, threshold } => {
                save.player_value(flag).is_some_and(|value| {
                    is_truthy(value) && value.as_f64().is_some_and(|n| n >= *threshold as f64)
                })
            },
            Self::Quest { quest } => save
                .record_data(SaveDocument::QUESTS, quest)
                .and_then(|data| data.get("IsCompleted"))
                .is_some_and(is_truthy),
            Self::SceneValue { scene, id } => {
                save.scene_value(scene, id).is_some_and(is_truthy)
            },
            Self::InventoryItem { item } => inventory_unlocked(save, item),
            Self::UpgradableInventoryItem { variants } => variants
                .iter()
                .any(|variant| inventory_unlocked(save, variant)),
            Self::EquipItem { equip } => save
                .record_data(SaveDocument::TOOL_EQUIPS, equip)
                .and_then(|data| data.get("IsUnlocked"))
                .is_some_and(is_truthy),
            Self::CollectableCount { collectable } => save
                .record_data(SaveDocument::COLLECTABLES, collectable)
                .and_then(|data| data.get("Amount"))
                .and_then(Value::as_f64)
                .is_some_and(|amount| amount > 0.0),
        }
    }
}

/// Shared inventory-item predicate: the record must exist, be unlocked,
/// and not be hidden.
fn inventory_unlocked(save: &SaveDocument, item: &str) -> bool {
    save.record_data(SaveDocument::TOOLS, item)
        .is_some_and(|data| {
            data.get("IsUnlocked").is_some_and(is_truthy)
                && !data.get("IsHidden").is_some_and(is_truthy)
        })
}

impl TryFrom<RawRule> for UnlockRule {
    type Error = RuleError;

    fn try_from(raw: RawRule) -> RuleResult<Self> {
        let RawRule { kind, key } = raw;
        match kind.as_str() {
            kind::FLAG => Ok(Self::Flag {
                flag: name_key(&kind, &key)?,
            }),
            kind::COUNTER_FLAG => {
                let (flag, threshold) = counter_key(&kind, &key)?;
                Ok(Self::CounterFlag { flag, threshold })
            },
            kind::QUEST => Ok(Self::Quest {
                quest: name_key(&kind, &key)?,
            }),
            kind::SCENE_VALUE => {
                let (scene, id) = pair_key(&kind, &key)?;
                Ok(Self::SceneValue { scene, id })
            },
            kind::INVENTORY_ITEM => Ok(Self::InventoryItem {
                item: name_key(&kind, &key)?,
            }),
            kind::UPGRADABLE_INVENTORY_ITEM => Ok(Self::UpgradableInventoryItem {
                variants: names_key(&kind, &key)?,
            }),
            kind::EQUIP_ITEM => Ok(Self::EquipItem {
                equip: name_key(&kind, &key)?,
            }),
            kind::COLLECTABLE_COUNT => Ok(Self::CollectableCount {
                collectable: name_key(&kind, &key)?,
            }),
            _ => Err(RuleError::UnknownKind { kind }),
        }
    }
}

impl From<UnlockRule> for RawRule {
    fn from(rule: UnlockRule) -> Self {
        let kind = rule.kind();
        let key = match rule {
            UnlockRule::Flag { flag } => Value::String(flag),
            UnlockRule::CounterFlag { flag, threshold } => {
                Value::Array(vec![Value::String(flag), Value::from(threshold)])
            },
            UnlockRule::Quest { quest } => Value::String(quest),
            UnlockRule::SceneValue { scene, id } => {
                Value::Array(vec![Value::String(scene), Value::String(id)])
            },
            UnlockRule::InventoryItem { item } => Value::String(item),
            UnlockRule::UpgradableInventoryItem { variants } => {
                Value::Array(variants.into_iter().map(Value::String).collect())
            },
            UnlockRule::EquipItem { equip } => Value::String(equip),
            UnlockRule::CollectableCount { collectable } => Value::String(collectable),
        };
        Self {
            kind: kind.to_string(),
            key,
        }
    }
}

fn bad_key(kind: &str, reason: &str) -> RuleError {
    RuleError::BadKey {
        kind: kind.to_string(),
        reason: reason.to_string(),
    }
}

/// Extracts a single-name key.
fn name_key(kind: &str, key: &Value) -> RuleResult<String> {
    key.as_str()
        .map(str::to_string)
        .ok_or_else(|| bad_key(kind, "expected a name string"))
}

/// Extracts a `[name, threshold]` key.
fn counter_key(kind: &str, key: &Value) -> RuleResult<(String, i64)> {
    let parts = key
        .as_array()
        .filter(|parts| parts.len() == 2)
        .ok_or_else(|| bad_key(kind, "expected a [name, threshold] pair"))?;
    let name = parts[0]
        .as_str()
        .ok_or_else(|| bad_key(kind, "pair name must be a string"))?;
    let threshold = parts[1]
        .as_i64()
        .ok_or_else(|| bad_key(kind, "pair threshold must be an integer"))?;
    Ok((name.to_string(), threshold))
}

/// Extracts a `[scene, id]` key.
fn pair_key(kind: &str, key: &Value) -> RuleResult<(String, String)> {
    let parts = key
        .as_array()
        .filter(|parts| parts.len() == 2)
        .ok_or_else(|| bad_key(kind, "expected a [scene, id] pair"))?;
    match (parts[0].as_str(), parts[1].as_str()) {
        (Some(scene), Some(id)) => Ok((scene.to_string(), id.to_string())),
        _ => Err(bad_key(kind, "pair entries must be strings")),
    }
}

/// Extracts a list-of-names key (possibly empty).
fn names_key(kind: &str, key: &Value) -> RuleResult<Vec<String>> {
    let names = key
        .as_array()
        .ok_or_else(|| bad_key(kind, "expected a list of name strings"))?;
    names
        .iter()
        .map(|name| {
            name.as_str()
                .map(str::to_string)
                .ok_or_else(|| bad_key(kind, "every variant name must be a string"))
        })
        .collect()
}

/// An unlock rule as authored in catalog data.
///
/// Loading preserves a malformed entry's fault instead of failing the
/// whole catalog: the fault resurfaces when the item is evaluated,
/// scoped to that item alone.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemRule {
    /// Well-formed rule.
    Valid(UnlockRule),
    /// Rule that failed validation, with the preserved fault.
    Invalid(RuleError),
}

impl ItemRule {
    /// Validates a raw catalog value into an authored rule.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match UnlockRule::from_value(value) {
            Ok(rule) => Self::Valid(rule),
            Err(fault) => Self::Invalid(fault),
        }
    }

    /// Resolves against a save document.
    ///
    /// The only error path in the engine: a preserved authoring fault.
    pub fn resolve(&self, save: &SaveDocument) -> RuleResult<bool> {
        match self {
            Self::Valid(rule) => Ok(rule.resolve(save)),
            Self::Invalid(fault) => Err(fault.clone()),
        }
    }

    /// Returns the validated rule, if well-formed.
    #[must_use]
    pub fn rule(&self) -> Option<&UnlockRule> {
        match self {
            Self::Valid(rule) => Some(rule),
            Self::Invalid(_) => None,
        }
    }

    /// Returns the preserved fault, if malformed.
    #[must_use]
    pub fn fault(&self) -> Option<&RuleError> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(fault) => Some(fault),
        }
    }
}

impl From<UnlockRule> for ItemRule {
    fn from(rule: UnlockRule) -> Self {
        Self::Valid(rule)
    }
}

impl<'de> Deserialize<'de> for ItemRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}
