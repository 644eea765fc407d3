//! Item catalog: every collectible a banner may reference.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Catalog identifier of a collectible.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A display name in the two languages the data files carry.
///
/// `primary` doubles as the key banners use to reference items.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localized {
    pub primary: String,
    pub secondary: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    #[serde(default)]
    pub unit_id: Option<u32>,
    #[serde(rename = "nameLocalized")]
    pub name: Localized,
    pub rarity: u8,
    #[serde(default)]
    pub limited: bool,
}

impl Item {
    /// Key used by banner pools and pickup lists.
    pub fn name_key(&self) -> &str {
        &self.name.primary
    }
}

/// Validated, immutable list of items.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    /// Build a catalog, rejecting zero or duplicate ids, duplicate unit ids
    /// and rarities outside `1..=6`.
    pub fn new(items: Vec<Item>) -> Result<Self, ConfigError> {
        let mut ids = HashSet::with_capacity(items.len());
        let mut unit_ids = HashSet::with_capacity(items.len());
        for item in &items {
            if item.id.0 == 0 {
                return Err(ConfigError::ZeroItemId(item.id));
            }
            if !ids.insert(item.id) {
                return Err(ConfigError::DuplicateItemId(item.id));
            }
            if let Some(unit_id) = item.unit_id {
                if !unit_ids.insert(unit_id) {
                    return Err(ConfigError::DuplicateUnitId(unit_id));
                }
            }
            if !(1..=6).contains(&item.rarity) {
                return Err(ConfigError::InvalidRarity {
                    id: item.id,
                    rarity: item.rarity,
                });
            }
        }
        Ok(Self { items })
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let items: Vec<Item> = serde_yaml::from_str(s)?;
        Self::new(items)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let s = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&s)
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// All items whose name key is `name`.
    pub fn by_name<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a Item> + use<'a, 'n> {
        self.items.iter().filter(move |item| item.name_key() == name)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
