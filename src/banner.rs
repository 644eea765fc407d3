//! Banner definitions as authored in the static data files.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::Localized;
use crate::error::ConfigError;

/// Total mass of one rarity tier, before pickup bonuses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RarityWeight {
    pub rarity: u8,
    pub weight: f64,
}

/// Extra mass stacked on one item's even share.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PickupOverride {
    pub name: String,
    pub weight: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerDefinition {
    pub id: u32,
    #[serde(rename = "nameLocalized")]
    pub name: Localized,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub revival: bool,
    pub weight: Vec<RarityWeight>,
    #[serde(default)]
    pub pick_up: Vec<PickupOverride>,
    #[serde(default)]
    pub rarity6: Vec<String>,
    #[serde(default)]
    pub rarity5: Vec<String>,
    #[serde(default)]
    pub rarity4: Vec<String>,
    #[serde(default)]
    pub rarity3: Vec<String>,
}

impl BannerDefinition {
    /// Parse a YAML list of banners.
    pub fn list_from_yaml_str(s: &str) -> Result<Vec<Self>, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn load_list(path: impl AsRef<Path>) -> Result<Vec<Self>, ConfigError> {
        let s = std::fs::read_to_string(path)?;
        Self::list_from_yaml_str(&s)
    }

    /// Pool names tagged with their tier, highest rarity first, each tier in
    /// declaration order.
    pub fn pool(&self) -> impl Iterator<Item = (u8, &str)> + '_ {
        [
            (6, &self.rarity6),
            (5, &self.rarity5),
            (4, &self.rarity4),
            (3, &self.rarity3),
        ]
        .into_iter()
        .flat_map(|(rarity, names)| names.iter().map(move |n| (rarity, n.as_str())))
    }

    /// Names declared for one tier.
    pub fn tier(&self, rarity: u8) -> &[String] {
        match rarity {
            6 => &self.rarity6,
            5 => &self.rarity5,
            4 => &self.rarity4,
            3 => &self.rarity3,
            _ => &[],
        }
    }

    pub fn rarity_weight(&self, rarity: u8) -> Option<f64> {
        self.weight
            .iter()
            .find(|w| w.rarity == rarity)
            .map(|w| w.weight)
    }

    pub fn pickup(&self, name: &str) -> Option<&PickupOverride> {
        self.pick_up.iter().find(|p| p.name == name)
    }

    pub fn is_pickup(&self, name: &str) -> bool {
        self.pickup(name).is_some()
    }

    pub fn in_pool(&self, name: &str) -> bool {
        self.pool().any(|(_, n)| n == name)
    }
}
