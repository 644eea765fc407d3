//! Loading the whole data set: catalog plus every banner, validated up front.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::banner::BannerDefinition;
use crate::catalog::{Catalog, Item, ItemId};
use crate::error::ConfigError;
use crate::table::GachaTable;

/// A banner definition together with its built table.
#[derive(Debug, Clone)]
pub struct Banner {
    definition: BannerDefinition,
    table: GachaTable,
    rarity: HashMap<ItemId, u8>,
    pickups: Vec<(ItemId, f64)>,
}

impl Banner {
    pub fn new(catalog: &Catalog, definition: BannerDefinition) -> Result<Self, ConfigError> {
        let table = GachaTable::build(catalog, &definition)?;

        let mut rarity = HashMap::with_capacity(table.len());
        let mut pickups = Vec::new();
        for entry in table.entries() {
            // build() only emits ids it resolved in this catalog
            let Some(item) = catalog.get(entry.id) else {
                continue;
            };
            if rarity.insert(item.id, item.rarity).is_some() {
                continue;
            }
            if let Some(pickup) = definition.pickup(item.name_key()) {
                pickups.push((item.id, pickup.weight));
            }
        }

        Ok(Self {
            definition,
            table,
            rarity,
            pickups,
        })
    }

    pub fn id(&self) -> u32 {
        self.definition.id
    }

    pub fn definition(&self) -> &BannerDefinition {
        &self.definition
    }

    pub fn table(&self) -> &GachaTable {
        &self.table
    }

    pub fn rarity_of(&self, id: ItemId) -> Option<u8> {
        self.rarity.get(&id).copied()
    }

    pub fn is_pickup(&self, id: ItemId) -> bool {
        self.pickups.iter().any(|&(p, _)| p == id)
    }

    /// Pickup items in table order.
    pub fn pickups(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.pickups.iter().map(|&(id, _)| id)
    }

    /// Chance of pulling any item of `rarity`: the tier's base weight plus the
    /// pickup weights of items of that rarity.
    pub fn rarity_rate(&self, rarity: u8) -> Option<f64> {
        let base = self.definition.rarity_weight(rarity)?;
        let bonus: f64 = self
            .pickups
            .iter()
            .filter(|&&(id, _)| self.rarity_of(id) == Some(rarity))
            .map(|&(_, weight)| weight)
            .sum();
        Some(base + bonus)
    }

    /// Chance of pulling any pickup item.
    pub fn pickup_rate(&self) -> f64 {
        self.pickups
            .iter()
            .filter_map(|&(id, _)| self.table.share(id))
            .sum()
    }

    /// Items of one rarity, in table order.
    pub fn items_of_rarity<'c>(&self, catalog: &'c Catalog, rarity: u8) -> Vec<&'c Item> {
        let mut seen = HashSet::new();
        self.table
            .entries()
            .filter(|e| self.rarity_of(e.id) == Some(rarity) && seen.insert(e.id))
            .filter_map(|e| catalog.get(e.id))
            .collect()
    }
}

/// Catalog and banners, all validated.
#[derive(Debug, Clone)]
pub struct GachaMaster {
    catalog: Catalog,
    banners: Vec<Banner>,
}

impl GachaMaster {
    /// Build every banner's table. Any error rejects the whole set; banners
    /// are kept in start-date order.
    pub fn new(catalog: Catalog, definitions: Vec<BannerDefinition>) -> Result<Self, ConfigError> {
        let mut ids = HashSet::with_capacity(definitions.len());
        let mut banners = Vec::with_capacity(definitions.len());
        for definition in definitions {
            if !ids.insert(definition.id) {
                return Err(ConfigError::DuplicateBannerId(definition.id));
            }
            let id = definition.id;
            let banner = Banner::new(&catalog, definition).inspect_err(|error| {
                tracing::error!(banner = id, %error, "rejected banner");
            })?;
            banners.push(banner);
        }
        banners.sort_by_key(|b| b.definition.start);

        tracing::info!(
            items = catalog.len(),
            banners = banners.len(),
            "loaded gacha master"
        );
        Ok(Self { catalog, banners })
    }

    pub fn from_yaml_strs(catalog: &str, banners: &str) -> Result<Self, ConfigError> {
        let catalog = Catalog::from_yaml_str(catalog)?;
        let banners = BannerDefinition::list_from_yaml_str(banners)?;
        Self::new(catalog, banners)
    }

    pub fn load(
        catalog_path: impl AsRef<Path>,
        banners_path: impl AsRef<Path>,
    ) -> Result<Self, ConfigError> {
        let catalog = Catalog::load(catalog_path)?;
        let banners = BannerDefinition::load_list(banners_path)?;
        Self::new(catalog, banners)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Banners, oldest first.
    pub fn banners(&self) -> &[Banner] {
        &self.banners
    }

    pub fn get(&self, id: u32) -> Option<&Banner> {
        self.banners.iter().find(|b| b.id() == id)
    }

    /// Newest banner that is not a revival.
    pub fn latest(&self) -> Option<&Banner> {
        self.banners.iter().rev().find(|b| !b.definition.revival)
    }

    /// The requested banner, or [`latest`](Self::latest) when `id` is absent
    /// or unknown.
    pub fn banner(&self, id: Option<u32>) -> Option<&Banner> {
        id.and_then(|id| self.get(id)).or_else(|| self.latest())
    }
}
