use thiserror::Error;

use crate::catalog::ItemId;

/// Rejections from the cumulative sampler layer.
#[derive(Debug, Error, PartialEq)]
pub enum ProbError {
    #[error("bounds slice is empty")]
    Empty,
    #[error("bounds contain a negative or non-finite value at index {index}: {value}")]
    Negative { index: usize, value: f64 },
    #[error("bounds decrease at index {index}: {value} < {previous}")]
    Decreasing {
        index: usize,
        value: f64,
        previous: f64,
    },
    #[error("bounds end at {max}, not 1")]
    NotNormalized { max: f64 },
}

/// Errors raised while loading the catalog or building banner tables.
///
/// All of them are authoring mistakes in the static data. None are retried
/// or corrected; the banner (and the load that contains it) is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("duplicate item id {0}")]
    DuplicateItemId(ItemId),

    #[error("item id must be positive, got {0}")]
    ZeroItemId(ItemId),

    #[error("duplicate unit id {0}")]
    DuplicateUnitId(u32),

    #[error("item {id} has rarity {rarity}, expected 1..=6")]
    InvalidRarity { id: ItemId, rarity: u8 },

    #[error("duplicate banner id {0}")]
    DuplicateBannerId(u32),

    #[error("banner {banner}: pool is empty")]
    EmptyPool { banner: u32 },

    #[error("banner {banner}: unknown item in pool ({name})")]
    UnknownItem { banner: u32, name: String },

    #[error("banner {banner}: item name {name} matches several items {ids:?}")]
    AmbiguousItem {
        banner: u32,
        name: String,
        ids: Vec<ItemId>,
    },

    #[error("banner {banner}: no weight for rarity {rarity}")]
    MissingRarityWeight { banner: u32, rarity: u8 },

    #[error("banner {banner}: pickup {name} is not in any pool")]
    PickupNotInPool { banner: u32, name: String },

    #[error("banner {banner}: invalid weight {weight} for {what}")]
    InvalidWeight {
        banner: u32,
        what: String,
        weight: f64,
    },

    #[error("banner {banner}: rates do not sum to 100% ({max})")]
    WeightSum { banner: u32, max: f64 },

    #[error("banner {banner}: {source}")]
    Table {
        banner: u32,
        #[source]
        source: ProbError,
    },
}
