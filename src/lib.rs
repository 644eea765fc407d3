//! # gachatables
//!
//! Gacha banners as cumulative drop tables.
//!
//! A banner lists its items per rarity tier, gives each tier a total
//! probability mass and may stack extra mass ("pickups") on selected items.
//! [`GachaTable::build`] turns such a [`BannerDefinition`] plus the item
//! [`Catalog`] into a cumulative table whose last bound is exactly 1, and
//! [`GachaTable::draw`] picks one item per pull with a first-match scan.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use gachatables::GachaMaster;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let master = GachaMaster::load("assets/catalog.yaml", "assets/gacha.yaml")?;
//! let banner = master.banner(None).expect("no banners");
//!
//! let mut rng = rand::rng();
//! for id in banner.table().draw_n(&mut rng, 10) {
//!     let item = master.catalog().get(id).unwrap();
//!     println!("★{} {}", item.rarity, item.name.primary);
//! }
//! # Ok(()) }
//! ```
//!
//! ## Rounding
//! Every emitted cumulative bound is rounded half-up to 6 decimals, and a
//! banner is only accepted when its largest bound is exactly `1.0` after
//! rounding. Weights are never renormalised: a banner whose rates do not add
//! up to 100% is a data error.
//!
//! ## Randomness
//! Nothing here owns a global generator. Every draw takes a `rand::Rng`, so
//! tests can seed one and threads can each keep their own. Tables are
//! immutable and can be shared freely.
//!
//! ## Performance
//! * **Build**: O(n · m) for n pool entries and m catalog items (name joins).
//! * **Sample**: O(n) per draw (1 random number, linear scan).

mod banner;
mod catalog;
mod cumulative;
mod error;
mod master;
mod simulator;
mod table;

pub use banner::{BannerDefinition, PickupOverride, RarityWeight};
pub use catalog::{Catalog, Item, ItemId, Localized};
pub use cumulative::CumulativeSampler;
pub use error::{ConfigError, ProbError};
pub use master::{Banner, GachaMaster};
pub use simulator::{Pull, RateStats, Simulator};
pub use table::{GachaTable, PoolEntry};

use rand::Rng;

/// A generic “drop table”: associates items with cumulative bounds and samples
/// them using an internal [`CumulativeSampler`].
///
/// Build it from any iterator of `(item, bound)` where the bounds are
/// non-decreasing and end at exactly `1.0`.
#[derive(Debug, Clone)]
pub struct DropTable<T> {
    sampler: CumulativeSampler,
    items: Vec<T>,
}

impl<T> DropTable<T> {
    /// Build from any `(item, cumulative bound)` iterator.
    ///
    /// # Errors
    /// * [`ProbError::Empty`] if there are no items.
    /// * [`ProbError::Negative`] if any bound is negative or not finite.
    /// * [`ProbError::Decreasing`] if a bound is below its predecessor.
    /// * [`ProbError::NotNormalized`] if the last bound is not exactly 1.
    ///
    /// # Complexity
    /// O(n) time / O(n) space.
    pub fn from_cumulative<I>(pairs: I) -> Result<Self, ProbError>
    where
        I: IntoIterator<Item = (T, f64)>,
    {
        let mut items = Vec::new();
        let mut bounds = Vec::new();
        for (t, b) in pairs {
            items.push(t);
            bounds.push(b);
        }
        let sampler = CumulativeSampler::new(&bounds)?;
        Ok(Self { sampler, items })
    }

    /// The item whose interval contains `r`.
    pub fn select(&self, r: f64) -> &T {
        &self.items[self.sampler.index_for(r)]
    }

    /// Like [`select`](Self::select), but `None` when `r` is past the last
    /// bound instead of falling back to the last item.
    pub fn find(&self, r: f64) -> Option<&T> {
        self.sampler.position(r).map(|i| &self.items[i])
    }

    /// Sample an item **by reference** (no `Clone` bound).
    ///
    /// # Panics
    /// Never panics for a well-constructed table.
    pub fn sample<'a, R: Rng + ?Sized>(&'a self, rng: &mut R) -> &'a T {
        let idx = self.sampler.sample_index(rng);
        &self.items[idx]
    }

    /// Sample an item **by value** (clones the chosen element).
    ///
    /// Prefer [`sample`](Self::sample) if you don’t need ownership.
    pub fn sample_owned<R: Rng + ?Sized>(&self, rng: &mut R) -> T
    where
        T: Clone,
    {
        self.items[self.sampler.sample_index(rng)].clone()
    }

    /// The final item and its bound.
    pub fn last(&self) -> Option<(&T, f64)> {
        self.iter().last()
    }

    /// `(item, cumulative bound)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, f64)> + '_ {
        self.items.iter().zip(self.sampler.bounds().iter().copied())
    }

    /// `(item, share)` pairs, where the share is the width of the item's
    /// interval.
    pub fn shares(&self) -> impl Iterator<Item = (&T, f64)> + '_ {
        self.items
            .iter()
            .enumerate()
            .map(|(i, t)| (t, self.sampler.share(i).unwrap_or(0.0)))
    }

    /// Number of items in the table.
    pub fn len(&self) -> usize {
        self.sampler.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.sampler.is_empty()
    }
}
