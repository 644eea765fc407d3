//! Banner → cumulative table, and draws against it.

use rand::Rng;
use serde::Serialize;

use crate::DropTable;
use crate::banner::BannerDefinition;
use crate::catalog::{Catalog, Item, ItemId};
use crate::error::ConfigError;

/// Half-up rounding to 6 decimals, applied to every emitted bound.
pub(crate) fn round6(x: f64) -> f64 {
    (x * 1_000_000.0 + 0.5).floor() / 1_000_000.0
}

/// One row of a resolved table: `weight` is the cumulative bound.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct PoolEntry {
    pub id: ItemId,
    pub weight: f64,
}

/// Resolved, normalized table for one banner.
#[derive(Debug, Clone)]
pub struct GachaTable {
    banner: u32,
    table: DropTable<ItemId>,
}

impl GachaTable {
    /// Resolve a banner's pools against the catalog and accumulate its
    /// weights.
    ///
    /// Items are visited rarity 6 → 3, each tier in declaration order. An
    /// item's share is its tier weight split evenly over the tier, plus its
    /// pickup weight if it has one.
    ///
    /// # Errors
    /// Any unresolved or ambiguous name, missing tier weight, bad weight, or a
    /// largest bound other than exactly `1.0` rejects the whole banner.
    pub fn build(catalog: &Catalog, banner: &BannerDefinition) -> Result<Self, ConfigError> {
        let id = banner.id;
        for w in &banner.weight {
            check_weight(id, || format!("rarity {}", w.rarity), w.weight)?;
        }
        for p in &banner.pick_up {
            check_weight(id, || format!("pickup {}", p.name), p.weight)?;
            if !banner.in_pool(&p.name) {
                return Err(ConfigError::PickupNotInPool {
                    banner: id,
                    name: p.name.clone(),
                });
            }
        }

        let mut accum = 0.0f64;
        let mut pairs = Vec::new();
        for (rarity, name) in banner.pool() {
            let item = resolve(catalog, id, name, rarity)?;
            let tier_weight = banner
                .rarity_weight(rarity)
                .ok_or(ConfigError::MissingRarityWeight { banner: id, rarity })?;

            accum += tier_weight / banner.tier(rarity).len() as f64;
            if let Some(pickup) = banner.pickup(name) {
                accum += pickup.weight;
            }
            pairs.push((item.id, round6(accum)));
        }

        if pairs.is_empty() {
            return Err(ConfigError::EmptyPool { banner: id });
        }
        let max = pairs.iter().map(|&(_, w)| w).fold(0.0f64, f64::max);
        if max != 1.0 {
            return Err(ConfigError::WeightSum { banner: id, max });
        }

        let table = DropTable::from_cumulative(pairs)
            .map_err(|source| ConfigError::Table { banner: id, source })?;
        tracing::debug!(banner = id, entries = table.len(), "built gacha table");
        Ok(Self { banner: id, table })
    }

    pub fn banner_id(&self) -> u32 {
        self.banner
    }

    /// The item a draw of `r` lands on: the first entry whose bound is `>= r`.
    ///
    /// `r` past the last bound (never produced by a `[0, 1)` source) lands on
    /// the last entry.
    pub fn select(&self, r: f64) -> ItemId {
        if let Some(&id) = self.table.find(r) {
            return id;
        }
        let Some((&last, max)) = self.table.last() else {
            unreachable!("banner {} has an empty table", self.banner);
        };
        debug_assert!(max == 1.0, "banner {} table ends at {max}", self.banner);
        tracing::warn!(banner = self.banner, r, max, "draw value past the end of the table");
        last
    }

    /// One pull.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> ItemId {
        let r: f64 = rng.random(); // [0, 1)
        self.select(r)
    }

    /// `n` independent pulls, with replacement.
    pub fn draw_n<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<ItemId> {
        (0..n).map(|_| self.draw(rng)).collect()
    }

    /// Rows in draw order.
    pub fn entries(&self) -> impl Iterator<Item = PoolEntry> + '_ {
        self.table
            .iter()
            .map(|(&id, weight)| PoolEntry { id, weight })
    }

    /// Probability of drawing `id`, or `None` if it is not in the table.
    pub fn share(&self, id: ItemId) -> Option<f64> {
        self.table
            .shares()
            .filter(|&(&item, _)| item == id)
            .map(|(_, share)| share)
            .reduce(|a, b| a + b)
    }

    /// [`share`](Self::share) as a percentage rounded to 2 decimals.
    pub fn rate_percent(&self, id: ItemId) -> Option<f64> {
        self.share(id).map(|s| (s * 10_000.0).round() / 100.0)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.table.iter().any(|(&item, _)| item == id)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

fn check_weight(banner: u32, what: impl FnOnce() -> String, weight: f64) -> Result<(), ConfigError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidWeight {
            banner,
            what: what(),
            weight,
        })
    }
}

/// Exactly one catalog item for `name`. A name shared by several items is an
/// error even when only one of them has the pool's rarity.
fn resolve<'c>(catalog: &'c Catalog, banner: u32, name: &str, rarity: u8) -> Result<&'c Item, ConfigError> {
    let candidates: Vec<&Item> = catalog.by_name(name).collect();
    let item = match candidates.as_slice() {
        [] => {
            return Err(ConfigError::UnknownItem {
                banner,
                name: name.to_owned(),
            });
        }
        [item] => *item,
        _ => {
            return Err(ConfigError::AmbiguousItem {
                banner,
                name: name.to_owned(),
                ids: candidates.iter().map(|item| item.id).collect(),
            });
        }
    };
    if item.rarity != rarity {
        tracing::warn!(
            banner,
            name,
            pool = rarity,
            item = item.rarity,
            "item listed under a different rarity tier"
        );
    }
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banner::tests::banner;
    use crate::catalog::tests::item;
    use rand::{SeedableRng, rngs::StdRng};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn two_tier() -> (Catalog, BannerDefinition) {
        let catalog = Catalog::new(vec![
            item(1, "A", 6),
            item(2, "B", 6),
            item(3, "C", 5),
            item(4, "D", 5),
            item(5, "E", 5),
            item(6, "F", 3),
        ])
        .unwrap();
        let mut b = banner(1, &[(6, 0.02), (5, 0.08), (3, 0.85)], &[("A", 0.05)]);
        b.rarity6 = names(&["A", "B"]);
        b.rarity5 = names(&["C", "D", "E"]);
        b.rarity3 = names(&["F"]);
        (catalog, b)
    }

    #[test]
    fn round6_is_half_up() {
        assert_eq!(round6(0.12345651), 0.123457);
        assert_eq!(round6(0.1234564), 0.123456);
        assert_eq!(round6(0.9999996), 1.0);
        assert_eq!(round6(0.9999994), 0.999999);
        assert_eq!(round6(0.1 + 0.2), 0.3);
    }

    #[test]
    fn saturating_pickup_leaves_zero_width_entry() {
        let catalog = Catalog::new(vec![item(1, "A", 6), item(2, "B", 6)]).unwrap();
        let mut b = banner(7, &[(6, 0.0)], &[("A", 1.0)]);
        b.rarity6 = names(&["A", "B"]);

        let table = GachaTable::build(&catalog, &b).unwrap();
        let entries: Vec<_> = table.entries().collect();
        assert_eq!(
            entries,
            [
                PoolEntry { id: ItemId(1), weight: 1.0 },
                PoolEntry { id: ItemId(2), weight: 1.0 },
            ]
        );
        assert_eq!(table.share(ItemId(2)), Some(0.0));
        assert_eq!(table.select(1.0), ItemId(1));

        let mut rng = StdRng::seed_from_u64(3);
        assert!(table.draw_n(&mut rng, 10_000).iter().all(|&id| id == ItemId(1)));
    }

    #[test]
    fn pickup_on_top_of_a_full_tier_overflows() {
        // The pickup stacks on A's even share, and B still gets its own half.
        let catalog = Catalog::new(vec![item(1, "A", 6), item(2, "B", 6)]).unwrap();
        let mut b = banner(7, &[(6, 1.0)], &[("A", 0.5)]);
        b.rarity6 = names(&["A", "B"]);
        match GachaTable::build(&catalog, &b) {
            Err(ConfigError::WeightSum { banner: 7, max }) => assert_eq!(max, 1.5),
            other => panic!("expected WeightSum, got {other:?}"),
        }
    }

    #[test]
    fn normalized_and_monotonic() {
        let (catalog, b) = two_tier();
        let table = GachaTable::build(&catalog, &b).unwrap();
        let weights: Vec<f64> = table.entries().map(|e| e.weight).collect();
        assert_eq!(weights.len(), 6);
        assert!(weights.windows(2).all(|w| w[1] >= w[0]), "{weights:?}");
        assert_eq!(*weights.last().unwrap(), 1.0);
        assert_eq!(weights, [0.06, 0.07, 0.096667, 0.123333, 0.15, 1.0]);
    }

    #[test]
    fn pickup_is_additive() {
        let (catalog, b) = two_tier();
        let table = GachaTable::build(&catalog, &b).unwrap();
        let a = table.share(ItemId(1)).unwrap();
        let other = table.share(ItemId(2)).unwrap();
        assert!((a - (0.01 + 0.05)).abs() < 1e-9, "{a}");
        assert!((other - 0.01).abs() < 1e-9, "{other}");
        assert_eq!(table.rate_percent(ItemId(1)), Some(6.0));
        assert_eq!(table.rate_percent(ItemId(3)), Some(2.67));
        assert_eq!(table.rate_percent(ItemId(99)), None);
    }

    #[test]
    fn value_past_the_end_lands_on_last_entry() {
        let (catalog, b) = two_tier();
        let table = GachaTable::build(&catalog, &b).unwrap();
        assert_eq!(table.select(1.0), ItemId(6));
        assert_eq!(table.select(1.5), ItemId(6));
        assert_eq!(table.select(f64::NAN), ItemId(6));
    }

    #[test]
    fn fixed_value_always_selects_same_item() {
        let (catalog, b) = two_tier();
        let table = GachaTable::build(&catalog, &b).unwrap();
        for _ in 0..10 {
            assert_eq!(table.select(0.065), ItemId(2));
        }
        assert_eq!(table.select(0.0), ItemId(1));
        assert_eq!(table.select(0.06), ItemId(1));
        assert_eq!(table.select(0.15), ItemId(5));
        assert_eq!(table.select(0.999999), ItemId(6));
    }

    #[test]
    fn distribution_converges() {
        let (catalog, b) = two_tier();
        let table = GachaTable::build(&catalog, &b).unwrap();

        let mut rng = StdRng::seed_from_u64(42);
        let draws = 200_000usize;
        let mut counts = std::collections::HashMap::new();
        for id in table.draw_n(&mut rng, draws) {
            *counts.entry(id).or_insert(0usize) += 1;
        }

        for entry in table.entries() {
            let p = table.share(entry.id).unwrap();
            let emp = counts.get(&entry.id).copied().unwrap_or(0) as f64 / draws as f64;
            assert!((emp - p).abs() < 0.01, "id={} emp={emp} p={p}", entry.id);
        }
    }

    #[test]
    fn rejects_rates_off_by_two_percent() {
        let catalog = Catalog::new(vec![item(1, "A", 6), item(2, "B", 5)]).unwrap();
        for (w5, expected) in [(0.48, 0.98), (0.52, 1.02)] {
            let mut b = banner(2, &[(6, 0.5), (5, w5)], &[]);
            b.rarity6 = names(&["A"]);
            b.rarity5 = names(&["B"]);
            match GachaTable::build(&catalog, &b) {
                Err(ConfigError::WeightSum { banner: 2, max }) => assert_eq!(max, expected),
                other => panic!("expected WeightSum, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_unknown_item() {
        let catalog = Catalog::new(vec![item(1, "A", 6)]).unwrap();
        let mut b = banner(3, &[(6, 1.0)], &[]);
        b.rarity6 = names(&["A", "Typo"]);
        assert!(matches!(
            GachaTable::build(&catalog, &b),
            Err(ConfigError::UnknownItem { banner: 3, ref name }) if name == "Typo"
        ));
    }

    #[test]
    fn shared_names_are_ambiguous_in_any_tier() {
        let catalog = Catalog::new(vec![item(1, "A", 6), item(2, "A", 5)]).unwrap();
        for (id, rarity) in [(4, 6), (5, 5)] {
            let mut b = banner(id, &[(rarity, 1.0)], &[]);
            if rarity == 6 {
                b.rarity6 = names(&["A"]);
            } else {
                b.rarity5 = names(&["A"]);
            }
            match GachaTable::build(&catalog, &b) {
                Err(ConfigError::AmbiguousItem { banner, ids, .. }) => {
                    assert_eq!(banner, id);
                    assert_eq!(ids, [ItemId(1), ItemId(2)]);
                }
                other => panic!("expected AmbiguousItem, got {other:?}"),
            }
        }
    }

    #[test]
    fn pool_tier_mismatch_uses_pool_weight() {
        let catalog = Catalog::new(vec![item(1, "A", 5), item(2, "B", 6)]).unwrap();
        let mut b = banner(11, &[(6, 1.0)], &[]);
        b.rarity6 = names(&["A", "B"]);
        let table = GachaTable::build(&catalog, &b).unwrap();
        assert_eq!(table.share(ItemId(1)), Some(0.5));
    }

    #[test]
    fn rejects_missing_rarity_weight() {
        let catalog = Catalog::new(vec![item(1, "A", 6), item(2, "B", 5)]).unwrap();
        let mut b = banner(6, &[(6, 1.0)], &[]);
        b.rarity6 = names(&["A"]);
        b.rarity5 = names(&["B"]);
        assert!(matches!(
            GachaTable::build(&catalog, &b),
            Err(ConfigError::MissingRarityWeight { banner: 6, rarity: 5 })
        ));
    }

    #[test]
    fn rejects_pickup_outside_pool() {
        let catalog = Catalog::new(vec![item(1, "A", 6), item(2, "B", 6)]).unwrap();
        let mut b = banner(8, &[(6, 0.9)], &[("B", 0.1)]);
        b.rarity6 = names(&["A"]);
        assert!(matches!(
            GachaTable::build(&catalog, &b),
            Err(ConfigError::PickupNotInPool { banner: 8, .. })
        ));
    }

    #[test]
    fn rejects_bad_weights_and_empty_pools() {
        let catalog = Catalog::new(vec![item(1, "A", 6)]).unwrap();
        let mut b = banner(9, &[(6, -1.0)], &[]);
        b.rarity6 = names(&["A"]);
        assert!(matches!(
            GachaTable::build(&catalog, &b),
            Err(ConfigError::InvalidWeight { banner: 9, .. })
        ));

        let b = banner(10, &[(6, 1.0)], &[]);
        assert!(matches!(
            GachaTable::build(&catalog, &b),
            Err(ConfigError::EmptyPool { banner: 10 })
        ));
    }

    #[test]
    fn tables_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GachaTable>();

        let (catalog, b) = two_tier();
        let table = GachaTable::build(&catalog, &b).unwrap();
        let total: usize = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4u64)
                .map(|seed| {
                    let table = &table;
                    s.spawn(move || {
                        let mut rng = StdRng::seed_from_u64(seed);
                        table.draw_n(&mut rng, 1_000).len()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });
        assert_eq!(total, 4_000);
    }
}
