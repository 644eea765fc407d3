//! Pull simulation over one banner, with a running history.

use rand::Rng;

use crate::catalog::ItemId;
use crate::master::Banner;

/// One pulled item.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pull {
    pub id: ItemId,
    pub rarity: u8,
    pub pickup: bool,
}

/// Observed frequency next to the configured rate, both as fractions.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RateStats {
    pub observed: f64,
    pub expected: f64,
}

/// Pulls against a single banner.
///
/// The generator is owned by the simulator, so independent simulators never
/// share random state.
#[derive(Debug)]
pub struct Simulator<'a, R> {
    banner: &'a Banner,
    rng: R,
    history: Vec<Pull>,
    last: usize,
}

impl<'a, R: Rng> Simulator<'a, R> {
    pub fn new(banner: &'a Banner, rng: R) -> Self {
        Self {
            banner,
            rng,
            history: Vec::new(),
            last: 0,
        }
    }

    pub fn banner(&self) -> &'a Banner {
        self.banner
    }

    /// Pull `n` times and return this batch.
    pub fn pull(&mut self, n: usize) -> &[Pull] {
        let banner = self.banner;
        let ids = banner.table().draw_n(&mut self.rng, n);
        self.history.extend(ids.into_iter().map(|id| Pull {
            id,
            // every id in the table had its rarity recorded at build time
            rarity: banner.rarity_of(id).unwrap_or_default(),
            pickup: banner.is_pickup(id),
        }));
        self.last = n;
        self.last_pulls()
    }

    /// The most recent batch.
    pub fn last_pulls(&self) -> &[Pull] {
        &self.history[self.history.len() - self.last..]
    }

    pub fn history(&self) -> &[Pull] {
        &self.history
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.last = 0;
    }

    /// Share of pulls that were `rarity`, against the banner's rate for it.
    ///
    /// `None` before the first pull or when the banner has no such tier.
    pub fn rarity_stats(&self, rarity: u8) -> Option<RateStats> {
        let observed = self.observed(|p| p.rarity == rarity)?;
        let expected = self.banner.rarity_rate(rarity)?;
        Some(RateStats { observed, expected })
    }

    /// Share of pulls that were pickups, against the banner's pickup rate.
    pub fn pickup_stats(&self) -> Option<RateStats> {
        let observed = self.observed(|p| p.pickup)?;
        Some(RateStats {
            observed,
            expected: self.banner.pickup_rate(),
        })
    }

    fn observed(&self, pred: impl Fn(&Pull) -> bool) -> Option<f64> {
        if self.history.is_empty() {
            return None;
        }
        let hits = self.history.iter().filter(|p| pred(p)).count();
        Some(hits as f64 / self.history.len() as f64)
    }
}
