//! Cumulative-bound sampler: first-match scan over a non-decreasing table
//! that ends at exactly 1.

use crate::error::ProbError;
use rand::Rng;

/// Cumulative bounds for discrete distribution sampling.
///
/// Entry `i` owns the interval `(bounds[i-1], bounds[i]]`. Entries whose bound
/// equals the previous one have zero width and are never selected.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeSampler {
    bounds: Vec<f64>,
}

impl CumulativeSampler {
    /// Validate cumulative bounds. O(n).
    ///
    /// The last bound must be exactly `1.0`; callers that accumulate floats
    /// are expected to round before handing the bounds over.
    pub fn new(bounds: &[f64]) -> Result<Self, ProbError> {
        if bounds.is_empty() {
            return Err(ProbError::Empty);
        }

        let mut previous = 0.0f64;
        for (index, &value) in bounds.iter().enumerate() {
            if !value.is_finite() || value.is_sign_negative() {
                return Err(ProbError::Negative { index, value });
            }
            if value < previous {
                return Err(ProbError::Decreasing {
                    index,
                    value,
                    previous,
                });
            }
            previous = value;
        }
        if previous != 1.0 {
            return Err(ProbError::NotNormalized { max: previous });
        }

        Ok(Self {
            bounds: bounds.to_vec(),
        })
    }

    /// Index of the first bound `>= r`, if any.
    pub fn position(&self, r: f64) -> Option<usize> {
        self.bounds.iter().position(|&bound| bound >= r)
    }

    /// Index of the first bound `>= r`.
    ///
    /// `r` is expected in `[0, 1)`. Anything past the last bound (including
    /// `NaN`) lands on the last entry.
    pub fn index_for(&self, r: f64) -> usize {
        match self.position(r) {
            Some(i) => i,
            None => {
                let last = self.bounds.len() - 1;
                debug_assert!(
                    self.bounds[last] == 1.0,
                    "cumulative table does not reach 1: {}",
                    self.bounds[last]
                );
                tracing::warn!(r, len = self.bounds.len(), "draw value past the end of the table");
                last
            }
        }
    }

    /// Draw a single sample in O(n).
    pub fn sample_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let r: f64 = rng.random(); // [0, 1)
        self.index_for(r)
    }

    /// Width of entry `i`'s interval.
    pub fn share(&self, i: usize) -> Option<f64> {
        let upper = *self.bounds.get(i)?;
        let lower = if i == 0 { 0.0 } else { self.bounds[i - 1] };
        Some(upper - lower)
    }

    /// Draw k samples, returning counts per index (useful for checks).
    #[cfg(test)]
    pub fn sample_counts<R: Rng + ?Sized>(&self, rng: &mut R, draws: usize) -> Vec<usize> {
        let mut counts = vec![0usize; self.bounds.len()];
        for _ in 0..draws {
            counts[self.sample_index(rng)] += 1;
        }
        counts
    }

    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}
