//! Walker's Alias Method for O(1) sampling from a discrete distribution.

use crate::error::ProbError;
use rand::Rng;

/// Alias table for discrete distribution sampling.
#[derive(Debug, Clone)]
pub struct WeightedSampler {
    prob: Vec<f64>,
    alias: Vec<usize>,
}

impl WeightedSampler {
    /// Construct an alias table from non-negative weights. O(n).
    ///
    /// Weights need not sum to one; they are normalized here.
    pub fn new(weights: &[f64]) -> Result<Self, ProbError> {
        let n = weights.len();
        if n == 0 {
            return Err(ProbError::Empty);
        }

        let mut sum = 0.0f64;
        for (i, &w) in weights.iter().enumerate() {
            if w.is_sign_negative() {
                return Err(ProbError::Negative { index: i, value: w });
            }
            sum += w;
        }
        if !sum.is_finite() || sum == 0.0 {
            return Err(ProbError::ZeroSum);
        }

        // Scale so average is 1.
        let mut scaled: Vec<f64> = weights.iter().map(|&w| w * n as f64 / sum).collect();

        let mut prob = vec![0.0f64; n];
        let mut alias = (0..n).collect::<Vec<_>>();

        let mut small = Vec::with_capacity(n);
        let mut large = Vec::with_capacity(n);

        for (i, &p) in scaled.iter().enumerate() {
            if p < 1.0 {
                small.push(i);
            } else {
                large.push(i);
            }
        }

        while let (Some(s), Some(l)) = (small.pop(), large.pop()) {
            prob[s] = scaled[s]; // in [0,1)
            alias[s] = l;

            scaled[l] = (scaled[l] + scaled[s]) - 1.0;

            if scaled[l] < 1.0 - 1e-15 {
                small.push(l);
            } else {
                large.push(l);
            }
        }

        for i in small.into_iter().chain(large) {
            prob[i] = 1.0;
            alias[i] = i;
        }

        Ok(Self { prob, alias })
    }

    /// Draw a single index in O(1).
    pub fn sample_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let n = self.prob.len();
        let i = rng.random_range(0..n);
        let u: f64 = rng.random();
        if u < self.prob[i] { i } else { self.alias[i] }
    }

    /// Draw k samples, returning counts per index (useful for checks).
    #[cfg(test)]
    pub fn sample_counts<R: Rng + ?Sized>(&self, rng: &mut R, draws: usize) -> Vec<usize> {
        let mut counts = vec![0usize; self.prob.len()];
        for _ in 0..draws {
            counts[self.sample_index(rng)] += 1;
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.prob.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prob.is_empty()
    }
}
