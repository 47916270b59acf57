use rand::Rng;

use crate::error::ProbError;
use crate::walker::WeightedSampler;

/// A generic "drop table": associates items with weights and samples them
/// using an internal [`WeightedSampler`].
///
/// Build it from any iterator of `(item, weight)` where `weight >= 0`.
#[derive(Debug, Clone)]
pub struct DropTable<T> {
    alias: WeightedSampler,
    items: Vec<T>,
}

impl<T> DropTable<T> {
    /// Build from any `(item, weight)` iterator.
    ///
    /// # Errors
    /// * [`ProbError::Empty`] if there are no items.
    /// * [`ProbError::Negative`] if any weight is negative.
    /// * [`ProbError::ZeroSum`] if the sum of weights is zero or not finite.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ProbError>
    where
        I: IntoIterator<Item = (T, f64)>,
    {
        let (items, weights): (Vec<T>, Vec<f64>) = pairs.into_iter().unzip();
        let alias = WeightedSampler::new(&weights)?;
        Ok(Self { alias, items })
    }

    /// Sample an item by reference.
    pub fn sample<'a, R: Rng + ?Sized>(&'a self, rng: &mut R) -> &'a T {
        &self.items[self.alias.sample_index(rng)]
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.alias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alias.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_pairs() {
        let dt = DropTable::from_pairs([("a", 1.0), ("b", 3.0)]).unwrap();
        let mut rng = rand::rng();
        let got = dt.sample(&mut rng);
        assert!(*got == "a" || *got == "b");
        assert_eq!(dt.len(), 2);
    }

    #[test]
    fn empty_pairs_rejected() {
        let pairs: [(&str, f64); 0] = [];
        assert!(matches!(DropTable::from_pairs(pairs), Err(ProbError::Empty)));
    }
}
