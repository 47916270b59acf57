//! Wear levels and the float ranges they cover.

use rand::Rng;

use crate::Labeled;
use crate::error::ProbError;
use crate::table::DropTable;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Labeled)]
pub enum WearLevel {
    #[label("崭新出厂")]
    FactoryNew,
    #[label("略有磨损")]
    MinimalWear,
    #[label("久经沙场")]
    FieldTested,
    #[label("破损不堪")]
    WellWorn,
    #[label("战痕累累")]
    BattleScarred,
}

/// One row of a wear table: level, selection weight and `[min, max)` range.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WearBand {
    pub level: WearLevel,
    pub weight: f64,
    pub min: f64,
    pub max: f64,
}

const fn band(level: WearLevel, weight: f64, min: f64, max: f64) -> WearBand {
    WearBand {
        level,
        weight,
        min,
        max,
    }
}

/// The ranges overlap (Well-Worn sits inside Field-Tested); they are kept
/// as the game data states them.
pub const STANDARD_WEAR: [WearBand; 5] = [
    band(WearLevel::FactoryNew, 0.03, 0.00, 0.07),
    band(WearLevel::MinimalWear, 0.24, 0.07, 0.15),
    band(WearLevel::FieldTested, 0.33, 0.15, 0.45),
    band(WearLevel::WellWorn, 0.24, 0.30, 0.45),
    band(WearLevel::BattleScarred, 0.16, 0.45, 1.00),
];

/// Doppler finishes only come in the two best grades.
pub const DOPPLER_WEAR: [WearBand; 2] = [
    band(WearLevel::FactoryNew, 0.03, 0.00, 0.87),
    band(WearLevel::MinimalWear, 0.24, 0.07, 0.12),
];

/// Name fragment marking a Doppler finish.
pub const DOPPLER_MARKER: &str = "多普勒";

const WEAR_SCALE: f64 = 1e8;

/// Round to 8 decimal places.
pub fn round_wear(value: f64) -> f64 {
    (value * WEAR_SCALE).round() / WEAR_SCALE
}

/// Uniform value in `[min, max)` rounded to 8 decimals.
///
/// Rounding can land on `max`; such values are pulled back one step.
pub fn wear_value_in<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    let value = round_wear(rng.random_range(min..max));
    if value >= max {
        round_wear(max - 1.0 / WEAR_SCALE).max(min)
    } else {
        value
    }
}

/// Weighted level selection over a wear table.
#[derive(Debug, Clone)]
pub struct WearTable {
    bands: DropTable<WearBand>,
}

impl WearTable {
    pub fn new(bands: &[WearBand]) -> Result<Self, ProbError> {
        Ok(Self {
            bands: DropTable::from_pairs(bands.iter().map(|b| (*b, b.weight)))?,
        })
    }

    pub fn standard() -> Result<Self, ProbError> {
        Self::new(&STANDARD_WEAR)
    }

    pub fn doppler() -> Result<Self, ProbError> {
        Self::new(&DOPPLER_WEAR)
    }

    /// Pick a level, then a value inside its range.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> (WearLevel, f64) {
        let band = self.bands.sample(rng);
        (band.level, wear_value_in(rng, band.min, band.max))
    }

    pub fn bands(&self) -> &[WearBand] {
        self.bands.items()
    }
}

/// The pair of wear tables an item roller chooses between.
#[derive(Debug, Clone)]
pub struct WearTables {
    standard: WearTable,
    doppler: WearTable,
}

impl WearTables {
    pub fn new() -> Result<Self, ProbError> {
        Ok(Self {
            standard: WearTable::standard()?,
            doppler: WearTable::doppler()?,
        })
    }

    pub fn for_name(&self, name: &str) -> &WearTable {
        if name.contains(DOPPLER_MARKER) {
            &self.doppler
        } else {
            &self.standard
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn level_labels() {
        assert_eq!(WearLevel::BattleScarred.label(), "战痕累累");
        assert_eq!(WearLevel::from_label("略有磨损"), Some(WearLevel::MinimalWear));
        assert_eq!(WearLevel::ALL.len(), 5);
    }

    #[test]
    fn rounding_keeps_eight_decimals() {
        assert_eq!(round_wear(0.123456789), 0.12345679);
        assert_eq!(round_wear(0.5), 0.5);
    }

    #[test]
    fn values_stay_inside_every_band() {
        let mut rng = StdRng::seed_from_u64(11);
        for band in STANDARD_WEAR.iter().chain(DOPPLER_WEAR.iter()) {
            for _ in 0..100_000 {
                let v = wear_value_in(&mut rng, band.min, band.max);
                assert!(
                    v >= band.min && v < band.max,
                    "{:?}: {v} outside [{}, {})",
                    band.level,
                    band.min,
                    band.max
                );
            }
        }
    }

    #[test]
    fn near_max_values_are_pulled_back() {
        // A range narrower than the rounding step still yields values below max.
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let v = wear_value_in(&mut rng, 0.069999995, 0.07);
            assert!(v < 0.07, "{v}");
        }
    }

    #[test]
    fn level_frequencies_follow_weights() {
        let table = WearTable::standard().unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let draws = 100_000;
        let mut counts = [0usize; 5];
        for _ in 0..draws {
            let (level, value) = table.roll(&mut rng);
            let idx = WearLevel::ALL.iter().position(|l| *l == level).unwrap();
            let band = STANDARD_WEAR[idx];
            assert!(value >= band.min && value < band.max);
            counts[idx] += 1;
        }
        for (band, count) in STANDARD_WEAR.iter().zip(counts) {
            let emp = count as f64 / draws as f64;
            assert!(
                (emp - band.weight).abs() < 0.01,
                "{:?}: emp={emp} want={}",
                band.level,
                band.weight
            );
        }
    }

    #[test]
    fn doppler_tables_only_two_grades() {
        let tables = WearTables::new().unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let doppler = tables.for_name("蝴蝶刀（★） | 多普勒");
        assert_eq!(doppler.bands().len(), 2);
        let mut minimal = 0usize;
        for _ in 0..20_000 {
            let (level, _) = doppler.roll(&mut rng);
            assert!(matches!(
                level,
                WearLevel::FactoryNew | WearLevel::MinimalWear
            ));
            if level == WearLevel::MinimalWear {
                minimal += 1;
            }
        }
        // 0.24 / 0.27 after normalization
        let emp = minimal as f64 / 20_000.0;
        assert!((emp - 0.24 / 0.27).abs() < 0.02, "emp={emp}");
        assert_eq!(tables.for_name("AK-47 | 红线").bands().len(), 5);
    }
}
