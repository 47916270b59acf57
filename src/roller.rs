//! Single-item draws from a case.

use rand::Rng;

use crate::catalog::{Case, CaseItem};
use crate::error::ProbError;
use crate::quality::QualityTag;
use crate::wear::{WearLevel, WearTables, wear_value_in};

pub const STATTRAK_CHANCE: f64 = 0.1;
pub const STATTRAK_PREFIX: &str = "StatTrak™ | ";
/// Gloves never come in a StatTrak variant.
pub const GLOVE_MARKER: &str = "手套";
pub const MAX_TEMPLATE_ID: u16 = 999;

#[derive(Debug, Clone, PartialEq)]
pub struct RolledItem {
    pub name: String,
    pub quality: QualityTag,
    pub wear_level: WearLevel,
    pub wear_value: f64,
    pub template_id: u16,
    pub image_url: Option<String>,
}

/// Index of the first drawable item whose running weight reaches `r`.
///
/// `None` when `r` lies past the case's total weight, which happens whenever
/// a case is missing some tiers.
pub fn pick_index(items: &[CaseItem], r: f64) -> Option<usize> {
    let mut cumulative = 0.0;
    for (i, item) in items.iter().enumerate() {
        cumulative += item.probability;
        if item.probability > 0.0 && r <= cumulative {
            return Some(i);
        }
    }
    None
}

#[derive(Debug, Clone)]
pub struct ItemRoller {
    wear: WearTables,
}

impl ItemRoller {
    pub fn new() -> Result<Self, ProbError> {
        Ok(Self {
            wear: WearTables::new()?,
        })
    }

    /// Draw one item from `case`. Pure apart from the rng.
    pub fn roll<R: Rng + ?Sized>(&self, case: &Case, rng: &mut R) -> RolledItem {
        let items = case.items();
        let r: f64 = rng.random();
        match pick_index(items, r) {
            Some(i) => self.finish(&items[i], rng),
            None => Self::fallback(&items[items.len() - 1], rng),
        }
    }

    fn finish<R: Rng + ?Sized>(&self, item: &CaseItem, rng: &mut R) -> RolledItem {
        let mut name = item.short_name.clone();
        if !name.contains(GLOVE_MARKER) && rng.random_bool(STATTRAK_CHANCE) {
            name = format!("{STATTRAK_PREFIX}{name}");
        }

        let (wear_level, wear_value) = self.wear.for_name(&name).roll(rng);

        RolledItem {
            name,
            quality: item.quality.clone(),
            wear_level,
            wear_value,
            template_id: rng.random_range(0..=MAX_TEMPLATE_ID),
            image_url: item.image_url.clone(),
        }
    }

    /// Past-the-end draw: last item, any wear, labelled Battle-Scarred.
    fn fallback<R: Rng + ?Sized>(item: &CaseItem, rng: &mut R) -> RolledItem {
        RolledItem {
            name: item.short_name.clone(),
            quality: item.quality.clone(),
            wear_level: WearLevel::BattleScarred,
            wear_value: wear_value_in(rng, 0.0, 1.0),
            template_id: rng.random_range(0..=MAX_TEMPLATE_ID),
            image_url: item.image_url.clone(),
        }
    }
}
