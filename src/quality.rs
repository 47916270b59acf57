//! Quality tiers and their fixed drop probabilities.

use std::fmt;

use crate::{Labeled, WeightedEnum};

/// Rarity tier of a case item, ordered from most to least common.
///
/// The probabilities are the per-tier mass of a single case opening; a case
/// splits each tier's mass evenly across the items it holds of that tier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, WeightedEnum, Labeled)]
pub enum Quality {
    #[probability(0.7992)]
    #[label("军规级")]
    MilSpec,
    #[probability(0.1598)]
    #[label("受限")]
    Restricted,
    #[probability(0.032)]
    #[label("保密")]
    Classified,
    #[probability(0.0064)]
    #[label("隐秘")]
    Covert,
    #[probability(0.0026)]
    #[label("非凡")]
    RareSpecial,
}

impl Quality {
    /// Covert ("red") and Rare Special ("gold"): the tiers kept in detail
    /// by the history ledger.
    pub fn is_rare(self) -> bool {
        matches!(self, Quality::Covert | Quality::RareSpecial)
    }

    pub fn icon(self) -> &'static str {
        match self {
            Quality::MilSpec => "🔹",
            Quality::Restricted => "🔮",
            Quality::Classified => "💠",
            Quality::Covert => "💎",
            Quality::RareSpecial => "⚜️",
        }
    }
}

/// A quality as written in catalog data.
///
/// Unknown tags are carried verbatim instead of being rejected at load time.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum QualityTag {
    Known(Quality),
    Unrecognized(String),
}

impl QualityTag {
    pub fn parse(raw: &str) -> Self {
        match Quality::from_label(raw) {
            Some(q) => QualityTag::Known(q),
            None => QualityTag::Unrecognized(raw.to_string()),
        }
    }

    /// Tier mass from the quality table; zero for unknown tags.
    pub fn probability(&self) -> f64 {
        match self {
            QualityTag::Known(q) => q.weight(),
            QualityTag::Unrecognized(_) => 0.0,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            QualityTag::Known(q) => q.label(),
            QualityTag::Unrecognized(raw) => raw,
        }
    }

    pub fn known(&self) -> Option<Quality> {
        match self {
            QualityTag::Known(q) => Some(*q),
            QualityTag::Unrecognized(_) => None,
        }
    }

    pub fn is_rare(&self) -> bool {
        self.known().is_some_and(Quality::is_rare)
    }

    pub fn icon(&self) -> &'static str {
        self.known().map_or("🔶", Quality::icon)
    }
}

impl fmt::Display for QualityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for q in Quality::ALL {
            assert_eq!(Quality::from_label(q.label()), Some(*q));
        }
        assert_eq!(Quality::from_label("工业级"), None);
        assert_eq!(Quality::Covert.to_string(), "隐秘");
    }

    #[test]
    fn tier_probabilities() {
        assert_eq!(Quality::MilSpec.weight(), 0.7992);
        assert_eq!(Quality::Restricted.weight(), 0.1598);
        assert_eq!(Quality::RareSpecial.weight(), 0.0026);
        let total: f64 = Quality::ENTRIES.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9, "total={total}");
    }

    #[test]
    fn unknown_tags_have_no_mass() {
        let tag = QualityTag::parse("工业级");
        assert_eq!(tag, QualityTag::Unrecognized("工业级".into()));
        assert_eq!(tag.probability(), 0.0);
        assert!(!tag.is_rare());
        assert_eq!(tag.icon(), "🔶");
        assert_eq!(tag.label(), "工业级");
    }

    #[test]
    fn only_top_two_tiers_are_rare() {
        let rare: Vec<_> = Quality::ALL.iter().filter(|q| q.is_rare()).collect();
        assert_eq!(rare, vec![&Quality::Covert, &Quality::RareSpecial]);
    }
}
