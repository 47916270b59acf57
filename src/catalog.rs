//! Case catalog: the static item pools and their derived drop weights.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

use crate::error::StoreError;
use crate::quality::QualityTag;

/// One item record as it appears in the catalog file.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub short_name: String,
    /// Quality label, e.g. "军规级".
    pub rln: String,
    #[serde(default)]
    pub img: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseItem {
    pub short_name: String,
    pub quality: QualityTag,
    /// Tier mass divided by the number of items sharing the tier in this case.
    pub probability: f64,
    pub image_url: Option<String>,
}

/// A named item pool. Never empty.
#[derive(Debug, Clone)]
pub struct Case {
    name: String,
    items: Vec<CaseItem>,
}

impl Case {
    /// Returns `None` when there are no entries to build from.
    pub fn new(name: impl Into<String>, entries: Vec<CatalogEntry>) -> Option<Self> {
        if entries.is_empty() {
            return None;
        }

        let tags: Vec<QualityTag> = entries.iter().map(|e| QualityTag::parse(&e.rln)).collect();
        let mut per_tier: HashMap<&QualityTag, usize> = HashMap::new();
        for tag in &tags {
            *per_tier.entry(tag).or_default() += 1;
        }
        let shares: Vec<f64> = tags
            .iter()
            .map(|tag| tag.probability() / per_tier[tag] as f64)
            .collect();

        let items = entries
            .into_iter()
            .zip(tags)
            .zip(shares)
            .map(|((entry, quality), probability)| CaseItem {
                short_name: entry.short_name,
                quality,
                probability,
                image_url: entry.img.filter(|url| !url.is_empty()),
            })
            .collect();

        Some(Self {
            name: name.into(),
            items,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> &[CaseItem] {
        &self.items
    }

    /// Sum of all item weights. Below 1.0 when a case lacks some tiers.
    pub fn total_probability(&self) -> f64 {
        self.items.iter().map(|i| i.probability).sum()
    }
}

/// Every case available for opening, in file order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    cases: Vec<Case>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn from_cases(cases: impl IntoIterator<Item = Case>) -> Self {
        let mut catalog = Self::default();
        for case in cases {
            catalog.insert(case);
        }
        catalog
    }

    fn insert(&mut self, case: Case) {
        match self.index.get(case.name()).copied() {
            Some(slot) => self.cases[slot] = case,
            None => {
                self.index.insert(case.name.clone(), self.cases.len());
                self.cases.push(case);
            }
        }
    }

    /// Parse catalog JSON. Cases whose item list does not parse, or is
    /// empty, are skipped with a warning.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut catalog = Self::default();
        for (name, value) in raw {
            let entries: Vec<CatalogEntry> = match serde_json::from_value(value) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!("skipping case {name}: {e}");
                    continue;
                }
            };
            match Case::new(name.clone(), entries) {
                Some(case) => catalog.insert(case),
                None => log::warn!("skipping case {name}: no items"),
            }
        }
        Ok(catalog)
    }

    /// Read a catalog file, propagating I/O and JSON errors.
    pub fn read(path: &Path) -> Result<Self, StoreError> {
        let text = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        Self::from_json_str(&text).map_err(|e| StoreError::json(path, e))
    }

    /// Load for service start-up: any failure degrades to an empty catalog.
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(catalog) => {
                log::info!("loaded {} cases from {}", catalog.len(), path.display());
                catalog
            }
            Err(StoreError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                log::warn!("case catalog {} not found", path.display());
                Self::default()
            }
            Err(e) => {
                log::error!("failed to load case catalog: {e}");
                Self::default()
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Case> {
        self.index.get(name).map(|&i| &self.cases[i])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.cases.iter().map(Case::name)
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::Quality;
    use crate::WeightedEnum;

    const SAMPLE: &str = r#"{
        "命运武器箱": [
            {"short_name": "MP9 | 炽热", "rln": "军规级", "img": "https://img/mp9.png"},
            {"short_name": "格洛克 | 连锁", "rln": "军规级", "img": ""},
            {"short_name": "P250 | 潜入者", "rln": "军规级"},
            {"short_name": "AK-47 | 传承", "rln": "受限"},
            {"short_name": "M4A1 | 印花集", "rln": "受限"},
            {"short_name": "USP | 黑色魅影", "rln": "保密"},
            {"short_name": "AWP | 巨龙传说", "rln": "隐秘"},
            {"short_name": "运动手套 | 弹弓", "rln": "非凡"},
            {"short_name": "蝴蝶刀 | 多普勒", "rln": "非凡"}
        ],
        "空箱": [],
        "旧箱": [
            {"short_name": "SG 553 | 波浪", "rln": "军规级"},
            {"short_name": "SSG 08 | 未知", "rln": "工业级"}
        ],
        "坏箱": [{"rln": "军规级"}]
    }"#;

    fn tier_mass(case: &Case) -> f64 {
        let mut seen: Vec<Quality> = Vec::new();
        for item in case.items() {
            if let Some(q) = item.quality.known() {
                if !seen.contains(&q) {
                    seen.push(q);
                }
            }
        }
        seen.iter().map(|q| q.weight()).sum()
    }

    #[test]
    fn probability_is_conserved_per_case() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        for case in catalog.cases() {
            let total = case.total_probability();
            let want = tier_mass(case);
            assert!(
                (total - want).abs() < 1e-12,
                "{}: total={total} want={want}",
                case.name()
            );
        }
    }

    #[test]
    fn tier_mass_is_split_evenly() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        let case = catalog.get("命运武器箱").unwrap();
        let items = case.items();
        assert!((items[0].probability - 0.7992 / 3.0).abs() < 1e-15);
        assert!((items[3].probability - 0.1598 / 2.0).abs() < 1e-15);
        assert!((items[5].probability - 0.032).abs() < 1e-15);
        assert!((items[8].probability - 0.0026 / 2.0).abs() < 1e-15);
        assert_eq!(items[0].image_url.as_deref(), Some("https://img/mp9.png"));
        assert_eq!(items[1].image_url, None);
        assert_eq!(items[2].image_url, None);
    }

    #[test]
    fn unknown_quality_is_undrawable_not_fatal() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        let case = catalog.get("旧箱").unwrap();
        let unknown = &case.items()[1];
        assert_eq!(unknown.quality.label(), "工业级");
        assert_eq!(unknown.probability, 0.0);
        assert!((case.total_probability() - Quality::MilSpec.weight()).abs() < 1e-15);
    }

    #[test]
    fn empty_and_malformed_cases_are_skipped() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        assert!(catalog.get("空箱").is_none());
        assert!(catalog.get("坏箱").is_none());
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn reload_is_idempotent() {
        let a = Catalog::from_json_str(SAMPLE).unwrap();
        let b = Catalog::from_json_str(SAMPLE).unwrap();
        for (x, y) in a.cases().iter().zip(b.cases()) {
            assert_eq!(x.items(), y.items());
        }
    }

    #[test]
    fn missing_file_gives_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::load(&dir.path().join("cases.json"));
        assert!(catalog.is_empty());
        assert!(matches!(
            Catalog::read(&dir.path().join("cases.json")),
            Err(StoreError::Io { .. })
        ));
    }

    #[test]
    fn malformed_file_gives_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.json");
        fs::write(&path, "[not json").unwrap();
        assert!(Catalog::load(&path).is_empty());
        assert!(matches!(Catalog::read(&path), Err(StoreError::Json { .. })));
    }

    #[test]
    fn names_follow_file_order() {
        let json = r#"{"b箱": [{"short_name": "x", "rln": "受限"}],
                       "a箱": [{"short_name": "y", "rln": "受限"}]}"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["b箱", "a箱"]);
    }
}
