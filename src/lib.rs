//! # casedrops
//!
//! A weapon-case opening simulator for chat bots.
//!
//! A [`Catalog`] of cases is loaded from JSON. Each case item carries a
//! quality tier whose fixed drop mass is split evenly across the case's items
//! of that tier. Opening a case walks those probabilities cumulatively, then
//! rolls a wear level and value (Doppler finishes use their own table), a
//! StatTrak flag and a template id. Rare drops are written to a per-user
//! [`HistoryLedger`] that is persisted after every opening.
//!
//! The pieces:
//!
//! 1. **Sampling**: [`WeightedSampler`] (Walker's alias method) and
//!    [`DropTable`], used for wear bands and tier draws.
//! 2. **Compile-time tables**: the [`WeightedEnum`] and [`Labeled`] derives
//!    from the companion `casedrops_macros` crate, which attach weights and
//!    display labels to enum variants.
//! 3. **The service**: [`CaseOpener`] parses requests, rolls, records and
//!    reports; [`render`] turns the results into chat text.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use casedrops::{CaseOpener, Settings, render};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let opener = CaseOpener::from_settings(Settings::load()?)?;
//! let outcome = opener.open("10001", "命运武器箱 5").await;
//! println!("{}", render::open_message(&outcome, "玩家"));
//! # Ok(()) }
//! ```
//!
//! ## Randomness
//! Every roll takes a caller-supplied `rand::Rng`, so seeded generators give
//! reproducible batches. [`CaseOpener::open`] uses `rand::rng()`.

extern crate self as casedrops;

pub mod args;
pub mod catalog;
pub mod config;
mod error;
pub mod ledger;
pub mod opener;
pub mod quality;
pub mod render;
pub mod roller;
mod table;
mod walker;
pub mod wear;

pub use args::{OpenRequest, parse_open_args};
pub use catalog::{Case, CaseItem, Catalog, CatalogEntry};
pub use config::Settings;
pub use error::{ConfigError, ProbError, StoreError};
pub use ledger::{HistoryLedger, RareRecord, UserHistory};
pub use opener::{CaseOpener, DisplayMode, OpenOutcome, OpenReport, PurgeOutcome};
pub use quality::{Quality, QualityTag};
pub use roller::{ItemRoller, RolledItem};
pub use table::DropTable;
pub use walker::WeightedSampler;
pub use wear::{WearLevel, WearTable, WearTables};

/// Derive macros imported from `casedrops_macros`.
pub use casedrops_macros::{Labeled, WeightedEnum};

/// Trait implemented by the `WeightedEnum` derive macro.
///
/// Each variant and its weight is exposed via [`WeightedEnum::ENTRIES`].
pub trait WeightedEnum: Sized + 'static {
    /// All `(variant, weight)` pairs for the enum.
    const ENTRIES: &'static [(Self, f64)];

    /// The weight attached to this variant.
    fn weight(&self) -> f64
    where
        Self: PartialEq,
    {
        Self::ENTRIES
            .iter()
            .find(|(v, _)| v == self)
            .map_or(0.0, |(_, w)| *w)
    }

    /// Build a [`DropTable`] over the variants.
    ///
    /// # Errors
    /// See [`WeightedSampler::new`]: zero length, negative weight, non-finite
    /// or zero total weight will error.
    fn droptable() -> Result<DropTable<Self>, ProbError>
    where
        Self: Copy,
    {
        DropTable::from_pairs(Self::ENTRIES.iter().copied())
    }
}

/// Trait implemented by the `Labeled` derive macro: a fixed display label
/// per variant.
pub trait Labeled: Sized + Copy + 'static {
    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    fn label(&self) -> &'static str;

    /// Reverse lookup by exact label.
    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.label() == label)
    }
}
