//! Request handling: open, inventory, purge.

use rand::Rng;

use crate::Labeled;
use crate::args::parse_open_args;
use crate::catalog::{Case, Catalog};
use crate::config::Settings;
use crate::error::ProbError;
use crate::ledger::{HistoryLedger, UserHistory};
use crate::quality::{Quality, QualityTag};
use crate::roller::{ItemRoller, RolledItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Every drop listed individually.
    Itemized,
    /// Per-quality counts plus the rare drops only.
    Summary,
}

#[derive(Debug, Clone)]
pub struct OpenReport {
    pub case_name: String,
    pub items: Vec<RolledItem>,
    pub mode: DisplayMode,
    /// The user's lifetime open count after this batch.
    pub lifetime_total: u64,
}

impl OpenReport {
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Non-zero counts per quality, known tiers first in rarity order.
    pub fn tally(&self) -> Vec<(QualityTag, usize)> {
        let mut tally: Vec<(QualityTag, usize)> = Quality::ALL
            .iter()
            .map(|q| (QualityTag::Known(*q), 0))
            .collect();
        for item in &self.items {
            match tally.iter_mut().find(|(tag, _)| *tag == item.quality) {
                Some((_, n)) => *n += 1,
                None => tally.push((item.quality.clone(), 1)),
            }
        }
        tally.retain(|(_, n)| *n > 0);
        tally
    }

    pub fn rare_items(&self) -> Vec<&RolledItem> {
        self.items.iter().filter(|i| i.quality.is_rare()).collect()
    }
}

#[derive(Debug, Clone)]
pub enum OpenOutcome {
    MissingCaseName,
    UnknownCase(String),
    Opened(OpenReport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeOutcome {
    Purged,
    NothingToPurge,
}

struct Draws {
    case_name: String,
    items: Vec<RolledItem>,
}

/// The case-opening service: one catalog, one ledger, shared by every
/// request handler.
#[derive(Debug)]
pub struct CaseOpener {
    catalog: Catalog,
    ledger: HistoryLedger,
    roller: ItemRoller,
    settings: Settings,
}

impl CaseOpener {
    pub fn new(
        catalog: Catalog,
        ledger: HistoryLedger,
        settings: Settings,
    ) -> Result<Self, ProbError> {
        Ok(Self {
            catalog,
            ledger,
            roller: ItemRoller::new()?,
            settings,
        })
    }

    /// Load the catalog and history named by `settings`.
    pub fn from_settings(settings: Settings) -> Result<Self, ProbError> {
        let catalog = Catalog::load(&settings.cases_path());
        let ledger = HistoryLedger::load(settings.history_path());
        Self::new(catalog, ledger, settings)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Handle `open <case name> [count]` for `user_id`.
    pub async fn open(&self, user_id: &str, args: &str) -> OpenOutcome {
        let draws = self.draw(args, &mut rand::rng());
        self.commit(user_id, draws).await
    }

    /// [`open`](Self::open) with a caller-supplied rng.
    pub async fn open_with<R: Rng + ?Sized>(
        &self,
        user_id: &str,
        args: &str,
        rng: &mut R,
    ) -> OpenOutcome {
        let draws = self.draw(args, rng);
        self.commit(user_id, draws).await
    }

    /// Validate and roll. Nothing is rolled for an unknown case.
    fn draw<R: Rng + ?Sized>(&self, args: &str, rng: &mut R) -> Result<Draws, OpenOutcome> {
        let request = parse_open_args(args, self.settings.max_open_count)
            .ok_or(OpenOutcome::MissingCaseName)?;
        let case = self
            .catalog
            .get(&request.case_name)
            .ok_or_else(|| OpenOutcome::UnknownCase(request.case_name.clone()))?;
        Ok(Draws {
            case_name: request.case_name,
            items: self.roll_batch(case, request.count, rng),
        })
    }

    pub fn roll_batch<R: Rng + ?Sized>(
        &self,
        case: &Case,
        count: u32,
        rng: &mut R,
    ) -> Vec<RolledItem> {
        (0..count).map(|_| self.roller.roll(case, rng)).collect()
    }

    async fn commit(&self, user_id: &str, draws: Result<Draws, OpenOutcome>) -> OpenOutcome {
        let draws = match draws {
            Ok(draws) => draws,
            Err(outcome) => return outcome,
        };
        let lifetime_total = self.ledger.record_all(user_id, &draws.items).await;
        log::info!(
            "user {user_id} opened {} x {}",
            draws.items.len(),
            draws.case_name
        );

        let mode = if draws.items.len() <= self.settings.max_display_count {
            DisplayMode::Itemized
        } else {
            DisplayMode::Summary
        };
        OpenOutcome::Opened(OpenReport {
            case_name: draws.case_name,
            items: draws.items,
            mode,
            lifetime_total,
        })
    }

    /// The user's record, or `None` if they have nothing yet.
    pub async fn inventory(&self, user_id: &str) -> Option<UserHistory> {
        self.ledger.get(user_id).await.filter(|h| h.total > 0)
    }

    pub async fn purge(&self, user_id: &str) -> PurgeOutcome {
        if self.ledger.purge(user_id).await {
            log::info!("purged open history of user {user_id}");
            PurgeOutcome::Purged
        } else {
            PurgeOutcome::NothingToPurge
        }
    }
}
