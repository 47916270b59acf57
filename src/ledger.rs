//! Per-user open history, persisted as a single JSON document.
//!
//! The file is rewritten in full after every mutation. A failed write is
//! logged and otherwise ignored: memory stays authoritative and the change
//! is lost on the next restart.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::Labeled;
use crate::error::StoreError;
use crate::quality::{Quality, QualityTag};
use crate::roller::RolledItem;

/// A Covert or Rare Special drop, kept in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RareRecord {
    pub name: String,
    pub wear_value: f64,
    pub template_id: u16,
    /// Unix seconds.
    pub time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserHistory {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub red_count: u64,
    #[serde(default)]
    pub gold_count: u64,
    /// Counts for everything that is not red or gold, keyed by quality label.
    #[serde(default = "lower_tier_stats")]
    pub other_stats: BTreeMap<String, u64>,
    #[serde(default)]
    pub items: Vec<RareRecord>,
    #[serde(default)]
    pub last_open: Option<f64>,
}

fn lower_tier_stats() -> BTreeMap<String, u64> {
    Quality::ALL
        .iter()
        .filter(|q| !q.is_rare())
        .map(|q| (q.label().to_string(), 0))
        .collect()
}

impl Default for UserHistory {
    fn default() -> Self {
        Self {
            total: 0,
            red_count: 0,
            gold_count: 0,
            other_stats: lower_tier_stats(),
            items: Vec::new(),
            last_open: None,
        }
    }
}

impl UserHistory {
    /// Count one drop opened at `now` (unix seconds).
    pub fn apply(&mut self, item: &RolledItem, now: f64) {
        self.total += 1;
        match &item.quality {
            QualityTag::Known(Quality::Covert) => {
                self.red_count += 1;
                self.push_rare(item, now);
            }
            QualityTag::Known(Quality::RareSpecial) => {
                self.gold_count += 1;
                self.push_rare(item, now);
            }
            other => *self.other_stats.entry(other.label().to_string()).or_default() += 1,
        }
        self.last_open = Some(now);
    }

    fn push_rare(&mut self, item: &RolledItem, now: f64) {
        self.items.push(RareRecord {
            name: item.name.clone(),
            wear_value: item.wear_value,
            template_id: item.template_id,
            time: now,
        });
    }

    pub fn rare_total(&self) -> u64 {
        self.red_count + self.gold_count
    }

    /// `total` equals the sum of every per-tier counter.
    pub fn is_consistent(&self) -> bool {
        self.total == self.rare_total() + self.other_stats.values().sum::<u64>()
    }

    /// Newest rare drops first, at most `limit`.
    pub fn recent_rares(&self, limit: usize) -> Vec<&RareRecord> {
        let mut rares: Vec<&RareRecord> = self.items.iter().collect();
        rares.sort_by(|a, b| b.time.total_cmp(&a.time));
        rares.truncate(limit);
        rares
    }
}

pub(crate) fn unix_now() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// The open history of every user, guarded by one lock.
#[derive(Debug)]
pub struct HistoryLedger {
    path: PathBuf,
    users: Mutex<BTreeMap<String, UserHistory>>,
}

impl HistoryLedger {
    /// An empty ledger that will persist to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_users(path, BTreeMap::new())
    }

    fn with_users(path: impl Into<PathBuf>, users: BTreeMap<String, UserHistory>) -> Self {
        Self {
            path: path.into(),
            users: Mutex::new(users),
        }
    }

    /// Read a history file, propagating I/O and JSON errors.
    pub fn read(path: &Path) -> Result<BTreeMap<String, UserHistory>, StoreError> {
        let text = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        serde_json::from_str(&text).map_err(|e| StoreError::json(path, e))
    }

    /// Load at start-up. Missing or unreadable files start an empty ledger.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let users = match Self::read(&path) {
            Ok(users) => {
                log::info!("loaded open history for {} users", users.len());
                users
            }
            Err(StoreError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                BTreeMap::new()
            }
            Err(e) => {
                log::error!("failed to load open history: {e}");
                BTreeMap::new()
            }
        };
        Self::with_users(path, users)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record one drop and persist. Returns the user's updated record.
    pub async fn record(&self, user_id: &str, item: &RolledItem) -> UserHistory {
        let mut users = self.users.lock().await;
        let entry = users.entry(user_id.to_string()).or_default();
        entry.apply(item, unix_now());
        let snapshot = entry.clone();
        self.persist_logged(&users).await;
        snapshot
    }

    /// Record a whole batch under one lock, persisting after each drop.
    /// Returns the user's lifetime total afterwards.
    pub async fn record_all(&self, user_id: &str, items: &[RolledItem]) -> u64 {
        let mut users = self.users.lock().await;
        for item in items {
            users
                .entry(user_id.to_string())
                .or_default()
                .apply(item, unix_now());
            self.persist_logged(&users).await;
        }
        users.get(user_id).map_or(0, |h| h.total)
    }

    /// Drop a user's record entirely. `false` when there was none.
    pub async fn purge(&self, user_id: &str) -> bool {
        let mut users = self.users.lock().await;
        if users.remove(user_id).is_none() {
            return false;
        }
        self.persist_logged(&users).await;
        true
    }

    pub async fn get(&self, user_id: &str) -> Option<UserHistory> {
        self.users.lock().await.get(user_id).cloned()
    }

    pub async fn user_count(&self) -> usize {
        self.users.lock().await.len()
    }

    async fn persist_logged(&self, users: &BTreeMap<String, UserHistory>) {
        match self.persist(users).await {
            Ok(()) => log::debug!("saved open history to {}", self.path.display()),
            Err(e) => log::error!("failed to save open history: {e}"),
        }
    }

    /// Whole-file rewrite through a sibling temp file and a rename.
    async fn persist(&self, users: &BTreeMap<String, UserHistory>) -> Result<(), StoreError> {
        let json =
            serde_json::to_string_pretty(users).map_err(|e| StoreError::json(&self.path, e))?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| StoreError::io(dir, e))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| StoreError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))
    }
}
