use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date, OffsetDateTime};
use tracing::{debug, info, warn};

use super::calculator::DailyCalorieResult;
use crate::catalog::ProductRecord;
use crate::numeric::parse_leading_number;
use crate::storage::{KeyValueStore, StorageError};

pub const LEDGER_KEY: &str = "catcan.today_consumed";
pub const EXTRA_WATER_KEY: &str = "catcan.extra_water";

/// Source of "today" for the day-scoped ledger.
pub trait Clock: Send + Sync {
    fn today(&self) -> Date;
}

/// Local calendar date, falling back to UTC when the offset is unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        OffsetDateTime::now_local()
            .unwrap_or_else(|_| OffsetDateTime::now_utc())
            .date()
    }
}

pub fn day_key(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("no can is staged")]
    NothingStaged,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// On-disk shape of today's list.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedLedger {
    date: String,
    data: Vec<ProductRecord>,
}

/// What is still missing today to reach the minimum daily need.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemainingNeeds {
    pub kcal: f64,
    pub water_ml: f64,
    pub kcal_met: bool,
    pub water_met: bool,
    pub min_calories: String,
    pub min_water: String,
}

/// Cans eaten today, the can currently being considered, and extra water.
pub struct Ledger {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    day: String,
    entries: Vec<ProductRecord>,
    candidate: Option<ProductRecord>,
    extra_water: String,
}

impl Ledger {
    /// Rehydrates from `store`. A list saved under another day, or one that
    /// does not decode, is ignored but left in place until the next write.
    pub fn load(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        let day = day_key(clock.today());
        let entries = match store.get(LEDGER_KEY) {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<PersistedLedger>(&raw) {
                Ok(saved) if saved.date == day => saved.data,
                Ok(saved) => {
                    info!(saved = %saved.date, today = %day, "ledger is from another day; starting empty");
                    Vec::new()
                }
                Err(e) => {
                    warn!(error = %e, "persisted ledger is malformed; starting empty");
                    Vec::new()
                }
            },
        };
        let extra_water = store.get(EXTRA_WATER_KEY).unwrap_or_default();

        debug!(day = %day, entries = entries.len(), "ledger loaded");
        Self {
            store,
            clock,
            day,
            entries,
            candidate: None,
            extra_water,
        }
    }

    /// Empties the live list when the calendar day moved on.
    fn roll_over(&mut self) {
        let today = day_key(self.clock.today());
        if today != self.day {
            info!(from = %self.day, to = %today, "day changed; ledger reset");
            self.day = today;
            self.entries.clear();
        }
    }

    pub fn day(&mut self) -> &str {
        self.roll_over();
        &self.day
    }

    pub fn entries(&mut self) -> &[ProductRecord] {
        self.roll_over();
        &self.entries
    }

    pub fn candidate(&self) -> Option<&ProductRecord> {
        self.candidate.as_ref()
    }

    pub fn stage(&mut self, record: ProductRecord) {
        self.candidate = Some(record);
    }

    pub fn unstage(&mut self) {
        self.candidate = None;
    }

    /// Moves the staged can onto today's list and persists the list.
    pub fn confirm(&mut self) -> Result<ProductRecord, LedgerError> {
        self.roll_over();
        let record = self.candidate.take().ok_or(LedgerError::NothingStaged)?;
        self.entries.push(record.clone());
        self.persist_entries()?;
        info!(brand = %record.brand, name = %record.name, total = self.entries.len(), "can recorded");
        Ok(record)
    }

    pub fn extra_water(&self) -> &str {
        &self.extra_water
    }

    pub fn set_extra_water(&mut self, raw: impl Into<String>) -> Result<(), LedgerError> {
        self.extra_water = raw.into();
        self.store.set(EXTRA_WATER_KEY, &self.extra_water)?;
        Ok(())
    }

    /// Remaining need against the minimum of `result`, counting only the
    /// staged can and extra water; the confirmed list is not summed.
    /// `None` without a result or when extra water is not a non-negative number.
    pub fn remaining(&self, result: Option<&DailyCalorieResult>) -> Option<RemainingNeeds> {
        let result = result?;
        let extra = match self.extra_water.trim() {
            "" => 0.0,
            raw => parse_leading_number(raw).filter(|v| *v >= 0.0)?,
        };
        let min_kcal = parse_leading_number(&result.min_calories)?;
        let min_water = parse_leading_number(&result.min_water)?;

        let (can_kcal, can_water) = self
            .candidate
            .as_ref()
            .map(|c| {
                (
                    parse_leading_number(&c.kcal).unwrap_or(0.0),
                    parse_leading_number(&c.moisture_content).unwrap_or(0.0),
                )
            })
            .unwrap_or((0.0, 0.0));

        let kcal = (min_kcal - can_kcal).max(0.0);
        let water_ml = (min_water - (can_water + extra)).max(0.0);
        Some(RemainingNeeds {
            kcal,
            water_ml,
            kcal_met: kcal <= 0.0,
            water_met: water_ml <= 0.0,
            min_calories: result.min_calories.clone(),
            min_water: result.min_water.clone(),
        })
    }

    fn persist_entries(&self) -> Result<(), StorageError> {
        let body = serde_json::to_string(&PersistedLedger {
            date: self.day.clone(),
            data: self.entries.clone(),
        })?;
        self.store.set(LEDGER_KEY, &body)
    }
}
