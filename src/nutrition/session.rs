use std::sync::Arc;

use tracing::{debug, info};

use super::calculator::{daily_needs, DailyCalorieResult, LifeStage};
use super::ledger::{Clock, Ledger, RemainingNeeds};
use crate::catalog::ProductRecord;
use crate::storage::{KeyValueStore, StorageError};

pub const WEIGHT_KEY: &str = "catcan.weight";

/// Calculator state for the single local user.
pub struct CalculatorSession {
    store: Arc<dyn KeyValueStore>,
    weight: String,
    stage: LifeStage,
    remaining_open: bool,
    pub ledger: Ledger,
}

impl CalculatorSession {
    /// Restores the last entered weight and today's ledger.
    pub fn load(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        let weight = store.get(WEIGHT_KEY).unwrap_or_default();
        debug!(weight = %weight, "calculator session restored");
        Self {
            ledger: Ledger::load(store.clone(), clock),
            store,
            weight,
            stage: LifeStage::default(),
            remaining_open: false,
        }
    }

    pub fn weight(&self) -> &str {
        &self.weight
    }

    /// Stores the raw input, valid or not; `result()` decides what it means.
    pub fn set_weight(&mut self, raw: impl Into<String>) -> Result<(), StorageError> {
        self.weight = raw.into();
        self.store.set(WEIGHT_KEY, &self.weight)
    }

    pub fn stage(&self) -> LifeStage {
        self.stage
    }

    pub fn set_stage(&mut self, stage: LifeStage) {
        info!(stage = ?stage, "life stage selected");
        self.stage = stage;
    }

    pub fn result(&self) -> Option<DailyCalorieResult> {
        daily_needs(&self.weight, self.stage.range())
    }

    pub fn remaining(&self) -> Option<RemainingNeeds> {
        self.ledger.remaining(self.result().as_ref())
    }

    pub fn remaining_open(&self) -> bool {
        self.remaining_open
    }

    pub fn set_remaining_open(&mut self, open: bool) {
        self.remaining_open = open;
    }
}

/// How a can is named in the candidate picker.
pub fn can_label(record: &ProductRecord) -> String {
    format!("{} - {} ({})", record.brand, record.name, record.flavor)
}

/// Candidate picker hits: case-sensitive substring on brand, name or flavor,
/// in catalog order, at most `limit`.
pub fn suggestions<'a>(
    records: &'a [ProductRecord],
    query: &str,
    limit: usize,
) -> Vec<(usize, &'a ProductRecord)> {
    let q = query.trim();
    if q.is_empty() {
        return Vec::new();
    }
    records
        .iter()
        .enumerate()
        .filter(|(_, c)| c.brand.contains(q) || c.name.contains(q) || c.flavor.contains(q))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::catalog::records::fixtures::record;
    use crate::nutrition::ledger::test_clock::FixedClock;
    use crate::storage::MemoryStore;

    fn session() -> (Arc<MemoryStore>, CalculatorSession) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(date!(2026 - 10 - 19)));
        let session = CalculatorSession::load(store.clone(), clock);
        (store, session)
    }

    #[test]
    fn starts_blank_with_neutered_adult() {
        let (_, session) = session();
        assert_eq!(session.weight(), "");
        assert_eq!(session.stage(), LifeStage::AdultNeutered);
        assert!(session.result().is_none());
        assert!(session.remaining().is_none());
        assert!(!session.remaining_open());
    }

    #[test]
    fn weight_is_remembered_across_loads() {
        let (store, mut session) = session();
        session.set_weight("4").unwrap();
        assert_eq!(session.result().unwrap().rer, "198.0");

        let clock = Arc::new(FixedClock::new(date!(2026 - 10 - 19)));
        let restored = CalculatorSession::load(store, clock);
        assert_eq!(restored.weight(), "4");
    }

    #[test]
    fn stage_changes_the_range() {
        let (_, mut session) = session();
        session.set_weight("4").unwrap();
        session.set_stage(LifeStage::Lactating);
        assert_eq!(session.result().unwrap().min_calories, "396.0");
    }

    #[test]
    fn remaining_follows_the_staged_can() {
        let (_, mut session) = session();
        session.set_weight("4").unwrap();
        let mut can = record("Acme", "Classic", "Japan", "80");
        can.kcal = "37.6".into();
        session.ledger.stage(can);
        let left = session.remaining().unwrap();
        assert!((left.kcal - 200.0).abs() < 1e-9);
    }

    #[test]
    fn suggestions_are_case_sensitive_and_capped() {
        let records = vec![
            record("Acme", "Classic", "Japan", "80"),
            record("acme", "Lite", "Japan", "80"),
            record("Bolt", "Acme-style", "Japan", "80"),
        ];
        let hits = suggestions(&records, " Acme ", 20);
        let idx: Vec<usize> = hits.iter().map(|(i, _)| *i).collect();
        assert_eq!(idx, vec![0, 2]);
        assert_eq!(suggestions(&records, "Acme", 1).len(), 1);
        assert!(suggestions(&records, "  ", 20).is_empty());
    }

    #[test]
    fn label_names_brand_name_and_flavor() {
        let r = record("Acme", "Classic", "Japan", "80");
        assert_eq!(can_label(&r), "Acme - Classic (Tuna)");
    }
}
