use enrollment_analytics::analytics::{CourseGoal, EnrollmentRecord};
use enrollment_analytics::store::{GoalStore, RecordStore, StoreError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) records: Arc<InMemoryRecordStore>,
    pub(crate) goals: Arc<InMemoryGoalStore>,
}

/// Record storage keyed by unit, with the import pipeline's mirror
/// semantics: each replace drops whatever the unit held before.
#[derive(Default)]
pub(crate) struct InMemoryRecordStore {
    units: Mutex<HashMap<String, Vec<EnrollmentRecord>>>,
}

impl RecordStore for InMemoryRecordStore {
    fn replace_unit(
        &self,
        unit: &str,
        records: Vec<EnrollmentRecord>,
    ) -> Result<usize, StoreError> {
        let inserted = records.len();
        let mut guard = self.units.lock().expect("record store mutex poisoned");
        guard.insert(unit.to_string(), records);
        Ok(inserted)
    }

    fn fetch(&self, unit: &str) -> Result<Vec<EnrollmentRecord>, StoreError> {
        let guard = self.units.lock().expect("record store mutex poisoned");
        Ok(guard.get(unit).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryGoalStore {
    entries: Mutex<HashMap<(String, String), Vec<CourseGoal>>>,
}

impl GoalStore for InMemoryGoalStore {
    fn replace(&self, unit: &str, period: &str, goals: Vec<CourseGoal>) -> Result<(), StoreError> {
        let mut guard = self.entries.lock().expect("goal store mutex poisoned");
        guard.insert((unit.to_string(), period.to_string()), goals);
        Ok(())
    }

    fn fetch(&self, unit: &str, period: &str) -> Result<Vec<CourseGoal>, StoreError> {
        let guard = self.entries.lock().expect("goal store mutex poisoned");
        Ok(guard
            .get(&(unit.to_string(), period.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}
