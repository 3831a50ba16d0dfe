use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use super::Store;
use crate::common::errors::StoreError;
use crate::common::{Household, RsvpRecord};

/// In-process store with the same semantics as [`super::DynamoStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    households: RwLock<Vec<Household>>,
    rsvps: RwLock<HashMap<String, RsvpRecord>>,
    fail_writes: AtomicBool,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_households(households: Vec<Household>) -> Self {
        Self {
            households: RwLock::new(households),
            ..Self::default()
        }
    }

    /// Makes every subsequent `put_rsvp` fail with [`StoreError::Unavailable`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of store operations served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn rsvp_count(&self) -> usize {
        self.rsvps.read().map(|rsvps| rsvps.len()).unwrap_or_default()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_household(&self, alias: &str) -> Result<Option<Household>, StoreError> {
        self.record_call();
        let households = self.households.read().map_err(|_| StoreError::Unavailable)?;

        Ok(households
            .iter()
            .find(|household| household.has_alias(alias))
            .cloned())
    }

    async fn put_rsvp(&self, record: &RsvpRecord) -> Result<(), StoreError> {
        self.record_call();
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }

        self.rsvps
            .write()
            .map_err(|_| StoreError::Unavailable)?
            .insert(record.household_id.clone(), record.clone());

        Ok(())
    }

    async fn get_rsvp(&self, household_id: &str) -> Result<Option<RsvpRecord>, StoreError> {
        self.record_call();
        let rsvps = self.rsvps.read().map_err(|_| StoreError::Unavailable)?;

        Ok(rsvps.get(household_id).cloned())
    }
}
