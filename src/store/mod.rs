use async_trait::async_trait;

use crate::common::errors::StoreError;
use crate::common::{Household, RsvpRecord};

pub mod dynamo;
pub mod item;
pub mod memory;

pub use dynamo::DynamoStore;
pub use memory::MemoryStore;

/// Document store holding the `households` and `rsvp` collections.
#[async_trait]
pub trait Store: Send + Sync {
    /// `alias` must already be a normalized lookup key.
    async fn find_household(&self, alias: &str) -> Result<Option<Household>, StoreError>;

    /// Creates or fully replaces the record for `record.household_id`.
    async fn put_rsvp(&self, record: &RsvpRecord) -> Result<(), StoreError>;

    async fn get_rsvp(&self, household_id: &str) -> Result<Option<RsvpRecord>, StoreError>;
}
