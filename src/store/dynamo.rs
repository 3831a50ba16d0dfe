use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use tracing::info;

use super::item::{Item, GUESTS, HOUSEHOLD_ID, LOOKUP, RSVP_KEY};
use super::Store;
use crate::common::errors::StoreError;
use crate::common::{Household, RsvpRecord};

#[derive(Debug, Clone)]
pub struct DynamoStore {
    client: aws_sdk_dynamodb::Client,
    households_table: String,
    rsvp_table: String,
}

impl DynamoStore {
    pub fn new(
        client: aws_sdk_dynamodb::Client,
        households_table: impl Into<String>,
        rsvp_table: impl Into<String>,
    ) -> Self {
        Self {
            client,
            households_table: households_table.into(),
            rsvp_table: rsvp_table.into(),
        }
    }
}

fn sdk_error<E>(err: E) -> StoreError
where
    aws_sdk_dynamodb::Error: From<E>,
{
    StoreError::Dynamo(Box::new(err.into()))
}

/// First household on a scan page carrying `alias`. Aliases are compared
/// normalized, so seed casing and spacing do not matter. A malformed item
/// fails the whole lookup.
fn match_household(items: &[Item], alias: &str) -> Result<Option<Household>, StoreError> {
    for item in items {
        let household = Household::try_from(item)?;
        if household.has_alias(alias) {
            return Ok(Some(household));
        }
    }

    Ok(None)
}

#[async_trait]
impl Store for DynamoStore {
    // Households are few; a full scan avoids a separate alias index and lets
    // aliases be matched normalized rather than byte for byte.
    async fn find_household(&self, alias: &str) -> Result<Option<Household>, StoreError> {
        let mut start_key: Option<Item> = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.households_table)
                .projection_expression("#id, #guests, #lookup")
                .expression_attribute_names("#id", HOUSEHOLD_ID)
                .expression_attribute_names("#guests", GUESTS)
                .expression_attribute_names("#lookup", LOOKUP)
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(sdk_error)?;

            if let Some(household) = match_household(output.items(), alias)? {
                return Ok(Some(household));
            }

            match output.last_evaluated_key {
                Some(key) => start_key = Some(key),
                None => return Ok(None),
            }
        }
    }

    async fn put_rsvp(&self, record: &RsvpRecord) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.rsvp_table)
            .set_item(Some(Item::from(record)))
            .send()
            .await
            .map_err(sdk_error)?;

        info!("Stored rsvp for {}", record.household_id);

        Ok(())
    }

    async fn get_rsvp(&self, household_id: &str) -> Result<Option<RsvpRecord>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.rsvp_table)
            .key(RSVP_KEY, AttributeValue::S(household_id.to_string()))
            .send()
            .await
            .map_err(sdk_error)?;

        output.item.as_ref().map(RsvpRecord::try_from).transpose()
    }
}
