//! DynamoDB item layout.
//!
//! `households`: `id` (S), `guests` (L of S or SS), `lookup` (L of S or SS).
//!
//! `rsvp`: `householdId` (S, key), `responses` (L of M), `email` (S),
//! `comments` (S), `submittedAt` (S, RFC 3339), `submissionId` (S).
use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::common::errors::StoreError;
use crate::common::{Attendance, GuestResponse, Household, RsvpRecord};

pub type Item = HashMap<String, AttributeValue>;

pub const HOUSEHOLD_ID: &str = "id";
pub const GUESTS: &str = "guests";
pub const LOOKUP: &str = "lookup";

pub const RSVP_KEY: &str = "householdId";
pub const RESPONSES: &str = "responses";
pub const EMAIL: &str = "email";
pub const COMMENTS: &str = "comments";
pub const SUBMITTED_AT: &str = "submittedAt";
pub const SUBMISSION_ID: &str = "submissionId";

const NAME: &str = "name";
const WEDDING: &str = "wedding";
const DINNER: &str = "dinner";
const MEAL: &str = "meal";
const ALLERGIES: &str = "allergies";

impl From<&RsvpRecord> for Item {
    fn from(record: &RsvpRecord) -> Self {
        let mut item = HashMap::from([
            (RSVP_KEY.to_string(), s(&record.household_id)),
            (
                RESPONSES.to_string(),
                AttributeValue::L(record.responses.iter().map(response_value).collect()),
            ),
            (
                SUBMITTED_AT.to_string(),
                s(&record
                    .submitted_at
                    .to_rfc3339_opts(SecondsFormat::Millis, true)),
            ),
            (
                SUBMISSION_ID.to_string(),
                s(&record.submission_id.to_string()),
            ),
        ]);
        insert_opt(&mut item, EMAIL, record.email.as_deref());
        insert_opt(&mut item, COMMENTS, record.comments.as_deref());

        item
    }
}

impl TryFrom<&Item> for Household {
    type Error = StoreError;

    fn try_from(item: &Item) -> Result<Self, Self::Error> {
        Ok(Household {
            id: get_s(item, HOUSEHOLD_ID)?,
            guests: get_strings(item, GUESTS)?,
            lookup: get_strings(item, LOOKUP)?,
        })
    }
}

impl TryFrom<&Item> for RsvpRecord {
    type Error = StoreError;

    fn try_from(item: &Item) -> Result<Self, Self::Error> {
        let responses = match item.get(RESPONSES) {
            Some(AttributeValue::L(values)) => values
                .iter()
                .map(parse_response)
                .collect::<Result<Vec<_>, _>>()?,
            _ => return Err(malformed(RESPONSES)),
        };

        let submitted_at = DateTime::parse_from_rfc3339(&get_s(item, SUBMITTED_AT)?)
            .map_err(|_| malformed(SUBMITTED_AT))?
            .with_timezone(&Utc);

        let submission_id =
            Uuid::parse_str(&get_s(item, SUBMISSION_ID)?).map_err(|_| malformed(SUBMISSION_ID))?;

        Ok(RsvpRecord {
            household_id: get_s(item, RSVP_KEY)?,
            responses,
            email: get_opt_s(item, EMAIL),
            comments: get_opt_s(item, COMMENTS),
            submitted_at,
            submission_id,
        })
    }
}

fn response_value(response: &GuestResponse) -> AttributeValue {
    let mut fields = HashMap::from([(NAME.to_string(), s(&response.name))]);
    insert_opt(&mut fields, WEDDING, response.wedding.as_ref().map(Attendance::as_str));
    insert_opt(&mut fields, DINNER, response.dinner.as_ref().map(Attendance::as_str));
    insert_opt(&mut fields, MEAL, response.meal.as_deref());
    insert_opt(&mut fields, ALLERGIES, response.allergies.as_deref());

    AttributeValue::M(fields)
}

fn parse_response(value: &AttributeValue) -> Result<GuestResponse, StoreError> {
    let AttributeValue::M(fields) = value else {
        return Err(malformed(RESPONSES));
    };

    let attendance = |key: &str| {
        get_opt_s(fields, key)
            .map(|value| value.parse::<Attendance>().map_err(StoreError::Malformed))
            .transpose()
    };

    Ok(GuestResponse {
        name: get_s(fields, NAME)?,
        wedding: attendance(WEDDING)?,
        dinner: attendance(DINNER)?,
        meal: get_opt_s(fields, MEAL),
        allergies: get_opt_s(fields, ALLERGIES),
    })
}

fn s(value: &str) -> AttributeValue {
    AttributeValue::S(value.to_string())
}

fn insert_opt(item: &mut Item, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        item.insert(key.to_string(), s(value));
    }
}

fn malformed(key: &str) -> StoreError {
    StoreError::Malformed(format!("missing or invalid attribute {key}"))
}

fn get_s(item: &Item, key: &str) -> Result<String, StoreError> {
    match item.get(key) {
        Some(AttributeValue::S(val)) => Ok(val.to_string()),
        _ => Err(malformed(key)),
    }
}

fn get_opt_s(item: &Item, key: &str) -> Option<String> {
    match item.get(key) {
        Some(AttributeValue::S(val)) => Some(val.to_string()),
        _ => None,
    }
}

fn get_strings(item: &Item, key: &str) -> Result<Vec<String>, StoreError> {
    match item.get(key) {
        Some(AttributeValue::Ss(values)) => Ok(values.clone()),
        Some(AttributeValue::L(values)) => values
            .iter()
            .map(|value| match value {
                AttributeValue::S(val) => Ok(val.to_string()),
                _ => Err(malformed(key)),
            })
            .collect(),
        _ => Err(malformed(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn household_accepts_lists_and_string_sets() {
        let item = HashMap::from([
            (HOUSEHOLD_ID.to_string(), s("H1")),
            (
                GUESTS.to_string(),
                AttributeValue::L(vec![s("Jane Doe"), s("John Doe")]),
            ),
            (
                LOOKUP.to_string(),
                AttributeValue::Ss(vec!["jane doe".into(), "john doe".into()]),
            ),
        ]);

        let household = Household::try_from(&item).unwrap();

        assert_eq!(household.id, "H1");
        assert_eq!(household.guests, vec!["Jane Doe", "John Doe"]);
        assert_eq!(household.lookup, vec!["jane doe", "john doe"]);
    }

    #[test]
    fn household_without_id_is_malformed() {
        let item = HashMap::from([(GUESTS.to_string(), AttributeValue::L(vec![]))]);

        assert!(matches!(
            Household::try_from(&item),
            Err(StoreError::Malformed(_))
        ));
    }

    #[test]
    fn rsvp_item_omits_empty_optionals() {
        let record = RsvpRecord {
            household_id: "H1".into(),
            responses: vec![GuestResponse {
                name: "Jane Doe".into(),
                wedding: Some(Attendance::Yes),
                dinner: None,
                meal: Some("fish".into()),
                allergies: None,
            }],
            email: None,
            comments: None,
            submitted_at: Utc.with_ymd_and_hms(2026, 6, 1, 12, 30, 0).unwrap(),
            submission_id: Uuid::nil(),
        };

        let item = Item::from(&record);

        assert!(!item.contains_key(EMAIL));
        assert!(!item.contains_key(COMMENTS));
        assert_eq!(item[SUBMITTED_AT], s("2026-06-01T12:30:00.000Z"));

        let AttributeValue::L(responses) = &item[RESPONSES] else {
            panic!("responses should be a list");
        };
        let AttributeValue::M(fields) = &responses[0] else {
            panic!("response should be a map");
        };
        assert_eq!(fields[WEDDING], s("yes"));
        assert!(!fields.contains_key(DINNER));

        assert_eq!(RsvpRecord::try_from(&item).unwrap(), record);
    }
}
