//! Guest name lookup.
//!
//! A typed name is reduced to a lookup key (lowercase, trimmed, single
//! spaces) and matched exactly against the aliases seeded on each household.
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::common::errors::Error;
use crate::store::Store;

const MISSING_NAME_ERROR: &str = "Missing name";
const FULL_NAME_ERROR: &str = "Please enter your first and last name";

/// How much of a name a guest must type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameRule {
    #[default]
    Any,
    /// At least a first and a last name.
    FullName,
}

#[derive(Debug, Deserialize)]
pub struct FindRequest {
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdMatch {
    pub household_id: String,
    pub guests: Vec<String>,
}

pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn lookup_key(name: Option<&str>, rule: NameRule) -> Result<String, Error> {
    let key = name.map(normalize_name).unwrap_or_default();
    if key.is_empty() {
        return Err(Error::validation(MISSING_NAME_ERROR));
    }

    if rule == NameRule::FullName && key.split(' ').count() < 2 {
        return Err(Error::validation(FULL_NAME_ERROR));
    }

    Ok(key)
}

#[tracing::instrument(skip(store, name))]
pub async fn find_household(
    store: &dyn Store,
    rule: NameRule,
    name: Option<&str>,
) -> Result<HouseholdMatch, Error> {
    let key = lookup_key(name, rule)?;

    let household = store.find_household(&key).await?.ok_or(Error::NotFound)?;
    info!("Matched household {}", household.id);

    Ok(HouseholdMatch {
        household_id: household.id,
        guests: household.guests,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Household;
    use crate::store::memory::MemoryStore;
    use pretty_assertions::assert_eq;

    fn store() -> MemoryStore {
        MemoryStore::with_households(vec![
            Household {
                id: "H1".into(),
                guests: vec!["Jane Doe".into(), "John Doe".into()],
                lookup: vec!["jane doe".into(), "john doe".into(), "johnny doe".into()],
            },
            Household {
                id: "H2".into(),
                guests: vec!["Mary Ann Smith".into()],
                lookup: vec!["mary ann smith".into(), "mary smith".into()],
            },
        ])
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_name("  Jane   DOE \t"), "jane doe");
        assert_eq!(normalize_name("Мария Иванова"), "мария иванова");
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        for name in ["Jane Doe", "  MARY  Ann\tSmith ", "ÉLODIE", "o'brien  ", ""] {
            let once = normalize_name(name);
            assert_eq!(normalize_name(&once), once);
        }
    }

    #[test]
    fn missing_or_blank_names_are_rejected() {
        for name in [None, Some(""), Some("   ")] {
            let error = lookup_key(name, NameRule::Any).unwrap_err();
            assert_eq!(error.to_string(), MISSING_NAME_ERROR);
        }
    }

    #[test]
    fn full_name_rule_requires_two_tokens() {
        assert_eq!(lookup_key(Some("Jane"), NameRule::Any).unwrap(), "jane");

        let error = lookup_key(Some(" Jane "), NameRule::FullName).unwrap_err();
        assert_eq!(error.to_string(), FULL_NAME_ERROR);

        assert_eq!(
            lookup_key(Some("Mary  Ann Smith"), NameRule::FullName).unwrap(),
            "mary ann smith"
        );
    }

    #[tokio::test]
    async fn finds_household_by_any_alias() {
        let store = store();

        let found = find_household(&store, NameRule::Any, Some("Johnny DOE"))
            .await
            .unwrap();

        assert_eq!(
            found,
            HouseholdMatch {
                household_id: "H1".into(),
                guests: vec!["Jane Doe".into(), "John Doe".into()],
            }
        );
    }

    #[tokio::test]
    async fn unknown_names_are_not_found() {
        let store = store();

        let error = find_household(&store, NameRule::Any, Some("Mary"))
            .await
            .unwrap_err();

        assert!(matches!(error, Error::NotFound));
    }

    #[tokio::test]
    async fn invalid_names_never_reach_the_store() {
        let store = store();

        let error = find_household(&store, NameRule::FullName, Some("Jane"))
            .await
            .unwrap_err();

        assert!(matches!(error, Error::Validation(_)));
        assert_eq!(store.calls(), 0);
    }
}
