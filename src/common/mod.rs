use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod errors;
pub mod utils;

pub const HOUSEHOLDS_TABLE_DEFAULT: &str = "households";
pub const RSVP_TABLE_DEFAULT: &str = "rsvp";

/// Invitation unit, seeded out-of-band and never written by this service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Household {
    pub id: String,
    pub guests: Vec<String>,
    /// Name variants a guest may type in, compared normalized.
    pub lookup: Vec<String>,
}

impl Household {
    /// `key` is expected to be normalized already.
    pub fn has_alias(&self, key: &str) -> bool {
        self.lookup
            .iter()
            .any(|alias| crate::lookup::normalize_name(alias) == key)
    }
}

/// Stored and serialized as `"yes"`/`"no"`; `Display` gives `Yes`/`No`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "RawAttendance")]
pub enum Attendance {
    Yes,
    No,
}

impl Attendance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Attendance::Yes => "yes",
            Attendance::No => "no",
        }
    }
}

impl fmt::Display for Attendance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attendance::Yes => f.write_str("Yes"),
            Attendance::No => f.write_str("No"),
        }
    }
}

/// Frontends send either checkbox booleans or select values.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAttendance {
    Flag(bool),
    Text(String),
}

impl TryFrom<RawAttendance> for Attendance {
    type Error = String;

    fn try_from(raw: RawAttendance) -> Result<Self, Self::Error> {
        match raw {
            RawAttendance::Flag(true) => Ok(Attendance::Yes),
            RawAttendance::Flag(false) => Ok(Attendance::No),
            RawAttendance::Text(text) => text.parse(),
        }
    }
}

impl std::str::FromStr for Attendance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "true" | "accept" | "accepts" => Ok(Attendance::Yes),
            "no" | "false" | "decline" | "declines" => Ok(Attendance::No),
            other => Err(format!("unknown attendance value: {other:?}")),
        }
    }
}

/// One guest's answers, the single shape accepted at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestResponse {
    pub name: String,
    /// Wedding day.
    #[serde(default, alias = "attending", skip_serializing_if = "Option::is_none")]
    pub wedding: Option<Attendance>,
    /// Welcome dinner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dinner: Option<Attendance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpRecord {
    pub household_id: String,
    pub responses: Vec<GuestResponse>,
    pub email: Option<String>,
    pub comments: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub submission_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn attendance_accepts_flags_and_words() {
        let parsed: Vec<Attendance> =
            serde_json::from_str(r#"[true, false, "Yes", " no ", "Accepts", "decline"]"#).unwrap();

        assert_eq!(
            parsed,
            vec![
                Attendance::Yes,
                Attendance::No,
                Attendance::Yes,
                Attendance::No,
                Attendance::Yes,
                Attendance::No
            ]
        );
    }

    #[test]
    fn attendance_rejects_unknown_words() {
        assert!(serde_json::from_str::<Attendance>(r#""maybe""#).is_err());
    }

    #[test]
    fn guest_response_fields_are_optional() {
        let response: GuestResponse = serde_json::from_str(r#"{"name": "Jane Doe"}"#).unwrap();

        assert_eq!(response.wedding, None);
        assert_eq!(response.meal, None);
        assert_eq!(serde_json::to_string(&response).unwrap(), r#"{"name":"Jane Doe"}"#);
    }

    #[test]
    fn attending_is_read_as_wedding_attendance() {
        let response: GuestResponse =
            serde_json::from_str(r#"{"name": "Jane Doe", "attending": "yes"}"#).unwrap();

        assert_eq!(response.wedding, Some(Attendance::Yes));
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"name":"Jane Doe","wedding":"yes"}"#
        );
    }

    #[test]
    fn alias_match_ignores_seed_casing() {
        let household = Household {
            id: "H1".into(),
            guests: vec!["Jane Doe".into()],
            lookup: vec![" Jane  Doe".into(), "janie".into()],
        };

        assert!(household.has_alias("jane doe"));
        assert!(household.has_alias("janie"));
        assert!(!household.has_alias("jane"));
    }
}
