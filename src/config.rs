use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

use crate::common::errors::Error;
use crate::common::{HOUSEHOLDS_TABLE_DEFAULT, RSVP_TABLE_DEFAULT};
use crate::lookup::NameRule;

const MAIL_FROM_DEFAULT: &str = "wedding@example.com";
const PORT_DEFAULT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct Config {
    pub households_table: String,
    pub rsvp_table: String,
    /// DynamoDB Local or another compatible endpoint.
    pub dynamodb_endpoint: Option<String>,
    pub resend_api_key: Option<String>,
    pub mail_from: String,
    pub admin_email: Option<String>,
    pub require_full_name: bool,
    pub require_email: bool,
    pub port: u16,
}

/// Request-time rules shared by both adapters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub name_rule: NameRule,
    pub require_email: bool,
    pub mail_from: String,
    pub admin_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let resend_api_key = var("RESEND_API_KEY");
        if resend_api_key.is_none() {
            warn!("RESEND_API_KEY not set, emails will not be sent");
        }

        Ok(Self {
            households_table: with_default(
                var("HOUSEHOLDS_TABLE"),
                "HOUSEHOLDS_TABLE",
                HOUSEHOLDS_TABLE_DEFAULT,
            ),
            rsvp_table: with_default(var("RSVP_TABLE"), "RSVP_TABLE", RSVP_TABLE_DEFAULT),
            dynamodb_endpoint: var("DYNAMODB_ENDPOINT"),
            resend_api_key,
            mail_from: with_default(var("MAIL_FROM"), "MAIL_FROM", MAIL_FROM_DEFAULT),
            admin_email: var("ADMIN_EMAIL"),
            require_full_name: var("REQUIRE_FULL_NAME").is_some_and(|value| flag(&value)),
            require_email: var("REQUIRE_EMAIL").is_some_and(|value| flag(&value)),
            port: parse_or(var("PORT"), "PORT", PORT_DEFAULT)?,
        })
    }

    pub fn settings(&self) -> Settings {
        Settings {
            name_rule: if self.require_full_name {
                NameRule::FullName
            } else {
                NameRule::Any
            },
            require_email: self.require_email,
            mail_from: self.mail_from.clone(),
            admin_email: self.admin_email.clone(),
        }
    }
}

fn with_default(value: Option<String>, key: &str, default: &str) -> String {
    value.unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn parse_or<T: FromStr>(value: Option<String>, key: &'static str, default: T) -> Result<T, Error>
where
    T::Err: Display,
{
    match value {
        Some(value) => value.trim().parse().map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            Error::Config {
                key,
                reason: e.to_string(),
            }
        }),
        None => Ok(default),
    }
}

fn flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
