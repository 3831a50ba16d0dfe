//! RSVP submission: persist the household's answers, then notify.
//!
//! The write is the only step that can fail the request. Emails go out
//! afterwards and their failures are logged and dropped.
use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::common::errors::Error;
use crate::common::{GuestResponse, RsvpRecord};
use crate::config::Settings;
use crate::mailer::{admin_email, confirmation_email, Email, Mailer};
use crate::store::Store;

const MISSING_FIELDS_ERROR: &str = "Missing fields";
const MISSING_EMAIL_ERROR: &str = "Missing email";
const INVALID_EMAIL_ERROR: &str = "Invalid email";
const MISSING_GUEST_NAME_ERROR: &str = "Every response needs a guest name";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub household_id: Option<String>,
    pub responses: Option<Vec<GuestResponse>>,
    pub email: Option<String>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    pub household_id: String,
    pub responses: Vec<GuestResponse>,
    pub email: Option<String>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
}

pub fn validate(request: SubmitRequest, settings: &Settings) -> Result<ValidSubmission, Error> {
    let household_id = request
        .household_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());

    let (Some(household_id), Some(responses)) = (household_id, request.responses) else {
        return Err(Error::validation(MISSING_FIELDS_ERROR));
    };
    if responses.is_empty() {
        return Err(Error::validation(MISSING_FIELDS_ERROR));
    }

    let responses = responses
        .into_iter()
        .map(|response| {
            let name = response.name.trim().to_string();
            if name.is_empty() {
                return Err(Error::validation(MISSING_GUEST_NAME_ERROR));
            }

            Ok(GuestResponse {
                name,
                wedding: response.wedding,
                dinner: response.dinner,
                meal: non_blank(response.meal),
                allergies: non_blank(response.allergies),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let email = non_blank(request.email);
    match &email {
        Some(email) if !EMAIL_RE.is_match(email) => {
            return Err(Error::validation(INVALID_EMAIL_ERROR))
        }
        None if settings.require_email => return Err(Error::validation(MISSING_EMAIL_ERROR)),
        _ => {}
    }

    Ok(ValidSubmission {
        household_id,
        responses,
        email,
        comments: non_blank(request.comments),
    })
}

#[tracing::instrument(skip_all)]
pub async fn submit_rsvp(
    store: &dyn Store,
    mailer: Option<&dyn Mailer>,
    settings: &Settings,
    request: SubmitRequest,
) -> Result<SubmitResponse, Error> {
    let submission = validate(request, settings)?;

    let record = RsvpRecord {
        household_id: submission.household_id,
        responses: submission.responses,
        email: submission.email,
        comments: submission.comments,
        submitted_at: Utc::now(),
        submission_id: Uuid::new_v4(),
    };

    store.put_rsvp(&record).await?;
    info!(
        "Saved rsvp {} for household {} ({} guests)",
        record.submission_id,
        record.household_id,
        record.responses.len()
    );

    match mailer {
        Some(mailer) => notify(mailer, settings, &record).await,
        None => warn!("No email provider configured, skipping notifications"),
    }

    Ok(SubmitResponse { success: true })
}

pub async fn get_rsvp(store: &dyn Store, household_id: &str) -> Result<RsvpRecord, Error> {
    store.get_rsvp(household_id).await?.ok_or(Error::NotFound)
}

async fn notify(mailer: &dyn Mailer, settings: &Settings, record: &RsvpRecord) {
    let confirmation = record
        .email
        .as_deref()
        .map(|to| confirmation_email(&settings.mail_from, to, &record.responses));
    let admin = settings
        .admin_email
        .as_deref()
        .map(|to| admin_email(&settings.mail_from, to, record));

    tokio::join!(
        deliver(mailer, confirmation, "confirmation", record),
        deliver(mailer, admin, "admin notification", record),
    );
}

async fn deliver(mailer: &dyn Mailer, email: Option<Email>, kind: &str, record: &RsvpRecord) {
    let Some(email) = email else {
        return;
    };

    if let Err(err) = mailer.send(&email).await {
        error!(
            "Failed to send {kind} email for rsvp {}: {err}",
            record.submission_id
        );
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
