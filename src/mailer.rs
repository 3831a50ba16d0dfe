//! Outbound email through the Resend HTTP API.
use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::common::errors::MailError;
use crate::common::{Attendance, GuestResponse, RsvpRecord};

pub const RESEND_API_URL: &str = "https://api.resend.com";

const CONFIRMATION_SUBJECT: &str = "Your RSVP is confirmed!";
const NO_RESPONSE: &str = "no response";
const NONE: &str = "none";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Email {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), MailError>;
}

#[derive(Debug, Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ResendMailer {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, RESEND_API_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        let response = self
            .client
            .post(format!("{}/emails", self.base_url.trim_end_matches('/')))
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!("Email \"{}\" accepted by provider", email.subject);
        Ok(())
    }
}

/// Guest-facing receipt listing what was submitted.
pub fn confirmation_email(from: &str, to: &str, responses: &[GuestResponse]) -> Email {
    let items: String = responses
        .iter()
        .map(|response| {
            format!(
                "<li><strong>{}</strong><br/>Wedding Day: {}<br/>Welcome Dinner: {}</li>",
                escape_html(&response.name),
                attendance(response.wedding),
                attendance(response.dinner),
            )
        })
        .collect();

    let html = format!(
        "<h2>Your RSVP has been received!</h2>\
         <p>Here are your responses:</p>\
         <ul>{items}</ul>\
         <p>We can't wait to celebrate with you! &hearts;</p>"
    );

    Email {
        from: from.to_string(),
        to: vec![to.to_string()],
        subject: CONFIRMATION_SUBJECT.to_string(),
        html,
    }
}

/// Internal summary of one household's answers.
pub fn admin_email(from: &str, to: &str, record: &RsvpRecord) -> Email {
    let items: String = record
        .responses
        .iter()
        .map(|response| {
            format!(
                "<li><strong>{}</strong><br/>\
                 Attending: {}<br/>\
                 Welcome Dinner: {}<br/>\
                 Meal: {}<br/>\
                 Allergies: {}</li>",
                escape_html(&response.name),
                attendance(response.wedding),
                attendance(response.dinner),
                escape_html(response.meal.as_deref().unwrap_or(NO_RESPONSE)),
                escape_html(response.allergies.as_deref().unwrap_or(NONE)),
            )
        })
        .collect();

    let html = format!(
        "<h2>New RSVP from household {}</h2>\
         <p>Contact email: {}</p>\
         <ul>{items}</ul>\
         <p>Comments: {}</p>\
         <p>Submitted at {}</p>",
        escape_html(&record.household_id),
        escape_html(record.email.as_deref().unwrap_or(NONE)),
        escape_html(record.comments.as_deref().unwrap_or(NONE)),
        record.submitted_at.to_rfc2822(),
    );

    Email {
        from: from.to_string(),
        to: vec![to.to_string()],
        subject: format!("RSVP received: {}", record.household_id),
        html,
    }
}

fn attendance(value: Option<Attendance>) -> String {
    value.map_or_else(|| NO_RESPONSE.to_string(), |value| value.to_string())
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
