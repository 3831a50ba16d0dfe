//! Backend for a wedding RSVP site.
//!
//! Two operations: [`lookup::find_household`] resolves a typed guest name to
//! its household invitation, [`rsvp::submit_rsvp`] stores a household's
//! answers and sends the confirmation emails. Both take their store and
//! mailer explicitly; [`lambda`] and [`router`] adapt them to AWS Lambda and
//! to a standalone axum server.
pub mod common;
pub mod config;
pub mod lambda;
pub mod lookup;
pub mod mailer;
pub mod router;
pub mod rsvp;
pub mod state;
pub mod store;

pub use common::errors::Error;
