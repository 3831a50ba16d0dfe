use http::StatusCode;
use serde::Serialize;
use thiserror::Error;

pub const SERVER_ERROR: &str = "Server error";

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("No matching invitation found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Not found")]
    UnknownRoute,

    #[error("invalid {key} value: {reason}")]
    Config { key: &'static str, reason: String },

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("http error: {0}")]
    Http(#[from] http::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound | Error::UnknownRoute => StatusCode::NOT_FOUND,
            Error::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Error::Config { .. } | Error::Store(_) | Error::Http(_) | Error::Json(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Body sent to the client. Upstream details stay in the logs.
    pub fn body(&self) -> ErrorBody {
        let error = if self.status().is_server_error() {
            SERVER_ERROR.to_string()
        } else {
            self.to_string()
        };

        ErrorBody { error }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Dynamo(#[from] Box<aws_sdk_dynamodb::Error>),

    #[error("malformed item: {0}")]
    Malformed(String),

    #[error("store unavailable")]
    Unavailable,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error("email provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}
