use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE, CONTENT_TYPE,
};
use http::{response::Builder, StatusCode};
use lambda_http::{Request, RequestPayloadExt, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::common::errors::Error;

const EMPTY_PAYLOAD_ERROR: &str = "Request payload is empty";

pub const ALLOWED_ORIGIN: &str = "*";
pub const ALLOWED_METHODS: &str = "POST, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type";
pub const PREFLIGHT_MAX_AGE_SECS: u64 = 60 * 60;

pub fn extract_request<T: DeserializeOwned>(request: &Request) -> Result<T, Error> {
    match request.payload::<T>() {
        Ok(Some(val)) => Ok(val),
        // Browsers skipping the preflight post JSON as text/plain
        Ok(None) if !request.body().is_empty() => serde_json::from_slice(request.body())
            .map_err(|err| Error::validation(err.to_string())),
        Ok(None) => Err(Error::validation(EMPTY_PAYLOAD_ERROR)),
        Err(err) => Err(Error::validation(err.to_string())),
    }
}

pub fn json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
) -> Result<Response<String>, Error> {
    let response = with_cors(Response::builder())
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(serde_json::to_string(body)?)?;

    Ok(response)
}

pub fn error_response(error: &Error) -> Result<Response<String>, Error> {
    json_response(error.status(), &error.body())
}

pub fn preflight_response() -> Result<Response<String>, Error> {
    let response = with_cors(Response::builder())
        .status(StatusCode::NO_CONTENT)
        .header(ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS)
        .header(ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS)
        .header(ACCESS_CONTROL_MAX_AGE, PREFLIGHT_MAX_AGE_SECS)
        .body(String::new())?;

    Ok(response)
}

fn with_cors(builder: Builder) -> Builder {
    builder.header(ACCESS_CONTROL_ALLOW_ORIGIN, ALLOWED_ORIGIN)
}
