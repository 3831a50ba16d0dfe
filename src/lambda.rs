//! API Gateway / Lambda function URL adapter, one function per endpoint.
use http::{Method, StatusCode};
use lambda_http::{Error as LambdaError, Request as LambdaRequest, Response as LambdaResponse};
use tracing::{error, info};

use crate::common::errors::Error;
use crate::common::utils::{error_response, extract_request, json_response, preflight_response};
use crate::lookup::{find_household, FindRequest};
use crate::rsvp::{submit_rsvp, SubmitRequest};
use crate::state::AppState;

#[tracing::instrument(skip_all, fields(method = %request.method(), path = request.uri().path()))]
pub async fn find(
    request: LambdaRequest,
    state: &AppState,
) -> Result<LambdaResponse<String>, Error> {
    if let Some(response) = route_method(&request)? {
        return Ok(response);
    }

    let payload = extract_request::<FindRequest>(&request)?;
    let found = find_household(
        state.store(),
        state.settings.name_rule,
        payload.name.as_deref(),
    )
    .await?;

    json_response(StatusCode::OK, &found)
}

#[tracing::instrument(skip_all, fields(method = %request.method(), path = request.uri().path()))]
pub async fn submit(
    request: LambdaRequest,
    state: &AppState,
) -> Result<LambdaResponse<String>, Error> {
    if let Some(response) = route_method(&request)? {
        return Ok(response);
    }

    let payload = extract_request::<SubmitRequest>(&request)?;
    let submitted =
        submit_rsvp(state.store(), state.mailer(), &state.settings, payload).await?;

    json_response(StatusCode::OK, &submitted)
}

/// Turns a handler result into what the runtime expects. Only a failure to
/// build the error response itself is returned to the runtime.
pub fn respond(
    result: Result<LambdaResponse<String>, Error>,
) -> Result<LambdaResponse<String>, LambdaError> {
    match result {
        Ok(val) => Ok(val),
        Err(err) => {
            if err.status().is_server_error() {
                error!("Request failed: {err}");
            } else {
                info!("Rejected request: {err}");
            }
            error_response(&err).map_err(LambdaError::from)
        }
    }
}

/// Answers preflights and rejects anything but POST.
fn route_method(request: &LambdaRequest) -> Result<Option<LambdaResponse<String>>, Error> {
    match *request.method() {
        Method::POST => Ok(None),
        Method::OPTIONS => preflight_response().map(Some),
        _ => Err(Error::MethodNotAllowed),
    }
}
