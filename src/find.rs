use lambda_http::{run, service_fn, Error as LambdaError, Request as LambdaRequest};
use tracing::info;

use wedding_rsvp::{config::Config, lambda, state::AppState};

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .without_time() // CloudWatch will add the ingestion time
        .with_target(false)
        .init();

    let config = Config::load()?;
    let state = AppState::from_config(&config).await;
    info!("Serving household lookups from {}", config.households_table);

    run(service_fn(|request: LambdaRequest| async {
        lambda::respond(lambda::find(request, &state).await)
    }))
    .await
}
