use admin_block::InFlightGuard;
use festiva_shared::AppState;
use lambda_http::{run, service_fn, Error};
use std::sync::Arc;

mod http_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .without_time()
        .init();

    let state = Arc::new(AppState::from_env().await);
    let guard = Arc::new(InFlightGuard::new());

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        let guard = Arc::clone(&guard);
        async move { http_handler::function_handler(event, state, guard).await }
    }))
    .await
}
