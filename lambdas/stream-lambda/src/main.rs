use aws_lambda_events::event::dynamodb::{Event, EventRecord};
use aws_sdk_apigatewaymanagement::Client as ApiGwClient;
use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::sync::Arc;

use admin_block::mirrors::CollectionSnapshot;
use festiva_atoms as atoms;
use festiva_shared::sockets::{broadcast, BroadcastMessage};
use festiva_shared::AppState;

/// Which mirrored collection a table record belongs to, keyed off its PK
/// prefix. Bookings are pull-paginated, never mirrored, so they map to None.
fn collection_for_pk(pk: &str) -> Option<&'static str> {
    match pk.split('#').next() {
        Some("USER") => Some("vendors"),
        Some("TASK") => Some("tasks"),
        Some("REVIEW") => Some("reviews"),
        Some("PACKAGE") => Some("packages"),
        _ => None,
    }
}

fn record_collection(record: &EventRecord) -> Option<&'static str> {
    let keys = serde_json::to_value(&record.change.keys).ok()?;
    let pk = keys.get("PK")?.get("S")?.as_str()?;
    collection_for_pk(pk)
}

/// Re-read one collection in full and wrap it as a snapshot emission.
async fn build_snapshot(
    client: &DynamoClient,
    table_name: &str,
    collection: &str,
) -> Result<CollectionSnapshot, String> {
    let documents = match collection {
        "vendors" => atoms::users::load_vendors(client, table_name)
            .await?
            .iter()
            .filter_map(|v| serde_json::to_value(v).ok())
            .collect(),
        "tasks" => atoms::tasks::load_tasks(client, table_name)
            .await?
            .iter()
            .filter_map(|t| serde_json::to_value(t).ok())
            .collect(),
        "reviews" => atoms::reviews::load_reviews(client, table_name)
            .await?
            .iter()
            .filter_map(|r| serde_json::to_value(r).ok())
            .collect(),
        "packages" => atoms::packages::load_packages(client, table_name)
            .await?
            .iter()
            .filter_map(|p| serde_json::to_value(p).ok())
            .collect(),
        other => return Err(format!("Unknown collection: {}", other)),
    };

    Ok(CollectionSnapshot {
        collection: collection.to_string(),
        documents,
    })
}

async fn function_handler(
    event: LambdaEvent<Event>,
    state: Arc<AppState>,
    apigw_client: Arc<ApiGwClient>,
) -> Result<(), Error> {
    let mut touched: Vec<&'static str> = Vec::new();
    for record in &event.payload.records {
        if let Some(collection) = record_collection(record) {
            if !touched.contains(&collection) {
                touched.push(collection);
            }
        }
    }

    tracing::info!(
        "Stream invoked - {} records, collections: {:?}",
        event.payload.records.len(),
        touched
    );

    for collection in touched {
        let snapshot =
            match build_snapshot(&state.dynamo_client, &state.table_name, collection).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    // One bad collection never blocks the others.
                    tracing::error!("Failed to rebuild {} snapshot: {}", collection, e);
                    continue;
                }
            };

        let message = BroadcastMessage::new("snapshot", serde_json::to_value(&snapshot)?);
        match broadcast(&apigw_client, &state.dynamo_client, &state.table_name, &message).await {
            Ok(delivered) => {
                tracing::info!("Pushed {} snapshot to {} connections", collection, delivered);
            }
            Err(e) => {
                tracing::error!("Broadcast of {} snapshot failed: {}", collection, e);
            }
        }
    }

    Ok(())
}

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

    let config = aws_config::load_from_env().await;
    let callback_url = std::env::var("WS_CALLBACK_URL").unwrap_or_default();
    let apigw_config = aws_sdk_apigatewaymanagement::config::Builder::from(&config)
        .endpoint_url(callback_url)
        .build();
    let apigw_client = Arc::new(ApiGwClient::from_conf(apigw_config));

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        let apigw_client = Arc::clone(&apigw_client);
        async move { function_handler(event, state, apigw_client).await }
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pk_prefixes_map_to_mirrored_collections() {
        assert_eq!(collection_for_pk("USER"), Some("vendors"));
        assert_eq!(collection_for_pk("TASK"), Some("tasks"));
        assert_eq!(collection_for_pk("REVIEW"), Some("reviews"));
        assert_eq!(collection_for_pk("PACKAGE"), Some("packages"));
        assert_eq!(collection_for_pk("VENDOR#v1"), None);
        assert_eq!(collection_for_pk("BOOKING"), None);
        assert_eq!(collection_for_pk("CONNECTION"), None);
    }
}
