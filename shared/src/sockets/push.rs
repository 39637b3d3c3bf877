use aws_sdk_apigatewaymanagement::primitives::Blob;
use aws_sdk_apigatewaymanagement::Client as ApiGwClient;
use aws_sdk_dynamodb::Client as DynamoClient;

use super::connections::{load_connection_ids, remove_connection};
use super::messages::BroadcastMessage;

/// Push a message to every registered connection. Connections the gateway
/// reports as gone are removed from the registry; other per-connection
/// failures are logged and skipped.
pub async fn broadcast(
    apigw_client: &ApiGwClient,
    dynamo_client: &DynamoClient,
    table_name: &str,
    message: &BroadcastMessage,
) -> Result<usize, String> {
    let payload =
        serde_json::to_vec(message).map_err(|e| format!("Serialize broadcast error: {}", e))?;
    let connection_ids = load_connection_ids(dynamo_client, table_name).await?;

    let mut delivered = 0;
    for connection_id in connection_ids {
        let result = apigw_client
            .post_to_connection()
            .connection_id(&connection_id)
            .data(Blob::new(payload.clone()))
            .send()
            .await;

        match result {
            Ok(_) => delivered += 1,
            Err(e) => {
                let gone = e
                    .as_service_error()
                    .map(|se| se.is_gone_exception())
                    .unwrap_or(false);
                if gone {
                    tracing::info!("Connection {} is gone, removing", connection_id);
                    if let Err(e) = remove_connection(dynamo_client, table_name, &connection_id).await
                    {
                        tracing::warn!("Failed to remove stale connection: {}", e);
                    }
                } else {
                    tracing::warn!("Push to {} failed: {}", connection_id, e);
                }
            }
        }
    }

    Ok(delivered)
}
