use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{http::StatusCode, Body, Error, Response};

use super::service::load_tasks;

/// HTTP Handler: GET /tasks
pub async fn list_tasks(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Response<Body>, Error> {
    match load_tasks(client, table_name).await {
        Ok(tasks) => Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "application/json")
            .header("Access-Control-Allow-Origin", "*")
            .body(serde_json::to_string(&tasks)?.into())
            .map_err(Box::new)?),
        Err(e) => {
            tracing::error!("Failed to list tasks: {}", e);
            Ok(Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header("Content-Type", "application/json")
                .header("Access-Control-Allow-Origin", "*")
                .body(serde_json::json!({"error": e}).to_string().into())
                .map_err(Box::new)?)
        }
    }
}
