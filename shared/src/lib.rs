pub mod auth;
pub mod sockets;
pub mod types;

use aws_sdk_dynamodb::Client as DynamoClient;

pub const DEFAULT_TABLE_NAME: &str = "festiva";

/// Shared application state: injected store handles, never ambient globals.
pub struct AppState {
    pub dynamo_client: DynamoClient,
    pub table_name: String,
}

impl AppState {
    pub async fn from_env() -> AppState {
        let config = aws_config::load_from_env().await;
        AppState {
            dynamo_client: DynamoClient::new(&config),
            table_name: std::env::var("TABLE_NAME")
                .unwrap_or_else(|_| DEFAULT_TABLE_NAME.to_string()),
        }
    }
}
