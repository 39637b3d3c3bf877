use aws_lambda_events::event::apigw::{
    ApiGatewayProxyResponse, ApiGatewayWebsocketProxyRequest,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::sync::Arc;

use festiva_shared::sockets::{
    remove_connection, save_connection, BroadcastMessage, WebSocketAction, WebSocketMessage,
};
use festiva_shared::AppState;

/// Decode the action of an incoming socket frame.
fn parse_action(body: &str) -> Option<WebSocketAction> {
    let message: WebSocketMessage = serde_json::from_str(body).ok()?;
    serde_json::from_value(serde_json::Value::String(message.action)).ok()
}

/// Envelope sent back on the same connection in response to an action.
/// Subscribe/unsubscribe are acknowledgments only: snapshots fan out to
/// every registered connection.
fn action_reply(action: &WebSocketAction) -> BroadcastMessage {
    let kind = match action {
        WebSocketAction::Subscribe => "subscribed",
        WebSocketAction::Unsubscribe => "unsubscribed",
        WebSocketAction::Ping => "pong",
    };
    BroadcastMessage::new(kind, serde_json::json!({}))
}

fn response(status_code: i64, body: Option<String>) -> ApiGatewayProxyResponse {
    ApiGatewayProxyResponse {
        status_code,
        body: body.map(Into::into),
        ..Default::default()
    }
}

async fn function_handler(
    event: LambdaEvent<ApiGatewayWebsocketProxyRequest>,
    state: Arc<AppState>,
) -> Result<ApiGatewayProxyResponse, Error> {
    let context = &event.payload.request_context;
    let route_key = context.route_key.as_deref().unwrap_or_default();
    let connection_id = match context.connection_id.as_deref() {
        Some(id) => id,
        None => {
            tracing::warn!("Socket event without a connection id");
            return Ok(response(400, None));
        }
    };

    tracing::info!("WS invoked - Route: {} Connection: {}", route_key, connection_id);

    match route_key {
        "$connect" => {
            if let Err(e) =
                save_connection(&state.dynamo_client, &state.table_name, connection_id).await
            {
                tracing::error!("Failed to register connection {}: {}", connection_id, e);
                return Ok(response(500, None));
            }
            Ok(response(200, None))
        }
        "$disconnect" => {
            if let Err(e) =
                remove_connection(&state.dynamo_client, &state.table_name, connection_id).await
            {
                tracing::warn!("Failed to deregister connection {}: {}", connection_id, e);
            }
            Ok(response(200, None))
        }
        _ => {
            let body = event.payload.body.as_deref().unwrap_or_default();
            match parse_action(body) {
                Some(action) => {
                    let reply = serde_json::to_string(&action_reply(&action))?;
                    Ok(response(200, Some(reply)))
                }
                None => {
                    tracing::warn!("Unrecognized socket frame from {}", connection_id);
                    Ok(response(400, None))
                }
            }
        }
    }
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

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { function_handler(event, state).await }
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_actions_parse() {
        assert!(matches!(
            parse_action(r#"{"action":"ping"}"#),
            Some(WebSocketAction::Ping)
        ));
        assert!(matches!(
            parse_action(r#"{"action":"subscribe","collection":"vendors"}"#),
            Some(WebSocketAction::Subscribe)
        ));
        assert!(parse_action(r#"{"action":"launch_missiles"}"#).is_none());
        assert!(parse_action("not json").is_none());
    }

    #[test]
    fn replies_carry_the_envelope_type() {
        let reply = serde_json::to_string(&action_reply(&WebSocketAction::Ping)).unwrap();
        assert_eq!(reply, r#"{"type":"pong"}"#);
        let reply = serde_json::to_string(&action_reply(&WebSocketAction::Subscribe)).unwrap();
        assert_eq!(reply, r#"{"type":"subscribed"}"#);
    }
}
