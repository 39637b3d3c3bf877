use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{http::StatusCode, Body, Error, Response};

use super::service::{fetch_booking_page, PageCursor, StatusFilter};

/// HTTP Handler: GET /bookings?status=&cursor=
pub async fn list_bookings(
    client: &DynamoClient,
    table_name: &str,
    status_param: Option<&str>,
    cursor_param: Option<&str>,
) -> Result<Response<Body>, Error> {
    let filter = match status_param {
        None => StatusFilter::All,
        Some(s) => match StatusFilter::parse(s) {
            Some(f) => f,
            None => return bad_request(&format!("Unknown status filter: {}", s)),
        },
    };

    let cursor = match cursor_param {
        None => None,
        Some(c) => match PageCursor::decode(c) {
            Ok(cursor) => Some(cursor),
            Err(e) => return bad_request(&e),
        },
    };

    match fetch_booking_page(client, table_name, filter, cursor.as_ref()).await {
        Ok(page) => {
            let body = serde_json::json!({
                "bookings": page.records,
                "cursor": page.cursor.as_ref().map(|c| c.encode()),
                "has_more": page.has_more,
            });
            Ok(Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", "application/json")
                .header("Access-Control-Allow-Origin", "*")
                .body(body.to_string().into())
                .map_err(Box::new)?)
        }
        Err(e) => {
            tracing::error!("Failed to load bookings: {}", e);
            Ok(Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header("Content-Type", "application/json")
                .header("Access-Control-Allow-Origin", "*")
                .body(
                    serde_json::json!({"error": "Failed to load bookings."})
                        .to_string()
                        .into(),
                )
                .map_err(Box::new)?)
        }
    }
}

fn bad_request(message: &str) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::BAD_REQUEST)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::json!({"error": message}).to_string().into())
        .map_err(Box::new)?)
}
