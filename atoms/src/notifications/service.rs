use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;

use super::model::Notification;

/// Create an unread notification for a user.
pub async fn create_notification(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
    message: &str,
    link: &str,
) -> Result<Notification, String> {
    let notification_id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S(format!("USER#{}", user_id)))
        .item(
            "SK",
            AttributeValue::S(format!("NOTIFICATION#{}#{}", now, notification_id)),
        )
        .item("user_id", AttributeValue::S(user_id.to_string()))
        .item("message", AttributeValue::S(message.to_string()))
        .item("is_read", AttributeValue::Bool(false))
        .item("created_at", AttributeValue::S(now.clone()))
        .item("link", AttributeValue::S(link.to_string()))
        .send()
        .await
        .map_err(|e| format!("DynamoDB put_item error: {}", e))?;

    Ok(Notification {
        notification_id,
        user_id: user_id.to_string(),
        message: message.to_string(),
        is_read: false,
        created_at: now,
        link: link.to_string(),
    })
}
