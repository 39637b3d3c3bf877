use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use std::collections::HashMap;

use super::model::{ActivityLogEntry, ActivityMeta};

/// Load the most recent activity log entries, newest first. The SK embeds
/// the timestamp, so a descending key scan is already in order.
pub async fn load_recent_activity(
    client: &DynamoClient,
    table_name: &str,
    limit: usize,
) -> Result<Vec<ActivityLogEntry>, String> {
    let result = client
        .query()
        .table_name(table_name)
        .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
        .expression_attribute_values(":pk", AttributeValue::S("ACTIVITY".to_string()))
        .expression_attribute_values(":sk_prefix", AttributeValue::S("LOG#".to_string()))
        .scan_index_forward(false)
        .limit(limit as i32)
        .send()
        .await
        .map_err(|e| format!("DynamoDB query error: {}", e))?;

    let mut entries = Vec::new();
    for item in result.items() {
        if let Some(entry) = entry_from_item(item) {
            entries.push(entry);
        }
    }
    Ok(entries)
}

/// DynamoDB item for a log entry, used by the assignment engine's atomic
/// commit.
pub fn log_item(entry: &ActivityLogEntry) -> HashMap<String, AttributeValue> {
    HashMap::from([
        ("PK".to_string(), AttributeValue::S("ACTIVITY".to_string())),
        (
            "SK".to_string(),
            AttributeValue::S(format!("LOG#{}#{}", entry.timestamp, entry.log_id)),
        ),
        (
            "message".to_string(),
            AttributeValue::S(entry.message.clone()),
        ),
        (
            "timestamp".to_string(),
            AttributeValue::S(entry.timestamp.clone()),
        ),
        (
            "meta_booking_id".to_string(),
            AttributeValue::S(entry.meta.booking_id.clone()),
        ),
        (
            "meta_vendor_name".to_string(),
            AttributeValue::S(entry.meta.vendor_name.clone()),
        ),
        (
            "meta_client_name".to_string(),
            AttributeValue::S(entry.meta.client_name.clone()),
        ),
    ])
}

fn entry_from_item(item: &HashMap<String, AttributeValue>) -> Option<ActivityLogEntry> {
    let sk = item.get("SK").and_then(|v| v.as_s().ok())?;
    let log_id = sk.rsplit('#').next()?.to_string();

    Some(ActivityLogEntry {
        log_id,
        message: string_field(item, "message"),
        timestamp: string_field(item, "timestamp"),
        meta: ActivityMeta {
            booking_id: string_field(item, "meta_booking_id"),
            vendor_name: string_field(item, "meta_vendor_name"),
            client_name: string_field(item, "meta_client_name"),
        },
    })
}

fn string_field(item: &HashMap<String, AttributeValue>, name: &str) -> String {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .unwrap_or_default()
}
