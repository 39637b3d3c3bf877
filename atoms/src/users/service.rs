use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use std::collections::HashMap;

use super::model::{User, ROLE_VENDOR};

/// Load every vendor user. The vendor roster is small by design and is
/// mirrored wholesale on the admin side, so no pagination here.
pub async fn load_vendors(client: &DynamoClient, table_name: &str) -> Result<Vec<User>, String> {
    let result = client
        .query()
        .table_name(table_name)
        .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
        .expression_attribute_values(":pk", AttributeValue::S("USER".to_string()))
        .expression_attribute_values(":sk_prefix", AttributeValue::S("USER#".to_string()))
        .filter_expression("#role = :vendor")
        .expression_attribute_names("#role", "role")
        .expression_attribute_values(":vendor", AttributeValue::S(ROLE_VENDOR.to_string()))
        .send()
        .await
        .map_err(|e| format!("DynamoDB query error: {}", e))?;

    let mut vendors = Vec::new();
    for item in result.items() {
        if let Some(user) = user_from_item(item) {
            vendors.push(user);
        }
    }
    Ok(vendors)
}

/// Fetch a vendor's unavailable dates (YYYY-MM-DD strings), stored as a
/// single sub-document keyed by vendor id. A failed read logs a warning and
/// counts as an open calendar, mirroring the marketplace client behavior.
pub async fn get_unavailable_dates(
    client: &DynamoClient,
    table_name: &str,
    vendor_id: &str,
) -> Vec<String> {
    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(format!("VENDOR#{}", vendor_id)))
        .key("SK", AttributeValue::S("AVAILABILITY".to_string()))
        .send()
        .await;

    let output = match result {
        Ok(output) => output,
        Err(e) => {
            tracing::warn!("Failed to fetch unavailable dates for {}: {}", vendor_id, e);
            return Vec::new();
        }
    };

    output
        .item()
        .and_then(|item| item.get("dates"))
        .and_then(|v| v.as_l().ok())
        .map(|list| {
            list.iter()
                .filter_map(|entry| entry.as_s().ok().cloned())
                .collect()
        })
        .unwrap_or_default()
}

fn user_from_item(item: &HashMap<String, AttributeValue>) -> Option<User> {
    let sk = item.get("SK").and_then(|v| v.as_s().ok())?;
    let uid = sk.strip_prefix("USER#")?.to_string();

    Some(User {
        uid,
        name: string_field(item, "name"),
        email: string_field(item, "email"),
        role: string_field(item, "role"),
        status: string_field(item, "status"),
        created_at: string_field(item, "created_at"),
    })
}

fn string_field(item: &HashMap<String, AttributeValue>, name: &str) -> String {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .unwrap_or_default()
}
