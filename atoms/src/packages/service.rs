use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use std::collections::HashMap;

use super::model::EventPackage;

/// Load the full package catalog for the admin mirror.
pub async fn load_packages(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Vec<EventPackage>, String> {
    let result = client
        .query()
        .table_name(table_name)
        .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
        .expression_attribute_values(":pk", AttributeValue::S("PACKAGE".to_string()))
        .expression_attribute_values(":sk_prefix", AttributeValue::S("PACKAGE#".to_string()))
        .send()
        .await
        .map_err(|e| format!("DynamoDB query error: {}", e))?;

    let mut packages = Vec::new();
    for item in result.items() {
        if let Some(package) = package_from_item(item) {
            packages.push(package);
        }
    }
    Ok(packages)
}

fn package_from_item(item: &HashMap<String, AttributeValue>) -> Option<EventPackage> {
    let sk = item.get("SK").and_then(|v| v.as_s().ok())?;
    let package_id = sk.strip_prefix("PACKAGE#")?.to_string();

    Some(EventPackage {
        package_id,
        name: string_field(item, "name"),
        category: string_field(item, "category"),
        price: item
            .get("price")
            .and_then(|v| v.as_n().ok())
            .and_then(|n| n.parse().ok())
            .unwrap_or(0.0),
        description: string_field(item, "description"),
        created_at: string_field(item, "created_at"),
    })
}

fn string_field(item: &HashMap<String, AttributeValue>, name: &str) -> String {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .unwrap_or_default()
}
