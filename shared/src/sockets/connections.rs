use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;

/// Register a live dashboard connection.
pub async fn save_connection(
    client: &DynamoClient,
    table_name: &str,
    connection_id: &str,
) -> Result<(), String> {
    client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S("CONNECTION".to_string()))
        .item(
            "SK",
            AttributeValue::S(format!("CONNECTION#{}", connection_id)),
        )
        .item(
            "connected_at",
            AttributeValue::S(chrono::Utc::now().to_rfc3339()),
        )
        .send()
        .await
        .map_err(|e| format!("DynamoDB put_item error: {}", e))?;
    Ok(())
}

/// Drop a connection from the registry, on disconnect or after a stale push.
pub async fn remove_connection(
    client: &DynamoClient,
    table_name: &str,
    connection_id: &str,
) -> Result<(), String> {
    client
        .delete_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S("CONNECTION".to_string()))
        .key(
            "SK",
            AttributeValue::S(format!("CONNECTION#{}", connection_id)),
        )
        .send()
        .await
        .map_err(|e| format!("DynamoDB delete_item error: {}", e))?;
    Ok(())
}

/// All currently registered connection ids.
pub async fn load_connection_ids(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Vec<String>, String> {
    let result = client
        .query()
        .table_name(table_name)
        .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
        .expression_attribute_values(":pk", AttributeValue::S("CONNECTION".to_string()))
        .expression_attribute_values(":sk_prefix", AttributeValue::S("CONNECTION#".to_string()))
        .send()
        .await
        .map_err(|e| format!("DynamoDB query error: {}", e))?;

    let ids = result
        .items()
        .iter()
        .filter_map(|item| {
            item.get("SK")
                .and_then(|v| v.as_s().ok())
                .and_then(|sk| sk.strip_prefix("CONNECTION#"))
                .map(|id| id.to_string())
        })
        .collect();
    Ok(ids)
}
