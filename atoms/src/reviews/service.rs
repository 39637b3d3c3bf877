use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use std::collections::HashMap;

use super::model::Review;

/// Load the full review collection for the admin mirror.
pub async fn load_reviews(client: &DynamoClient, table_name: &str) -> Result<Vec<Review>, String> {
    let result = client
        .query()
        .table_name(table_name)
        .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
        .expression_attribute_values(":pk", AttributeValue::S("REVIEW".to_string()))
        .expression_attribute_values(":sk_prefix", AttributeValue::S("REVIEW#".to_string()))
        .send()
        .await
        .map_err(|e| format!("DynamoDB query error: {}", e))?;

    let mut reviews = Vec::new();
    for item in result.items() {
        if let Some(review) = review_from_item(item) {
            reviews.push(review);
        }
    }
    Ok(reviews)
}

fn review_from_item(item: &HashMap<String, AttributeValue>) -> Option<Review> {
    let sk = item.get("SK").and_then(|v| v.as_s().ok())?;
    let review_id = sk.strip_prefix("REVIEW#")?.to_string();

    Some(Review {
        review_id,
        booking_id: string_field(item, "booking_id"),
        vendor_id: string_field(item, "vendor_id"),
        client_name: string_field(item, "client_name"),
        rating: item
            .get("rating")
            .and_then(|v| v.as_n().ok())
            .and_then(|n| n.parse().ok())
            .unwrap_or(0),
        comment: string_field(item, "comment"),
        created_at: string_field(item, "created_at"),
    })
}

fn string_field(item: &HashMap<String, AttributeValue>, name: &str) -> String {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .unwrap_or_default()
}
