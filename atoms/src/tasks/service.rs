use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use std::collections::HashMap;

use super::model::VendorTask;

/// Load the full task collection. Mirrored wholesale on the admin side;
/// full-collection sync is an accepted scaling limitation.
pub async fn load_tasks(client: &DynamoClient, table_name: &str) -> Result<Vec<VendorTask>, String> {
    let result = client
        .query()
        .table_name(table_name)
        .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
        .expression_attribute_values(":pk", AttributeValue::S("TASK".to_string()))
        .expression_attribute_values(":sk_prefix", AttributeValue::S("TASK#".to_string()))
        .send()
        .await
        .map_err(|e| format!("DynamoDB query error: {}", e))?;

    let mut tasks = Vec::new();
    for item in result.items() {
        if let Some(task) = task_from_item(item) {
            tasks.push(task);
        }
    }
    Ok(tasks)
}

/// Duplicate-assignment check: there may be at most one task per
/// (booking_id, category), enforced at write time rather than by the store.
pub fn find_assignment<'a>(
    tasks: &'a [VendorTask],
    booking_id: &str,
    category: &str,
) -> Option<&'a VendorTask> {
    tasks
        .iter()
        .find(|t| t.booking_id == booking_id && t.category == category)
}

/// DynamoDB item for a task, used by the assignment engine's atomic commit.
pub fn task_item(task: &VendorTask) -> HashMap<String, AttributeValue> {
    HashMap::from([
        ("PK".to_string(), AttributeValue::S("TASK".to_string())),
        (
            "SK".to_string(),
            AttributeValue::S(format!("TASK#{}", task.task_id)),
        ),
        (
            "booking_id".to_string(),
            AttributeValue::S(task.booking_id.clone()),
        ),
        (
            "vendor_id".to_string(),
            AttributeValue::S(task.vendor_id.clone()),
        ),
        (
            "vendor_name".to_string(),
            AttributeValue::S(task.vendor_name.clone()),
        ),
        (
            "category".to_string(),
            AttributeValue::S(task.category.clone()),
        ),
        ("title".to_string(), AttributeValue::S(task.title.clone())),
        (
            "description".to_string(),
            AttributeValue::S(task.description.clone()),
        ),
        ("status".to_string(), AttributeValue::S(task.status.clone())),
        (
            "event_date".to_string(),
            AttributeValue::S(task.event_date.clone()),
        ),
        (
            "client_requirements".to_string(),
            AttributeValue::S(task.client_requirements.clone()),
        ),
        (
            "created_at".to_string(),
            AttributeValue::S(task.created_at.clone()),
        ),
    ])
}

fn task_from_item(item: &HashMap<String, AttributeValue>) -> Option<VendorTask> {
    let sk = item.get("SK").and_then(|v| v.as_s().ok())?;
    let task_id = sk.strip_prefix("TASK#")?.to_string();

    Some(VendorTask {
        task_id,
        booking_id: string_field(item, "booking_id"),
        vendor_id: string_field(item, "vendor_id"),
        vendor_name: string_field(item, "vendor_name"),
        category: string_field(item, "category"),
        title: string_field(item, "title"),
        description: string_field(item, "description"),
        status: string_field(item, "status"),
        event_date: string_field(item, "event_date"),
        client_requirements: string_field(item, "client_requirements"),
        created_at: string_field(item, "created_at"),
    })
}

fn string_field(item: &HashMap<String, AttributeValue>, name: &str) -> String {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(booking_id: &str, category: &str) -> VendorTask {
        VendorTask {
            task_id: uuid::Uuid::new_v4().to_string(),
            booking_id: booking_id.to_string(),
            vendor_id: "v1".to_string(),
            vendor_name: "Acme".to_string(),
            category: category.to_string(),
            title: String::new(),
            description: String::new(),
            status: "assigned".to_string(),
            event_date: "2024-05-01".to_string(),
            client_requirements: String::new(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn find_assignment_matches_pair_only() {
        let tasks = vec![task("b1", "catering"), task("b2", "music")];
        assert!(find_assignment(&tasks, "b1", "catering").is_some());
        assert!(find_assignment(&tasks, "b1", "music").is_none());
        assert!(find_assignment(&tasks, "b2", "catering").is_none());
    }

    #[test]
    fn task_item_round_trips() {
        let original = task("b1", "catering");
        let restored = task_from_item(&task_item(&original)).unwrap();
        assert_eq!(restored.task_id, original.task_id);
        assert_eq!(restored.booking_id, "b1");
        assert_eq!(restored.category, "catering");
    }
}
