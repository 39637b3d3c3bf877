use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use std::collections::HashMap;

use super::model::{BookingRequest, BookingStatus, Customization};

/// Fixed page size for the admin booking list.
pub const PAGE_SIZE: usize = 10;

/// GSI ordering all bookings by creation time (GSI1PK = "BOOKING", GSI1SK = created_at).
pub const CREATED_INDEX: &str = "bookings-by-created";
/// GSI ordering bookings of one status by creation time (GSI2PK = "STATUS#<s>", GSI2SK = created_at).
pub const STATUS_INDEX: &str = "bookings-by-status";

/// Status filter applied ahead of the ordering/limit clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(BookingStatus),
}

impl StatusFilter {
    pub fn parse(s: &str) -> Option<StatusFilter> {
        if s == "all" {
            return Some(StatusFilter::All);
        }
        BookingStatus::parse(s).map(StatusFilter::Only)
    }
}

/// Opaque pagination marker: the index key of the last record of the most
/// recently fetched page. Base64(JSON) on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor(HashMap<String, String>);

impl PageCursor {
    pub fn encode(&self) -> String {
        let json = serde_json::to_vec(&self.0).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    pub fn decode(s: &str) -> Result<PageCursor, String> {
        let bytes = URL_SAFE_NO_PAD
            .decode(s)
            .map_err(|e| format!("Invalid cursor: {}", e))?;
        let map: HashMap<String, String> =
            serde_json::from_slice(&bytes).map_err(|e| format!("Invalid cursor: {}", e))?;
        Ok(PageCursor(map))
    }

    fn to_start_key(&self) -> HashMap<String, AttributeValue> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), AttributeValue::S(v.clone())))
            .collect()
    }
}

/// One fetched page plus the bookkeeping the pager needs.
#[derive(Debug)]
pub struct BookingPage {
    pub records: Vec<BookingRequest>,
    pub cursor: Option<PageCursor>,
    pub has_more: bool,
}

/// A short page always terminates pagination.
pub fn page_has_more(len: usize) -> bool {
    len == PAGE_SIZE
}

/// Fetch one page of bookings ordered by creation time descending,
/// optionally restricted to a single status.
pub async fn fetch_booking_page(
    client: &DynamoClient,
    table_name: &str,
    filter: StatusFilter,
    cursor: Option<&PageCursor>,
) -> Result<BookingPage, String> {
    let mut query = match filter {
        StatusFilter::All => client
            .query()
            .table_name(table_name)
            .index_name(CREATED_INDEX)
            .key_condition_expression("GSI1PK = :pk")
            .expression_attribute_values(":pk", AttributeValue::S("BOOKING".to_string())),
        StatusFilter::Only(status) => client
            .query()
            .table_name(table_name)
            .index_name(STATUS_INDEX)
            .key_condition_expression("GSI2PK = :pk")
            .expression_attribute_values(":pk", AttributeValue::S(format!("STATUS#{}", status))),
    };
    query = query.scan_index_forward(false).limit(PAGE_SIZE as i32);
    if let Some(cursor) = cursor {
        query = query.set_exclusive_start_key(Some(cursor.to_start_key()));
    }

    let result = query
        .send()
        .await
        .map_err(|e| format!("DynamoDB query error: {}", e))?;

    Ok(page_from_items(result.items(), filter))
}

/// Assemble a page from raw query items. has_more tracks the raw item
/// count, not the mapped record count: an item that fails to map must not
/// terminate pagination early.
fn page_from_items(items: &[HashMap<String, AttributeValue>], filter: StatusFilter) -> BookingPage {
    let mut records = Vec::new();
    for item in items {
        if let Some(booking) = booking_from_item(item) {
            records.push(booking);
        }
    }

    let cursor = items.last().and_then(|item| cursor_from_item(item, filter));
    let has_more = page_has_more(items.len());

    BookingPage {
        records,
        cursor,
        has_more,
    }
}

/// Get a single booking by id.
pub async fn get_booking(
    client: &DynamoClient,
    table_name: &str,
    booking_id: &str,
) -> Result<BookingRequest, String> {
    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S("BOOKING".to_string()))
        .key("SK", AttributeValue::S(format!("BOOKING#{}", booking_id)))
        .send()
        .await
        .map_err(|e| format!("DynamoDB get_item error: {}", e))?;

    match result.item() {
        Some(item) => booking_from_item(item).ok_or_else(|| "Booking not found".to_string()),
        None => Err("Booking not found".to_string()),
    }
}

/// Write a new status to a booking record. The status GSI key moves with it
/// so the filtered pagination index stays consistent.
pub async fn update_booking_status(
    client: &DynamoClient,
    table_name: &str,
    booking_id: &str,
    new_status: BookingStatus,
) -> Result<(), String> {
    client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S("BOOKING".to_string()))
        .key("SK", AttributeValue::S(format!("BOOKING#{}", booking_id)))
        .update_expression("SET #status = :status, GSI2PK = :gsi2pk")
        .expression_attribute_names("#status", "status")
        .expression_attribute_values(":status", AttributeValue::S(new_status.as_str().to_string()))
        .expression_attribute_values(":gsi2pk", AttributeValue::S(format!("STATUS#{}", new_status)))
        .condition_expression("attribute_exists(SK)")
        .send()
        .await
        .map_err(|e| format!("DynamoDB update_item error: {}", e))?;

    Ok(())
}

fn cursor_from_item(
    item: &HashMap<String, AttributeValue>,
    filter: StatusFilter,
) -> Option<PageCursor> {
    let keys: &[&str] = match filter {
        StatusFilter::All => &["PK", "SK", "GSI1PK", "GSI1SK"],
        StatusFilter::Only(_) => &["PK", "SK", "GSI2PK", "GSI2SK"],
    };
    let mut map = HashMap::new();
    for key in keys {
        map.insert(key.to_string(), item.get(*key)?.as_s().ok()?.clone());
    }
    Some(PageCursor(map))
}

/// Map a DynamoDB item onto the booking model. Items with an unrecognizable
/// key are skipped by callers.
pub fn booking_from_item(item: &HashMap<String, AttributeValue>) -> Option<BookingRequest> {
    let sk = item.get("SK").and_then(|v| v.as_s().ok())?;
    let booking_id = sk.strip_prefix("BOOKING#")?.to_string();

    let customizations = item
        .get("customizations")
        .and_then(|v| v.as_l().ok())
        .map(|list| {
            list.iter()
                .filter_map(|entry| {
                    let m = entry.as_m().ok()?;
                    Some(Customization {
                        name: m.get("name")?.as_s().ok()?.clone(),
                        category: m.get("category")?.as_s().ok()?.clone(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Some(BookingRequest {
        booking_id,
        client_id: string_field(item, "client_id"),
        client_name: string_field(item, "client_name"),
        package_name: string_field(item, "package_name"),
        event_date: string_field(item, "event_date"),
        guest_count: item
            .get("guest_count")
            .and_then(|v| v.as_n().ok())
            .and_then(|n| n.parse().ok())
            .unwrap_or(0),
        total_price: item
            .get("total_price")
            .and_then(|v| v.as_n().ok())
            .and_then(|n| n.parse().ok())
            .unwrap_or(0.0),
        customizations,
        requirements: string_field(item, "requirements"),
        status: item
            .get("status")
            .and_then(|v| v.as_s().ok())
            .and_then(|s| BookingStatus::parse(s))
            .unwrap_or(BookingStatus::Pending),
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

    #[test]
    fn cursor_round_trips_through_base64() {
        let mut map = HashMap::new();
        map.insert("PK".to_string(), "BOOKING".to_string());
        map.insert("SK".to_string(), "BOOKING#b1".to_string());
        map.insert("GSI1PK".to_string(), "BOOKING".to_string());
        map.insert("GSI1SK".to_string(), "2024-05-01T00:00:00Z".to_string());
        let cursor = PageCursor(map);
        let decoded = PageCursor::decode(&cursor.encode()).unwrap();
        assert_eq!(decoded, cursor);
    }

    #[test]
    fn cursor_decode_rejects_garbage() {
        assert!(PageCursor::decode("not base64!").is_err());
        assert!(PageCursor::decode(&URL_SAFE_NO_PAD.encode(b"[1,2,3]")).is_err());
    }

    #[test]
    fn has_more_iff_full_page() {
        assert!(page_has_more(PAGE_SIZE));
        assert!(!page_has_more(PAGE_SIZE - 1));
        assert!(!page_has_more(0));
    }

    #[test]
    fn unmappable_item_does_not_end_pagination() {
        let mut items = Vec::new();
        for i in 0..PAGE_SIZE {
            let mut item = HashMap::new();
            item.insert("PK".to_string(), AttributeValue::S("BOOKING".into()));
            item.insert(
                "SK".to_string(),
                AttributeValue::S(format!("BOOKING#b{}", i)),
            );
            item.insert("GSI1PK".to_string(), AttributeValue::S("BOOKING".into()));
            item.insert(
                "GSI1SK".to_string(),
                AttributeValue::S(format!("2024-01-{:02}T00:00:00Z", i + 1)),
            );
            items.push(item);
        }
        // One item with a foreign key shape drops from the records but
        // still counts toward the page size.
        items[3].insert("SK".to_string(), AttributeValue::S("UNKNOWN#x".into()));

        let page = page_from_items(&items, StatusFilter::All);
        assert_eq!(page.records.len(), PAGE_SIZE - 1);
        assert!(page.has_more);
        assert!(page.cursor.is_some());
    }

    #[test]
    fn status_filter_parses() {
        assert_eq!(StatusFilter::parse("all"), Some(StatusFilter::All));
        assert_eq!(
            StatusFilter::parse("awaiting-payment"),
            Some(StatusFilter::Only(BookingStatus::AwaitingPayment))
        );
        assert_eq!(StatusFilter::parse("bogus"), None);
    }

    #[test]
    fn booking_from_item_maps_fields() {
        let mut item = HashMap::new();
        item.insert("PK".to_string(), AttributeValue::S("BOOKING".into()));
        item.insert("SK".to_string(), AttributeValue::S("BOOKING#b1".into()));
        item.insert("client_id".to_string(), AttributeValue::S("c1".into()));
        item.insert("client_name".to_string(), AttributeValue::S("Jane Doe".into()));
        item.insert("package_name".to_string(), AttributeValue::S("Gold".into()));
        item.insert("event_date".to_string(), AttributeValue::S("2024-05-01".into()));
        item.insert("guest_count".to_string(), AttributeValue::N("50".into()));
        item.insert("total_price".to_string(), AttributeValue::N("500".into()));
        item.insert("status".to_string(), AttributeValue::S("confirmed".into()));
        item.insert(
            "customizations".to_string(),
            AttributeValue::L(vec![AttributeValue::M(HashMap::from([
                ("name".to_string(), AttributeValue::S("DJ".into())),
                ("category".to_string(), AttributeValue::S("music".into())),
            ]))]),
        );

        let booking = booking_from_item(&item).unwrap();
        assert_eq!(booking.booking_id, "b1");
        assert_eq!(booking.client_name, "Jane Doe");
        assert_eq!(booking.guest_count, 50);
        assert_eq!(booking.total_price, 500.0);
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.customizations[0].category, "music");
    }
}
