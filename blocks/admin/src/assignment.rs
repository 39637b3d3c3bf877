use aws_sdk_dynamodb::types::{Put, TransactWriteItem};
use aws_sdk_dynamodb::Client as DynamoClient;

use festiva_atoms::activity::model::ActivityLogEntry;
use festiva_atoms::activity::service::log_item;
use festiva_atoms::bookings::model::{format_event_date, BookingRequest};
use festiva_atoms::tasks::model::VendorTask;
use festiva_atoms::tasks::service::{find_assignment, task_item};
use festiva_atoms::users::model::User;
use festiva_atoms::users::service::get_unavailable_dates;

use crate::types::AssignError;

/// Validate whether `vendor` may take the `category` task for `booking`.
/// Pure precondition checks, separated from the write so they can be tested
/// without a table.
pub fn check_assignment(
    current_tasks: &[VendorTask],
    booking: &BookingRequest,
    vendor: &User,
    category: &str,
    unavailable_dates: &[String],
) -> Result<(), AssignError> {
    if find_assignment(current_tasks, &booking.booking_id, category).is_some() {
        return Err(AssignError::AlreadyAssigned(category.to_string()));
    }

    let event_day = format_event_date(&booking.event_date);
    if unavailable_dates.iter().any(|d| d == &event_day) {
        return Err(AssignError::VendorUnavailable {
            vendor: vendor.name.clone(),
            date: event_day,
        });
    }

    Ok(())
}

/// Assign a vendor to one category of a booking. The task record and the
/// audit-trail entry land in a single transaction: either both are written
/// or neither is.
pub async fn assign_vendor(
    client: &DynamoClient,
    table_name: &str,
    current_tasks: &[VendorTask],
    vendors: &[User],
    booking: &BookingRequest,
    vendor_id: &str,
    category: &str,
) -> Result<VendorTask, AssignError> {
    let vendor = vendors
        .iter()
        .find(|v| v.uid == vendor_id)
        .ok_or(AssignError::UnknownVendor)?;

    let unavailable = get_unavailable_dates(client, table_name, vendor_id).await;
    check_assignment(current_tasks, booking, vendor, category, &unavailable)?;

    let task = VendorTask::for_assignment(booking, vendor, category);
    let entry = ActivityLogEntry::for_assignment(booking, &vendor.name, category);

    let task_put = Put::builder()
        .table_name(table_name)
        .set_item(Some(task_item(&task)))
        .build()
        .map_err(|e| AssignError::WriteFailed(format!("task put: {}", e)))?;
    let log_put = Put::builder()
        .table_name(table_name)
        .set_item(Some(log_item(&entry)))
        .build()
        .map_err(|e| AssignError::WriteFailed(format!("log put: {}", e)))?;

    client
        .transact_write_items()
        .transact_items(TransactWriteItem::builder().put(task_put).build())
        .transact_items(TransactWriteItem::builder().put(log_put).build())
        .send()
        .await
        .map_err(|e| AssignError::WriteFailed(format!("DynamoDB transaction error: {}", e)))?;

    tracing::info!(
        "Assigned {} to {} for booking {}",
        vendor.name,
        category,
        booking.booking_id
    );

    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use festiva_atoms::bookings::model::BookingStatus;

    fn booking() -> BookingRequest {
        BookingRequest {
            booking_id: "b1".to_string(),
            client_id: "c1".to_string(),
            client_name: "Jane Doe".to_string(),
            package_name: "Gold Wedding".to_string(),
            event_date: "2024-06-15T00:00:00Z".to_string(),
            guest_count: 120,
            total_price: 4800.0,
            customizations: Vec::new(),
            requirements: String::new(),
            status: BookingStatus::Confirmed,
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn vendor(uid: &str, name: &str) -> User {
        User {
            uid: uid.to_string(),
            name: name.to_string(),
            email: format!("{}@example.com", uid),
            role: "vendor".to_string(),
            status: "active".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn duplicate_category_is_rejected() {
        let existing = VendorTask::for_assignment(&booking(), &vendor("v1", "Ada"), "catering");
        let err = check_assignment(&[existing], &booking(), &vendor("v2", "Grace"), "catering", &[])
            .unwrap_err();
        assert!(matches!(err, AssignError::AlreadyAssigned(c) if c == "catering"));
    }

    #[test]
    fn same_category_other_booking_is_allowed() {
        let mut other = booking();
        other.booking_id = "b2".to_string();
        let existing = VendorTask::for_assignment(&other, &vendor("v1", "Ada"), "catering");
        assert!(
            check_assignment(&[existing], &booking(), &vendor("v2", "Grace"), "catering", &[])
                .is_ok()
        );
    }

    #[test]
    fn unavailable_vendor_is_rejected_with_named_date() {
        let dates = vec!["2024-06-15".to_string()];
        let err = check_assignment(&[], &booking(), &vendor("v1", "Ada"), "catering", &dates)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Ada is unavailable on 2024-06-15. Please choose another vendor."
        );
    }

    #[test]
    fn free_date_passes() {
        let dates = vec!["2024-06-14".to_string()];
        assert!(check_assignment(&[], &booking(), &vendor("v1", "Ada"), "catering", &dates).is_ok());
    }
}
