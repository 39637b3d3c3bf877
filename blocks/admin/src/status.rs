use aws_sdk_dynamodb::Client as DynamoClient;
use std::collections::HashSet;
use std::sync::Mutex;

use festiva_atoms::bookings::model::{BookingRequest, BookingStatus};
use festiva_atoms::bookings::service;
use festiva_atoms::notifications::service::create_notification;

use crate::types::StatusError;

/// Per-booking guard against overlapping status updates. Guards are advisory:
/// the slot is held for the duration of one update and released on any exit.
#[derive(Debug, Default)]
pub struct InFlightGuard {
    updating: Mutex<HashSet<String>>,
}

impl InFlightGuard {
    pub fn new() -> Self {
        InFlightGuard::default()
    }

    /// Claim the update slot for a booking. Returns false if an update for
    /// that booking is already running.
    pub fn try_begin(&self, booking_id: &str) -> bool {
        match self.updating.lock() {
            Ok(mut set) => set.insert(booking_id.to_string()),
            Err(_) => false,
        }
    }

    pub fn finish(&self, booking_id: &str) {
        if let Ok(mut set) = self.updating.lock() {
            set.remove(booking_id);
        }
    }

    pub fn is_updating(&self, booking_id: &str) -> bool {
        match self.updating.lock() {
            Ok(set) => set.contains(booking_id),
            Err(_) => true,
        }
    }
}

/// The client-facing text for a status change notification.
pub fn notification_message(package_name: &str, status: BookingStatus) -> String {
    format!(
        "The status of your booking for \"{}\" has been updated to {}.",
        package_name,
        status.label()
    )
}

/// Update a booking's status and notify the client. The notification is
/// best-effort: a failed write there is logged and the update still counts
/// as a success.
pub async fn update_booking_status(
    client: &DynamoClient,
    table_name: &str,
    guard: &InFlightGuard,
    booking: &BookingRequest,
    new_status: BookingStatus,
) -> Result<(), StatusError> {
    if !guard.try_begin(&booking.booking_id) {
        return Err(StatusError::UpdateInFlight);
    }

    let result = service::update_booking_status(client, table_name, &booking.booking_id, new_status)
        .await;
    if let Err(e) = result {
        guard.finish(&booking.booking_id);
        return Err(StatusError::UpdateFailed(e));
    }

    let message = notification_message(&booking.package_name, new_status);
    let link = format!("/booking/{}", booking.booking_id);
    let notified = create_notification(client, table_name, &booking.client_id, &message, &link)
        .await
        .map(|_| ());

    guard.finish(&booking.booking_id);
    resolve_notification(&booking.booking_id, notified)
}

/// Settle the notification half of a status update. The store write has
/// already committed at this point, so a failed notification is logged and
/// the update still reports success.
fn resolve_notification(booking_id: &str, result: Result<(), String>) -> Result<(), StatusError> {
    if let Err(e) = result {
        tracing::warn!(
            "Status for booking {} updated but notification failed: {}",
            booking_id,
            e
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_admits_one_update_per_booking() {
        let guard = InFlightGuard::new();
        assert!(guard.try_begin("b1"));
        assert!(!guard.try_begin("b1"));
        assert!(guard.is_updating("b1"));

        // A different booking is unaffected.
        assert!(guard.try_begin("b2"));

        guard.finish("b1");
        assert!(!guard.is_updating("b1"));
        assert!(guard.try_begin("b1"));
    }

    #[test]
    fn failed_notification_does_not_undo_the_update() {
        assert!(resolve_notification("b1", Err("DynamoDB put_item error".to_string())).is_ok());
        assert!(resolve_notification("b1", Ok(())).is_ok());
    }

    #[test]
    fn notification_text_uses_display_label() {
        assert_eq!(
            notification_message("Gold Wedding", BookingStatus::AwaitingPayment),
            "The status of your booking for \"Gold Wedding\" has been updated to awaiting payment."
        );
        assert_eq!(
            notification_message("Gala", BookingStatus::Confirmed),
            "The status of your booking for \"Gala\" has been updated to confirmed."
        );
    }
}
