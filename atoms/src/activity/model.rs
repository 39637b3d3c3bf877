use serde::{Deserialize, Serialize};

use crate::bookings::model::BookingRequest;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ActivityMeta {
    pub booking_id: String,
    pub vendor_name: String,
    pub client_name: String,
}

/// Append-only audit trail entry. One is committed atomically alongside
/// every vendor assignment.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ActivityLogEntry {
    pub log_id: String,
    pub message: String,
    pub timestamp: String,
    pub meta: ActivityMeta,
}

impl ActivityLogEntry {
    pub fn for_assignment(
        booking: &BookingRequest,
        vendor_name: &str,
        category: &str,
    ) -> ActivityLogEntry {
        ActivityLogEntry {
            log_id: uuid::Uuid::new_v4().to_string(),
            message: format!(
                "Admin assigned {} to the {} task for \"{}\".",
                vendor_name, category, booking.package_name
            ),
            timestamp: chrono::Utc::now().to_rfc3339(),
            meta: ActivityMeta {
                booking_id: booking.booking_id.clone(),
                vendor_name: vendor_name.to_string(),
                client_name: booking.client_name.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookings::model::BookingStatus;

    #[test]
    fn assignment_entry_names_vendor_and_package() {
        let booking = BookingRequest {
            booking_id: "b1".to_string(),
            client_id: "c1".to_string(),
            client_name: "Jane Doe".to_string(),
            package_name: "Gold".to_string(),
            event_date: "2024-05-01".to_string(),
            guest_count: 50,
            total_price: 500.0,
            customizations: vec![],
            requirements: String::new(),
            status: BookingStatus::Pending,
            created_at: "2024-01-01T00:00:00Z".to_string(),
        };
        let entry = ActivityLogEntry::for_assignment(&booking, "Acme Catering", "catering");
        assert_eq!(
            entry.message,
            "Admin assigned Acme Catering to the catering task for \"Gold\"."
        );
        assert_eq!(entry.meta.booking_id, "b1");
        assert_eq!(entry.meta.client_name, "Jane Doe");
    }
}
