use serde::{Deserialize, Serialize};

use crate::bookings::model::BookingRequest;
use crate::users::model::User;

/// Vendor task domain model - one unit of vendor work on a booking. Created
/// exclusively by the assignment engine; at most one exists per
/// (booking_id, category) pair.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VendorTask {
    pub task_id: String,
    pub booking_id: String,
    pub vendor_id: String,
    pub vendor_name: String,
    pub category: String, // free-form service category, e.g. "catering"
    pub title: String,
    pub description: String,
    pub status: String, // "assigned" | "in_progress" | "done"
    /// Denormalized copy of the booking's event date.
    pub event_date: String,
    /// Denormalized copy of the booking's requirements.
    pub client_requirements: String,
    pub created_at: String,
}

impl VendorTask {
    /// Build the task the assignment engine commits for a vendor/category
    /// pick on a booking.
    pub fn for_assignment(booking: &BookingRequest, vendor: &User, category: &str) -> VendorTask {
        let requirements = if booking.requirements.is_empty() {
            "No specific requirements provided.".to_string()
        } else {
            booking.requirements.clone()
        };

        VendorTask {
            task_id: uuid::Uuid::new_v4().to_string(),
            booking_id: booking.booking_id.clone(),
            vendor_id: vendor.uid.clone(),
            vendor_name: vendor.name.clone(),
            category: category.to_string(),
            title: format!("{} for {}", capitalize(category), booking.package_name),
            description: format!(
                "Handle {} for {}'s event.",
                category, booking.client_name
            ),
            status: "assigned".to_string(),
            event_date: booking.event_date.clone(),
            client_requirements: requirements,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
