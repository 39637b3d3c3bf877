use serde::{Deserialize, Serialize};

/// Client review of a vendor's work on a booking. Read-only mirror input
/// for the admin view.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Review {
    pub review_id: String,
    pub booking_id: String,
    pub vendor_id: String,
    pub client_name: String,
    pub rating: u32, // 1..=5
    pub comment: String,
    pub created_at: String,
}
