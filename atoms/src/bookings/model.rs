use serde::{Deserialize, Serialize};

/// Booking lifecycle states. Kebab-case on the wire; any status may follow
/// any other (the transition graph is deliberately unconstrained).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    Pending,
    AwaitingPayment,
    Confirmed,
    InProgress,
    Completed,
    Rejected,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 6] = [
        BookingStatus::Pending,
        BookingStatus::AwaitingPayment,
        BookingStatus::Confirmed,
        BookingStatus::InProgress,
        BookingStatus::Completed,
        BookingStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::AwaitingPayment => "awaiting-payment",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::InProgress => "in-progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Rejected => "rejected",
        }
    }

    /// Human-facing label: "awaiting-payment" reads "awaiting payment".
    pub fn label(&self) -> String {
        self.as_str().replace('-', " ")
    }

    pub fn parse(s: &str) -> Option<BookingStatus> {
        BookingStatus::ALL.iter().copied().find(|v| v.as_str() == s)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Customization {
    pub name: String,
    pub category: String,
}

/// Booking request domain model - created by the client-facing booking flow,
/// mutated here only through the admin status handler, never deleted.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BookingRequest {
    pub booking_id: String,
    pub client_id: String,
    pub client_name: String,
    pub package_name: String,
    pub event_date: String,
    pub guest_count: u32,
    pub total_price: f64,
    #[serde(default)]
    pub customizations: Vec<Customization>,
    #[serde(default)]
    pub requirements: String,
    pub status: BookingStatus,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusPayload {
    pub status: BookingStatus,
}

/// Normalize a stored event date to YYYY-MM-DD for availability checks and
/// the CSV export. Unparseable values render "Invalid Date".
pub fn format_event_date(raw: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }
    if let Ok(d) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.format("%Y-%m-%d").to_string();
    }
    "Invalid Date".to_string()
}
