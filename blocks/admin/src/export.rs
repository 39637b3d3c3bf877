use chrono::Utc;

use festiva_atoms::bookings::model::{format_event_date, BookingRequest};

use crate::types::ExportError;

/// Column order of the bookings report.
pub const CSV_HEADERS: [&str; 9] = [
    "Booking ID",
    "Client Name",
    "Package Name",
    "Event Date",
    "Status",
    "Guest Count",
    "Total Price",
    "Customizations",
    "Requirements",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

fn csv_row(booking: &BookingRequest) -> String {
    let customizations = booking
        .customizations
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    // Requirements is free text, so it is always quoted with internal
    // quotes doubled.
    let requirements = format!("\"{}\"", booking.requirements.replace('"', "\"\""));

    [
        booking.booking_id.clone(),
        booking.client_name.clone(),
        booking.package_name.clone(),
        format_event_date(&booking.event_date),
        booking.status.to_string(),
        booking.guest_count.to_string(),
        booking.total_price.to_string(),
        customizations,
        requirements,
    ]
    .join(",")
}

/// Render the visible booking rows as a CSV report.
pub fn export_csv(bookings: &[&BookingRequest]) -> Result<CsvExport, ExportError> {
    if bookings.is_empty() {
        return Err(ExportError::NoData);
    }

    let mut lines = Vec::with_capacity(bookings.len() + 1);
    lines.push(CSV_HEADERS.join(","));
    for booking in bookings {
        lines.push(csv_row(booking));
    }

    Ok(CsvExport {
        filename: format!("bookings-report-{}.csv", Utc::now().format("%Y-%m-%d")),
        content: lines.join("\n"),
    })
}
