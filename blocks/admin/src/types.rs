use thiserror::Error;

/// Errors produced while assigning a vendor to a booking category.
#[derive(Debug, Error)]
pub enum AssignError {
    #[error("No vendor selected.")]
    UnknownVendor,
    #[error("A vendor is already assigned to the {0} category for this booking.")]
    AlreadyAssigned(String),
    #[error("{vendor} is unavailable on {date}. Please choose another vendor.")]
    VendorUnavailable { vendor: String, date: String },
    #[error("Failed to assign vendor. Please try again.")]
    WriteFailed(String),
}

/// Errors produced while updating a booking's status.
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("An update for this booking is already in progress.")]
    UpdateInFlight,
    #[error("Failed to update status.")]
    UpdateFailed(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No data to export.")]
    NoData,
}
