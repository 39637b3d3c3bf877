// ========== BOOKING ==========
pub use festiva_atoms::bookings::model::{
    BookingRequest, BookingStatus, Customization, UpdateStatusPayload,
};

// ========== USER ==========
pub use festiva_atoms::users::model::User;

// ========== TASK ==========
pub use festiva_atoms::tasks::model::VendorTask;

// ========== REVIEW ==========
pub use festiva_atoms::reviews::model::Review;

// ========== PACKAGE ==========
pub use festiva_atoms::packages::model::EventPackage;

// ========== NOTIFICATION ==========
pub use festiva_atoms::notifications::model::Notification;

// ========== ACTIVITY ==========
pub use festiva_atoms::activity::model::{ActivityLogEntry, ActivityMeta};
