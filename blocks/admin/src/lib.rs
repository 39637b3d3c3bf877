//! Admin booking management: paginated booking lists, live collection
//! mirrors, vendor assignment, status updates, dashboard views and CSV
//! export.

pub mod assignment;
pub mod export;
pub mod mirrors;
pub mod pagination;
pub mod status;
pub mod types;
pub mod view;

pub use assignment::assign_vendor;
pub use export::{export_csv, CsvExport, CSV_HEADERS};
pub use mirrors::{CollectionSnapshot, LiveMirrors, MIRRORED_COLLECTIONS};
pub use pagination::BookingPager;
pub use status::{update_booking_status, InFlightGuard};
pub use types::{AssignError, ExportError, StatusError};
pub use view::{filter_bookings, required_categories, DashboardStats};
