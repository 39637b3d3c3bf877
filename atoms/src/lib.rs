pub mod activity;
pub mod bookings;
pub mod notifications;
pub mod packages;
pub mod reviews;
pub mod tasks;
pub mod users;
