pub mod model;
pub mod service;

pub use model::{ActivityLogEntry, ActivityMeta};
pub use service::*;
