pub mod model;
pub mod service;

pub use model::Review;
pub use service::*;
