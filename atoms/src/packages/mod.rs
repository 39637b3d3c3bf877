pub mod model;
pub mod service;

pub use model::EventPackage;
pub use service::*;
