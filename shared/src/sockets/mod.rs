pub mod connections;
pub mod messages;
pub mod push;

pub use connections::*;
pub use messages::*;
pub use push::*;
