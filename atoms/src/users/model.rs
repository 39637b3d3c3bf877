use serde::{Deserialize, Serialize};

pub const ROLE_VENDOR: &str = "vendor";
pub const ROLE_ADMIN: &str = "admin";

/// Marketplace user. The admin workflow reads the vendor variant only; the
/// role field comes from the identity collaborator and is trusted verbatim.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub role: String, // "admin" | "client" | "vendor"
    pub status: String, // "active" | "suspended"
    pub created_at: String,
}
