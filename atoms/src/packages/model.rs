use serde::{Deserialize, Serialize};

/// Catalog entry clients book from. Managed by the catalog flow (out of
/// scope here); read-only mirror input for the admin view.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EventPackage {
    pub package_id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub description: String,
    pub created_at: String,
}
