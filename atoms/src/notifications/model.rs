use serde::{Deserialize, Serialize};

/// In-app notification addressed to one user. The unread-count panel on the
/// client side depends on this exact shape; is_read is flipped there, not
/// here.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Notification {
    pub notification_id: String,
    pub user_id: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: String,
    pub link: String,
}
