use serde::Serialize;

use festiva_atoms::bookings::model::{BookingRequest, BookingStatus};
use festiva_atoms::users::model::{User, ROLE_VENDOR};

/// Case-insensitive substring filter over client and package names. An empty
/// search term matches everything.
pub fn filter_bookings<'a>(bookings: &'a [BookingRequest], search: &str) -> Vec<&'a BookingRequest> {
    let needle = search.trim().to_lowercase();
    bookings
        .iter()
        .filter(|b| {
            needle.is_empty()
                || b.client_name.to_lowercase().contains(&needle)
                || b.package_name.to_lowercase().contains(&needle)
        })
        .collect()
}

/// The categories a booking needs vendors for, in customization order,
/// deduplicated.
pub fn required_categories(booking: &BookingRequest) -> Vec<String> {
    let mut categories = Vec::new();
    for c in &booking.customizations {
        if !categories.contains(&c.category) {
            categories.push(c.category.clone());
        }
    }
    categories
}

/// Re-resolve a selected booking against a refreshed list.
pub fn reselect<'a>(bookings: &'a [BookingRequest], booking_id: &str) -> Option<&'a BookingRequest> {
    bookings.iter().find(|b| b.booking_id == booking_id)
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_bookings: usize,
    pub pending_bookings: usize,
    pub total_revenue: f64,
    pub active_vendors: usize,
}

impl DashboardStats {
    pub fn compute(bookings: &[BookingRequest], vendors: &[User]) -> DashboardStats {
        let pending_bookings = bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Pending)
            .count();
        // Rejected bookings never contribute revenue.
        let total_revenue = bookings
            .iter()
            .filter(|b| b.status != BookingStatus::Rejected)
            .map(|b| b.total_price)
            .sum();
        let active_vendors = vendors.iter().filter(|v| v.role == ROLE_VENDOR).count();

        DashboardStats {
            total_bookings: bookings.len(),
            pending_bookings,
            total_revenue,
            active_vendors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use festiva_atoms::bookings::model::Customization;

    fn booking(id: &str, client: &str, package: &str, status: BookingStatus, price: f64) -> BookingRequest {
        BookingRequest {
            booking_id: id.to_string(),
            client_id: "c1".to_string(),
            client_name: client.to_string(),
            package_name: package.to_string(),
            event_date: "2024-05-01".to_string(),
            guest_count: 50,
            total_price: price,
            customizations: Vec::new(),
            requirements: String::new(),
            status,
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn search_matches_either_name_case_insensitively() {
        let bookings = vec![
            booking("b1", "Jane Doe", "Gold Wedding", BookingStatus::Pending, 100.0),
            booking("b2", "John Roe", "Silver Gala", BookingStatus::Pending, 100.0),
        ];

        let hits = filter_bookings(&bookings, "jane");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].booking_id, "b1");

        let hits = filter_bookings(&bookings, "GALA");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].booking_id, "b2");

        assert_eq!(filter_bookings(&bookings, "").len(), 2);
        assert_eq!(filter_bookings(&bookings, "zzz").len(), 0);
    }

    #[test]
    fn revenue_excludes_rejected_bookings() {
        let bookings = vec![
            booking("b1", "A", "P1", BookingStatus::Confirmed, 100.0),
            booking("b2", "B", "P2", BookingStatus::Rejected, 999.0),
            booking("b3", "C", "P3", BookingStatus::Pending, 50.0),
        ];
        let vendors = vec![
            User {
                uid: "v1".to_string(),
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                role: "vendor".to_string(),
                status: "active".to_string(),
                created_at: "2024-01-01T00:00:00Z".to_string(),
            },
            User {
                uid: "u1".to_string(),
                name: "Root".to_string(),
                email: "root@example.com".to_string(),
                role: "admin".to_string(),
                status: "active".to_string(),
                created_at: "2024-01-01T00:00:00Z".to_string(),
            },
        ];

        let stats = DashboardStats::compute(&bookings, &vendors);
        assert_eq!(stats.total_bookings, 3);
        assert_eq!(stats.pending_bookings, 1);
        assert_eq!(stats.total_revenue, 150.0);
        assert_eq!(stats.active_vendors, 1);
    }

    #[test]
    fn required_categories_dedupe_preserving_order() {
        let mut b = booking("b1", "A", "P1", BookingStatus::Pending, 100.0);
        b.customizations = vec![
            Customization { name: "DJ".to_string(), category: "music".to_string() },
            Customization { name: "Buffet".to_string(), category: "catering".to_string() },
            Customization { name: "Live band".to_string(), category: "music".to_string() },
        ];
        assert_eq!(required_categories(&b), vec!["music", "catering"]);
    }

    #[test]
    fn reselect_finds_refreshed_record() {
        let bookings = vec![booking("b1", "A", "P1", BookingStatus::Pending, 100.0)];
        assert!(reselect(&bookings, "b1").is_some());
        assert!(reselect(&bookings, "b9").is_none());
    }
}
