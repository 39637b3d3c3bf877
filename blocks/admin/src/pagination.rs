use aws_sdk_dynamodb::Client as DynamoClient;
use festiva_atoms::bookings::model::BookingRequest;
use festiva_atoms::bookings::service::{fetch_booking_page, BookingPage, PageCursor, StatusFilter};

/// Server-side paginator over the admin booking list. Pages are appended in
/// creation-time descending order; a short page ends pagination.
#[derive(Debug)]
pub struct BookingPager {
    pub bookings: Vec<BookingRequest>,
    pub filter: StatusFilter,
    cursor: Option<PageCursor>,
    has_more: bool,
    is_loading: bool,
}

impl Default for BookingPager {
    fn default() -> Self {
        BookingPager::new(StatusFilter::All)
    }
}

impl BookingPager {
    pub fn new(filter: StatusFilter) -> Self {
        BookingPager {
            bookings: Vec::new(),
            filter,
            cursor: None,
            has_more: false,
            is_loading: false,
        }
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Claim the next load-more slot. Returns the cursor to resume from, or
    /// None when the list is exhausted, a load is already running, or no page
    /// has been fetched yet.
    pub fn begin_load_more(&mut self) -> Option<PageCursor> {
        if !self.has_more || self.is_loading {
            return None;
        }
        let cursor = self.cursor.clone()?;
        self.is_loading = true;
        Some(cursor)
    }

    /// Append a fetched page and release the load-more slot.
    pub fn apply_page(&mut self, page: BookingPage) {
        self.bookings.extend(page.records);
        self.cursor = page.cursor;
        self.has_more = page.has_more;
        self.is_loading = false;
    }

    /// Replace the list with a fresh first page.
    pub fn apply_initial(&mut self, page: BookingPage) {
        self.bookings = page.records;
        self.cursor = page.cursor;
        self.has_more = page.has_more;
        self.is_loading = false;
    }

    /// Release the load-more slot after a failed fetch. The accumulated list
    /// is kept as-is so the next attempt resumes from the same cursor.
    pub fn fail_load(&mut self) {
        self.is_loading = false;
    }

    /// Fetch page one for the current filter, replacing the list.
    pub async fn load_initial(
        &mut self,
        client: &DynamoClient,
        table_name: &str,
    ) -> Result<(), String> {
        let page = fetch_booking_page(client, table_name, self.filter, None).await?;
        self.apply_initial(page);
        Ok(())
    }

    /// Fetch and append the next page, if one is available and no other load
    /// is in flight.
    pub async fn load_more(
        &mut self,
        client: &DynamoClient,
        table_name: &str,
    ) -> Result<bool, String> {
        let Some(cursor) = self.begin_load_more() else {
            return Ok(false);
        };
        match fetch_booking_page(client, table_name, self.filter, Some(&cursor)).await {
            Ok(page) => {
                self.apply_page(page);
                Ok(true)
            }
            Err(e) => {
                self.fail_load();
                Err(e)
            }
        }
    }

    /// Switch the status filter: the cursor is discarded and page one is
    /// refetched. On error the previous list stays visible.
    pub async fn set_filter(
        &mut self,
        client: &DynamoClient,
        table_name: &str,
        filter: StatusFilter,
    ) -> Result<(), String> {
        self.filter = filter;
        self.cursor = None;
        let page = fetch_booking_page(client, table_name, filter, None).await?;
        self.apply_initial(page);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use festiva_atoms::bookings::model::BookingStatus;
    use festiva_atoms::bookings::service::PAGE_SIZE;

    fn booking(id: &str, created_at: &str) -> BookingRequest {
        BookingRequest {
            booking_id: id.to_string(),
            client_id: "c1".to_string(),
            client_name: "Jane Doe".to_string(),
            package_name: "Gold".to_string(),
            event_date: "2024-05-01".to_string(),
            guest_count: 50,
            total_price: 500.0,
            customizations: Vec::new(),
            requirements: String::new(),
            status: BookingStatus::Pending,
            created_at: created_at.to_string(),
        }
    }

    fn full_page(start: usize) -> BookingPage {
        let records: Vec<_> = (start..start + PAGE_SIZE)
            .map(|i| booking(&format!("b{}", i), &format!("2024-01-{:02}T00:00:00Z", 28 - i)))
            .collect();
        // "e30" is base64 for "{}": an empty but well-formed cursor.
        let cursor = PageCursor::decode("e30").ok();
        BookingPage {
            records,
            cursor,
            has_more: true,
        }
    }

    fn short_page() -> BookingPage {
        BookingPage {
            records: vec![booking("last", "2024-01-01T00:00:00Z")],
            cursor: None,
            has_more: false,
        }
    }

    #[test]
    fn load_more_appends_without_duplicates() {
        let mut pager = BookingPager::default();
        pager.apply_initial(full_page(0));
        assert_eq!(pager.bookings.len(), PAGE_SIZE);
        assert!(pager.has_more());

        let cursor = pager.begin_load_more();
        assert!(cursor.is_some());
        pager.apply_page(full_page(PAGE_SIZE));
        assert_eq!(pager.bookings.len(), 2 * PAGE_SIZE);

        let ids: std::collections::HashSet<_> =
            pager.bookings.iter().map(|b| b.booking_id.clone()).collect();
        assert_eq!(ids.len(), pager.bookings.len());
    }

    #[test]
    fn short_page_ends_pagination() {
        let mut pager = BookingPager::default();
        pager.apply_initial(full_page(0));
        pager.begin_load_more();
        pager.apply_page(short_page());
        assert!(!pager.has_more());
        assert!(pager.begin_load_more().is_none());
    }

    #[test]
    fn load_more_is_inert_before_first_page() {
        let mut pager = BookingPager::default();
        assert!(pager.begin_load_more().is_none());
        assert!(pager.bookings.is_empty());
    }

    #[test]
    fn concurrent_load_more_is_rejected() {
        let mut pager = BookingPager::default();
        pager.apply_initial(full_page(0));

        assert!(pager.begin_load_more().is_some());
        // Second trigger while the first is still in flight.
        assert!(pager.begin_load_more().is_none());

        pager.apply_page(full_page(PAGE_SIZE));
        assert_eq!(pager.bookings.len(), 2 * PAGE_SIZE);
        assert!(pager.begin_load_more().is_some());
    }

    #[test]
    fn failed_load_keeps_list_and_releases_guard() {
        let mut pager = BookingPager::default();
        pager.apply_initial(full_page(0));
        let before = pager.bookings.len();

        pager.begin_load_more();
        pager.fail_load();
        assert_eq!(pager.bookings.len(), before);
        assert!(pager.begin_load_more().is_some());
    }
}
