use serde::{Deserialize, Serialize};

pub const MAX_PER_PAGE: i64 = 100;

/// `page` / `per_page` query parameters, shared by every paginated listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageParams {
    /// Clamp into a usable page: page >= 1, 1 <= per_page <= MAX_PER_PAGE.
    pub fn resolve(&self, default_per_page: i64) -> Page {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self
            .per_page
            .unwrap_or(default_per_page)
            .clamp(1, MAX_PER_PAGE);
        Page { page, per_page }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub page: i64,
    pub per_page: i64,
}

impl Page {
    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

/// Standard paginated response envelope.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub pages: i64,
    pub current_page: i64,
    pub per_page: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64, page: &Page) -> Self {
        Self {
            items,
            total,
            pages: total_pages(total, page.per_page),
            current_page: page.page,
            per_page: page.per_page,
        }
    }
}

fn total_pages(total: i64, per_page: i64) -> i64 {
    if total <= 0 {
        0
    } else {
        (total + per_page - 1) / per_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_applies_defaults_and_clamps() {
        let page = PageParams::default().resolve(15);
        assert_eq!((page.page, page.per_page), (1, 15));

        let page = PageParams { page: Some(0), per_page: Some(0) }.resolve(15);
        assert_eq!((page.page, page.per_page), (1, 1));

        let page = PageParams { page: Some(3), per_page: Some(500) }.resolve(15);
        assert_eq!((page.page, page.per_page), (3, MAX_PER_PAGE));
    }

    #[test]
    fn offset_follows_page() {
        let page = PageParams { page: Some(3), per_page: Some(15) }.resolve(15);
        assert_eq!(page.offset(), 30);
        assert_eq!(page.limit(), 15);
    }

    #[test]
    fn pages_round_up() {
        assert_eq!(total_pages(0, 15), 0);
        assert_eq!(total_pages(1, 15), 1);
        assert_eq!(total_pages(15, 15), 1);
        assert_eq!(total_pages(16, 15), 2);
    }

    #[test]
    fn envelope_carries_paging_fields() {
        let page = PageParams { page: Some(2), per_page: Some(10) }.resolve(10);
        let out = Paginated::new(vec![1, 2, 3], 23, &page);
        assert_eq!(out.total, 23);
        assert_eq!(out.pages, 3);
        assert_eq!(out.current_page, 2);
        assert_eq!(out.per_page, 10);
    }
}
