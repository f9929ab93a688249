use serde::{Deserialize, Serialize};

pub mod admin_dto;
pub mod application_dto;
pub mod auth_dto;
pub mod feedback_dto;
pub mod job_dto;
pub mod user_dto;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub results: Vec<T>,
    pub count: i64,
}

impl<T> ListResponse<T> {
    pub fn new(results: Vec<T>) -> Self {
        let count = results.len() as i64;
        Self { results, count }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub results: Vec<T>,
    pub count: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    pub fn new(results: Vec<T>, count: i64, page: Page) -> Self {
        Self {
            results,
            count,
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages(count),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            results: self.results.into_iter().map(f).collect(),
            count: self.count,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}

/// Resolved page window: page numbers start at 1, size is clamped to `1..=50`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub page_size: i64,
}

impl Page {
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn total_pages(&self, count: i64) -> i64 {
        if count == 0 {
            0
        } else {
            count.saturating_add(self.page_size - 1) / self.page_size
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Turns a stored upload path into the URL it is served from.
pub fn upload_url(path: &str) -> String {
    format!("/uploads/{}", path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_and_clamps() {
        assert_eq!(Page::new(None, None), Page { page: 1, page_size: 10 });
        assert_eq!(Page::new(Some(0), Some(500)).page_size, 50);
        assert_eq!(Page::new(Some(3), Some(20)).offset(), 40);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = Page::new(None, Some(10));
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(10), 1);
        assert_eq!(page.total_pages(11), 2);
    }

    #[test]
    fn huge_page_numbers_saturate_instead_of_overflowing() {
        let page = Page::new(Some(i64::MAX), Some(50));
        assert_eq!(page.offset(), i64::MAX);
        assert_eq!(Page::new(Some(i64::MAX), None).total_pages(3), 1);
        assert_eq!(Page::new(Some(i64::MIN), None).offset(), 0);
    }
}
