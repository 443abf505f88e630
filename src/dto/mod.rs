pub mod admin_dto;
pub mod application_dto;
pub mod auth_dto;
pub mod document_dto;
pub mod employer_dto;
pub mod job_dto;
pub mod upload_dto;
pub mod worker_dto;

use serde::{Deserialize, Serialize};
use validator::ValidationError;

/// Pagination envelope shared by every listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, per_page: i64) -> Self {
        let total_pages = ((total as f64) / (per_page as f64)).ceil() as i64;
        Self {
            items,
            total,
            page,
            per_page,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListResponse<U> {
        ListResponse {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }
}

/// Page/per-page pair every list query embeds.
#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    pub page: i64,
    pub per_page: i64,
}

impl PageParams {
    pub fn clamp(page: Option<i64>, per_page: Option<i64>, default_per_page: i64) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(default_per_page).clamp(1, 100),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

pub fn one_of(value: &str, allowed: &[&str], code: &'static str) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_params_are_clamped() {
        let p = PageParams::clamp(None, None, 20);
        assert_eq!((p.page, p.per_page), (1, 20));

        let p = PageParams::clamp(Some(0), Some(500), 20);
        assert_eq!((p.page, p.per_page), (1, 100));

        let p = PageParams::clamp(Some(3), Some(10), 20);
        assert_eq!(p.offset(), 20);
    }

    #[test]
    fn list_response_computes_pages() {
        let resp = ListResponse::new(vec![1, 2, 3], 45, 2, 20);
        assert_eq!(resp.total_pages, 3);
        let mapped = resp.map(|n| n * 2);
        assert_eq!(mapped.items, vec![2, 4, 6]);
    }
}
