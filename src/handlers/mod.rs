// ABOUTME: HTTP handlers for the public and admin API, one module per resource
// ABOUTME: Shared pagination parsing and not-found helpers live here

pub mod contacts;
pub mod events;
pub mod faqs;
pub mod gallery;
pub mod news;
pub mod partnerships;
pub mod programs;
pub mod search;
pub mod stats;
pub mod static_content;
pub mod system;
pub mod team;

use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::types::SuccessResponse;
use crate::validate::Checks;

/// Largest page whose offset still fits the store's signed skip.
fn max_page(max_size: u64) -> u64 {
    (i64::MAX as u64) / max_size.max(1)
}

/// `page` and `page_size` query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl Pagination {
    /// Applies defaults and bounds; out-of-range values are a 422.
    pub fn resolve(&self, default_size: u64, max_size: u64) -> Result<(u64, u64)> {
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(default_size);
        Checks::new()
            .range("page", page, 1, max_page(max_size))
            .range("page_size", page_size, 1, max_size)
            .finish()?;
        Ok((page, page_size))
    }
}

pub fn found<T>(value: Option<T>, noun: &str) -> Result<T> {
    value.ok_or_else(|| AppError::NotFound(format!("{} not found", noun)))
}

pub fn deleted(removed: bool, noun: &str) -> Result<Json<SuccessResponse>> {
    if removed {
        Ok(Json(SuccessResponse::new(format!("{} deleted successfully", noun))))
    } else {
        Err(AppError::NotFound(format!("{} not found", noun)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults_and_bounds() {
        assert_eq!(Pagination::default().resolve(10, 50).unwrap(), (1, 10));

        let too_big = Pagination {
            page: Some(1),
            page_size: Some(51),
        };
        assert!(matches!(too_big.resolve(10, 50), Err(AppError::Validation(_))));

        let zero_page = Pagination {
            page: Some(0),
            page_size: None,
        };
        assert!(matches!(zero_page.resolve(10, 50), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_huge_page_is_rejected() {
        let huge = Pagination {
            page: Some(u64::MAX),
            page_size: None,
        };
        match huge.resolve(50, 100) {
            Err(AppError::Validation(errors)) => assert_eq!(errors[0].field, "page"),
            other => panic!("expected validation error, got {:?}", other),
        }

        let last = Pagination {
            page: Some(max_page(100)),
            page_size: Some(100),
        };
        assert!(last.resolve(50, 100).is_ok());
    }
}
