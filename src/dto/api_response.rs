//! Sobre estándar de respuesta
//!
//! Toda respuesta de éxito es `{status: "success", message, data}`; los errores
//! usan el mismo sobre desde `AppError`.

use serde::Serialize;

/// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Página de resultados
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

/// Normalizar `page`/`per_page` y devolver `(page, per_page, offset)`
pub fn page_bounds(page: Option<i64>, per_page: Option<i64>) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
    (page, per_page, (page - 1).saturating_mul(per_page))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let body = serde_json::to_value(ApiResponse::success(42)).unwrap();
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"], 42);
        assert!(body["message"].is_null());
    }

    #[test]
    fn test_page_bounds() {
        assert_eq!(page_bounds(None, None), (1, 20, 0));
        assert_eq!(page_bounds(Some(3), Some(10)), (3, 10, 20));
        assert_eq!(page_bounds(Some(0), Some(1000)), (1, 100, 0));
    }

    #[test]
    fn test_page_bounds_huge_page_saturates() {
        let (page, per_page, offset) = page_bounds(Some(i64::MAX), Some(100));
        assert_eq!((page, per_page), (i64::MAX, 100));
        assert_eq!(offset, i64::MAX);
        assert!(offset >= 0);
    }
}
