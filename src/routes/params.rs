use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::{OrderStatus, PaymentStatus};

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

// Query strings cannot go through `#[serde(flatten)]` with numeric fields, so
// every list query carries `page`/`per_page` itself.
macro_rules! paginated {
    ($($query:ty),* $(,)?) => {
        $(
            impl $query {
                pub fn pagination(&self) -> Pagination {
                    Pagination {
                        page: self.page,
                        per_page: self.per_page,
                    }
                }
            }
        )*
    };
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ShopListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Case-insensitive match on name or slug.
    pub q: Option<String>,
    pub sort_order: Option<SortOrder>,
}

/// Lists of rows that belong to a shop (products, collections, pages, customers, images).
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ShopScopedQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub shop_id: Option<String>,
    pub q: Option<String>,
    pub sort_order: Option<SortOrder>,
}

/// Lists of rows that belong to a page (heroes, content blocks).
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageScopedQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub page_id: Option<String>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub shop_id: Option<String>,
    pub customer_id: Option<String>,
    pub status: Option<OrderStatus>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaymentListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub order_id: Option<String>,
    pub status: Option<PaymentStatus>,
    pub sort_order: Option<SortOrder>,
}

paginated!(
    ShopListQuery,
    ShopScopedQuery,
    PageScopedQuery,
    OrderListQuery,
    PaymentListQuery,
);

/// Non-empty search term as an `ILIKE` pattern. `%`, `_` and `\\` in the input
/// match literally.
pub fn search_term(q: &Option<String>) -> Option<String> {
    q.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let mut pattern = String::with_capacity(s.len() + 2);
            pattern.push('%');
            for c in s.chars() {
                if matches!(c, '%' | '_' | '\\') {
                    pattern.push('\\');
                }
                pattern.push(c);
            }
            pattern.push('%');
            pattern
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_clamps() {
        assert_eq!(Pagination::default().normalize(), (1, 20, 0));
        let p = Pagination {
            page: Some(0),
            per_page: Some(1000),
        };
        assert_eq!(p.normalize(), (1, 100, 0));
        let p = Pagination {
            page: Some(3),
            per_page: Some(10),
        };
        assert_eq!(p.normalize(), (3, 10, 20));
    }

    #[test]
    fn huge_page_does_not_overflow_offset() {
        let p = Pagination {
            page: Some(i64::MAX),
            per_page: Some(100),
        };
        let (page, per_page, offset) = p.normalize();
        assert_eq!((page, per_page), (i64::MAX, 100));
        assert_eq!(offset, i64::MAX);
    }

    #[test]
    fn blank_search_is_ignored() {
        assert_eq!(search_term(&None), None);
        assert_eq!(search_term(&Some("  ".into())), None);
        assert_eq!(search_term(&Some(" mug ".into())), Some("%mug%".to_string()));
    }

    #[test]
    fn search_wildcards_match_literally() {
        assert_eq!(search_term(&Some("_".into())), Some(r"%\_%".to_string()));
        assert_eq!(
            search_term(&Some(r"50%\off".into())),
            Some(r"%50\%\\off%".to_string())
        );
    }
}
