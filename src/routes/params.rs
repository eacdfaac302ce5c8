use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        // Huge pages saturate and simply read past the end.
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

// Query strings can't go through `#[serde(flatten)]` (numbers arrive as
// strings), so the pagination fields are repeated here.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct OrderListRaw {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<String>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Default)]
pub struct OrderListQuery {
    pub pagination: Pagination,
    pub status: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl From<OrderListRaw> for OrderListQuery {
    fn from(raw: OrderListRaw) -> Self {
        Self {
            pagination: Pagination {
                page: raw.page,
                per_page: raw.per_page,
            },
            status: raw.status,
            sort_order: raw.sort_order,
        }
    }
}
