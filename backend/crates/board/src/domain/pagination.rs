//! Feed pagination arithmetic

use crate::domain::value_objects::{Filter, MAX_PAGE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    pub total_records: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub page_size: i64,
    pub prev_page: Option<i64>,
    pub next_page: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPlan {
    pub offset: i64,
    pub limit: i64,
    pub meta: PageMeta,
}

/// Resolve a filter against the number of matching records.
///
/// The requested page is clamped into `1..=total_pages`, and there is
/// always at least one (possibly empty) page.
pub fn plan(filter: &Filter, total_matching: i64) -> FetchPlan {
    let limit = filter.page_size.clamp(1, MAX_PAGE_SIZE);
    let total_records = total_matching.max(0);
    let total_pages = (total_records / limit + i64::from(total_records % limit != 0)).max(1);
    let page = filter.page.clamp(1, total_pages);

    FetchPlan {
        offset: (page - 1) * limit,
        limit,
        meta: PageMeta {
            total_records,
            total_pages,
            current_page: page,
            page_size: limit,
            prev_page: (page > 1).then(|| page - 1),
            next_page: (page < total_pages).then(|| page + 1),
        },
    }
}
