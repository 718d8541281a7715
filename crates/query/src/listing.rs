use serde::{Deserialize, Serialize};

use crate::page::PageRequest;
use crate::predicate::Predicate;
use crate::record::Record;
use crate::sort::{SortFields, SortOrder};

/// Filter, optional sort and optional page, applied in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub filter: Predicate,
    pub sort: Option<SortOrder>,
    pub page: Option<PageRequest>,
}

impl ListQuery {
    pub fn filtered(filter: Predicate) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn run<R: Record + Clone>(&self, items: &[R], sort_fields: &SortFields) -> Listing<R> {
        let mut matched: Vec<R> = self.filter.filter(items).into_iter().cloned().collect();
        if let Some(order) = self.sort {
            sort_fields.sort(&mut matched, order);
        }
        let total = matched.len();
        match self.page {
            Some(page) => Listing {
                total,
                page: page.page,
                per_page: page.per_page,
                total_pages: page.total_pages(total),
                items: page.slice(matched),
            },
            None => Listing {
                total,
                page: 1,
                per_page: total,
                total_pages: usize::from(total > 0),
                items: matched,
            },
        }
    }
}

/// One page of a filtered listing plus the numbers a pager needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

impl<T> Listing<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Listing<U> {
        Listing {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }
}
