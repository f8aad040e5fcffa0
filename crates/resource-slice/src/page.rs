//! Pagination cursors, the paginated wire contract and list-query normalization.

use crate::resource::FilterSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Requested page cursor. Always `number >= 1` and `size >= 1` once normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(number: u32, size: u32) -> Self {
        Self {
            number: number.max(1),
            size: size.max(1),
        }
    }

    pub fn first(size: u32) -> Self {
        Self::new(1, size)
    }

    /// Caps the page size to `limits.max_size`.
    pub fn within(self, limits: PageLimits) -> Self {
        Self::new(self.number, self.size.min(limits.max_size.max(1)))
    }
}

/// Page size defaults and bounds applied by a slice before issuing a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_size: u32,
    pub max_size: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_size: 20,
            max_size: 100,
        }
    }
}

/// Pagination as kept in the slice state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_results: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        let limits = PageLimits::default();
        Self {
            page_number: 1,
            page_size: limits.default_size,
            total_pages: 0,
            total_results: 0,
        }
    }
}

impl Pagination {
    pub fn request(&self) -> PageRequest {
        PageRequest::new(self.page_number, self.page_size)
    }

    /// Recomputes `total_pages` after a local change to `total_results`.
    pub(crate) fn recount(&mut self, total_results: u64) {
        self.total_results = total_results;
        let size = u64::from(self.page_size.max(1));
        self.total_pages = u32::try_from(total_results.div_ceil(size)).unwrap_or(u32::MAX);
    }
}

/// Wire contract of `GET <resource>?...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub total: u64,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_results: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page_number: self.page_number,
            page_size: self.page_size,
            total_pages: self.total_pages,
            total_results: self.total_results,
        }
    }
}

/// A list request: typed filters plus the page cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery<F> {
    pub filters: F,
    pub page: PageRequest,
}

impl<F: FilterSet> ListQuery<F> {
    pub fn new(filters: F, page: PageRequest) -> Self {
        Self { filters, page }
    }

    /// Resolves this query against the filters currently in state: any change to the
    /// filters sends the request back to page 1.
    pub fn normalized(self, current: &F) -> Self {
        let page = if &self.filters != current {
            PageRequest::first(self.page.size)
        } else {
            self.page
        };
        Self {
            filters: self.filters,
            page,
        }
    }

    /// Query parameters: set filter fields followed by `pageNumber` and `pageSize`.
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = query_params(&self.filters);
        params.push(("pageNumber".to_string(), self.page.number.to_string()));
        params.push(("pageSize".to_string(), self.page.size.to_string()));
        params
    }
}

/// Flattens a filter record into query parameters, skipping unset (`null`) fields.
///
/// Arrays become repeated keys; nested objects are not expected in filter records and
/// are sent as their JSON text.
pub fn query_params<F: FilterSet>(filters: &F) -> Vec<(String, String)> {
    let Ok(Value::Object(map)) = serde_json::to_value(filters) else {
        return Vec::new();
    };
    let mut params = Vec::with_capacity(map.len());
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Array(values) => {
                for value in values {
                    if let Some(text) = scalar(&value) {
                        params.push((key.clone(), text));
                    }
                }
            }
            other => {
                if let Some(text) = scalar(&other) {
                    params.push((key, text));
                }
            }
        }
    }
    params
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Filters {
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<String>,
        counterpart_id: Option<u64>,
        tags: Vec<String>,
    }

    #[test]
    fn page_request_raises_zero_values() {
        let page = PageRequest::new(0, 0);
        assert_eq!(page, PageRequest { number: 1, size: 1 });
    }

    #[test]
    fn page_request_caps_size() {
        let limits = PageLimits {
            default_size: 20,
            max_size: 50,
        };
        assert_eq!(PageRequest::new(3, 500).within(limits).size, 50);
        assert_eq!(PageRequest::new(3, 10).within(limits).number, 3);
    }

    #[test]
    fn changed_filters_reset_to_first_page() {
        let current = Filters::default();
        let query = ListQuery::new(
            Filters {
                status: Some("open".into()),
                ..Default::default()
            },
            PageRequest::new(4, 20),
        );
        let normalized = query.normalized(&current);
        assert_eq!(normalized.page, PageRequest::new(1, 20));
    }

    #[test]
    fn same_filters_keep_requested_page() {
        let current = Filters {
            status: Some("open".into()),
            ..Default::default()
        };
        let query = ListQuery::new(current.clone(), PageRequest::new(4, 20));
        assert_eq!(query.normalized(&current).page.number, 4);
    }

    #[test]
    fn params_skip_unset_filters() {
        let filters = Filters {
            status: Some("open".into()),
            counterpart_id: None,
            tags: vec!["a".into(), "b".into()],
        };
        let params = ListQuery::new(filters, PageRequest::new(2, 10)).params();
        assert_eq!(
            params,
            vec![
                ("status".to_string(), "open".to_string()),
                ("tags".to_string(), "a".to_string()),
                ("tags".to_string(), "b".to_string()),
                ("pageNumber".to_string(), "2".to_string()),
                ("pageSize".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn recount_rounds_pages_up() {
        let mut pagination = Pagination {
            page_number: 1,
            page_size: 20,
            total_pages: 1,
            total_results: 20,
        };
        pagination.recount(21);
        assert_eq!(pagination.total_pages, 2);
        pagination.recount(0);
        assert_eq!(pagination.total_pages, 0);
    }

    #[test]
    fn response_decodes_camel_case() {
        let json = r#"{"data":[1,2],"total":2,"pageNumber":1,"pageSize":20,"totalPages":1,"totalResults":2}"#;
        let response: PaginatedResponse<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(response.data, vec![1, 2]);
        assert_eq!(response.pagination().total_results, 2);
    }
}
