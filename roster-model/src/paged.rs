//! Paged list results reconciled from response bodies and count headers.

use serde::{Deserialize, Serialize};

/// One page of rows together with the total number of matching rows
/// server-side across all pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub data: Vec<T>,
    #[serde(rename = "totalCount")]
    pub total_count: u64,
}

impl<T> PagedResult<T> {
    /// Normalize a raw list body plus the `X-Total-Count` header value.
    ///
    /// The header is parsed base-10; an absent or unparseable header
    /// degrades to a total of 0 rather than failing the query. Rows are
    /// passed through in server order, unmodified.
    pub fn from_parts(data: Vec<T>, total_count_header: Option<&str>) -> Self {
        let total_count = total_count_header
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(0);
        Self { data, total_count }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_count_header() {
        let page = PagedResult::from_parts(vec![1, 2, 3], Some("42"));
        assert_eq!(page.total_count, 42);
    }

    #[test]
    fn missing_header_defaults_to_zero() {
        let page = PagedResult::from_parts(vec![1], None);
        assert_eq!(page.total_count, 0);
    }

    #[test]
    fn unparseable_header_defaults_to_zero() {
        for raw in ["", "abc", "-3", "4.5"] {
            let page = PagedResult::from_parts(vec![1], Some(raw));
            assert_eq!(page.total_count, 0, "header {raw:?}");
        }
    }

    #[test]
    fn rows_are_echoed_unchanged_and_unreordered() {
        let rows = vec![30, 10, 20];
        let page = PagedResult::from_parts(rows.clone(), Some("3"));
        assert_eq!(page.data, rows);
    }
}
