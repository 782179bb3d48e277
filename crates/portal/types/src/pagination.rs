//! Paginated list envelope

use serde::{Deserialize, Serialize};

/// `{items, total, page, pageSize}` list envelope.
///
/// Some endpoints return a bare JSON array instead; that is accepted as a
/// single page holding every item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PageBody<T>")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Paginated<T> {
    pub fn single_page(items: Vec<T>) -> Self {
        let total = items.len() as u64;
        Self {
            page_size: items.len() as u32,
            items,
            total,
            page: 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether pages after this one exist
    pub fn has_more(&self) -> bool {
        (self.page as u64) * (self.page_size as u64) < self.total
    }
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self::single_page(Vec::new())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageBody<T> {
    Page {
        items: Vec<T>,
        total: Option<u64>,
        page: Option<u32>,
        #[serde(rename = "pageSize")]
        page_size: Option<u32>,
    },
    Bare(Vec<T>),
}

impl<T> From<PageBody<T>> for Paginated<T> {
    fn from(body: PageBody<T>) -> Self {
        match body {
            PageBody::Page {
                items,
                total,
                page,
                page_size,
            } => Self {
                total: total.unwrap_or(items.len() as u64),
                page: page.unwrap_or(1),
                page_size: page_size.unwrap_or(items.len() as u32),
                items,
            },
            PageBody::Bare(items) => Self::single_page(items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope() {
        let page: Paginated<String> = serde_json::from_value(json!({
            "items": ["a", "b"], "total": 7, "page": 1, "pageSize": 2
        }))
        .unwrap();
        assert_eq!(page.items, vec!["a", "b"]);
        assert_eq!(page.total, 7);
        assert!(page.has_more());
    }

    #[test]
    fn test_bare_array() {
        let page: Paginated<u32> = serde_json::from_value(json!([1, 2, 3])).unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.page_size, 3);
        assert!(!page.has_more());
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(Paginated::single_page(vec![1])).unwrap();
        assert_eq!(value, json!({"items": [1], "total": 1, "page": 1, "pageSize": 1}));
    }
}
