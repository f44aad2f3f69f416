//! Response types shared across endpoints.

use serde::Deserialize;

/// Pagination block attached to list responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub filtered_total: Option<u64>,
}

impl PageInfo {
    /// Whether a next page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_next_compares_page_numbers() {
        let page: PageInfo = serde_json::from_str(r#"{"page":1,"pages":3}"#).unwrap();
        assert!(page.has_next());
        let page: PageInfo = serde_json::from_str(r#"{"page":3,"pages":3}"#).unwrap();
        assert!(!page.has_next());
    }
}
