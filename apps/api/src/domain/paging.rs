use serde::Serialize;

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size a caller may request
pub const MAX_PAGE_SIZE: u32 = 2000;

/// Zero-based page request
///
/// # Example
/// ```
/// use member_query_api::domain::paging::PageRequest;
///
/// let page = PageRequest::new(2, 10);
/// assert_eq!(page.offset(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Creates a page request, clamping `size` to `1..=MAX_PAGE_SIZE`
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Builds a request from optional query parameters
    pub fn from_params(page: Option<u32>, size: Option<u32>) -> Self {
        Self::new(page.unwrap_or(0), size.unwrap_or(DEFAULT_PAGE_SIZE))
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of rows to skip
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    /// Number of rows to fetch
    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

/// One window of a result set together with the total row count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResults<T> {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub results: Vec<T>,
}

impl<T> QueryResults<T> {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// A page of content as returned by the HTTP API
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub total_elements: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: i64) -> Self {
        let size = i64::from(request.size());
        Self {
            content,
            number: request.page(),
            size: request.size(),
            total_elements,
            total_pages: (total_elements + size - 1) / size,
        }
    }
}

/// Derives the total row count from a fetched page when possible
///
/// Returns `None` when the page is full (or past the end), in which case a
/// count query is required.
pub fn derive_total(request: PageRequest, content_len: usize) -> Option<i64> {
    let len = content_len as i64;
    if request.offset() == 0 {
        if len < request.limit() {
            return Some(len);
        }
        return None;
    }
    if len != 0 && len < request.limit() {
        return Some(request.offset() + len);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_clamped() {
        assert_eq!(PageRequest::new(0, 0).size(), 1);
        assert_eq!(PageRequest::new(0, 10_000).size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn defaults_apply_to_missing_params() {
        let request = PageRequest::from_params(None, None);

        assert_eq!(request.page(), 0);
        assert_eq!(request.size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = Page::new(vec![1, 2], PageRequest::new(0, 2), 5);

        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn empty_result_has_zero_pages() {
        let page: Page<i32> = Page::new(vec![], PageRequest::new(0, 20), 0);

        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn short_first_page_is_the_total() {
        assert_eq!(derive_total(PageRequest::new(0, 10), 4), Some(4));
    }

    #[test]
    fn full_first_page_needs_count() {
        assert_eq!(derive_total(PageRequest::new(0, 10), 10), None);
    }

    #[test]
    fn short_last_page_adds_offset() {
        assert_eq!(derive_total(PageRequest::new(2, 10), 3), Some(23));
    }

    #[test]
    fn empty_page_past_the_end_needs_count() {
        assert_eq!(derive_total(PageRequest::new(5, 10), 0), None);
    }
}
