//! Limit/offset paging for list operations.

pub const DEFAULT_LIMIT: u64 = 20;

/// Page window requested by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u64,
    pub offset: u64,
}

impl Default for PageRequest {
    fn default() -> Self { Self { limit: DEFAULT_LIMIT, offset: 0 } }
}

/// One page of results.
///
/// `has_more` is true iff the page came back full. A last page that happens
/// to be exactly `limit` long therefore still reports more.
#[derive(Clone, Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_more: bool,
    pub limit: u64,
    pub offset: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, req: PageRequest) -> Self {
        let has_more = items.len() as u64 == req.limit;
        Self { items, has_more, limit: req.limit, offset: req.offset }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_are_sane() {
        let d = PageRequest::default();
        assert_eq!(d.limit, 20);
        assert_eq!(d.offset, 0);
    }

    #[test]
    fn full_page_reports_more() {
        let page = Page::new(vec![1, 2], PageRequest { limit: 2, offset: 4 });
        assert!(page.has_more);
        assert_eq!(page.offset, 4);
    }

    #[test]
    fn short_page_reports_end() {
        let page = Page::new(vec![1], PageRequest { limit: 2, offset: 0 });
        assert!(!page.has_more);
        let empty: Page<i32> = Page::new(vec![], PageRequest::default());
        assert!(!empty.has_more);
    }
}
