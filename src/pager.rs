use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page of a record set plus the numbers a pagination footer needs.
/// `start_index`/`end_index` are 1-based and both 0 for an empty set.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total_items.div_ceil(page_size).max(1)
}

/// Slices `items` into page `page` (1-based, clamped into range).
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let pages = total_pages(items.len(), page_size);
    let page = page.clamp(1, pages);
    let start = ((page - 1) * page_size).min(items.len());
    let end = (page * page_size).min(items.len());
    let (start_index, end_index) = if start == end { (0, 0) } else { (start + 1, end) };
    Page {
        items: &items[start..end],
        page,
        page_size,
        total_items: items.len(),
        total_pages: pages,
        start_index,
        end_index,
        has_prev: page > 1,
        has_next: page < pages,
    }
}

/// Current-page cursor. Navigation clamps instead of wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pager {
    /// `page_size` of zero is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    pub fn go_to(&mut self, page: usize, total_items: usize) -> usize {
        self.page = page.clamp(1, total_pages(total_items, self.page_size));
        self.page
    }

    pub fn next(&mut self, total_items: usize) -> usize {
        self.go_to(self.page + 1, total_items)
    }

    pub fn prev(&mut self, total_items: usize) -> usize {
        self.go_to(self.page.saturating_sub(1), total_items)
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> Page<'a, T> {
        paginate(items, self.page, self.page_size)
    }
}
