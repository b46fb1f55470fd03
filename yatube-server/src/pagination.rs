use serde::Serialize;

pub const POSTS_PER_PAGE: usize = 10;

/// Where a requested page lands once clamped into the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: usize,
    pub num_pages: usize,
    pub offset: usize,
    pub limit: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    per_page: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(POSTS_PER_PAGE)
    }
}

impl Paginator {
    pub fn new(per_page: usize) -> Self {
        Self {
            per_page: per_page.max(1),
        }
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn num_pages(&self, total: usize) -> usize {
        total.div_ceil(self.per_page).max(1)
    }

    /// Resolves the raw `?page=` value. Missing or non-numeric values mean the
    /// first page; numbers outside `1..=num_pages` clamp to the nearest end.
    pub fn window(&self, total: usize, requested: Option<&str>) -> PageWindow {
        let num_pages = self.num_pages(total);
        let number = requested.map_or(1, |raw| page_number(raw.trim(), num_pages));
        let offset = (number - 1) * self.per_page;
        PageWindow {
            number,
            num_pages,
            offset,
            limit: self.per_page.min(total.saturating_sub(offset)),
        }
    }
}

fn page_number(raw: &str, num_pages: usize) -> usize {
    if let Ok(n) = raw.parse::<i64>() {
        return n.clamp(1, num_pages as i64) as usize;
    }
    // Digits too long for i64 still name a page past one of the ends.
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return 1;
    }
    if raw.starts_with('-') { 1 } else { num_pages }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub object_list: Vec<T>,
    pub number: usize,
    pub num_pages: usize,
    pub count: usize,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<usize>,
    pub previous_page_number: Option<usize>,
    pub start_index: usize,
    pub end_index: usize,
}

impl<T> Page<T> {
    pub fn new(window: PageWindow, count: usize, object_list: Vec<T>) -> Self {
        let has_next = window.number < window.num_pages;
        let has_previous = window.number > 1;
        let (start_index, end_index) = if object_list.is_empty() {
            (0, 0)
        } else {
            (window.offset + 1, window.offset + object_list.len())
        };
        Self {
            number: window.number,
            num_pages: window.num_pages,
            count,
            has_next,
            has_previous,
            next_page_number: has_next.then_some(window.number + 1),
            previous_page_number: has_previous.then_some(window.number - 1),
            start_index,
            end_index,
            object_list,
        }
    }

    pub fn len(&self) -> usize {
        self.object_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_list.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(total: usize, requested: Option<&str>) -> Page<usize> {
        let window = Paginator::default().window(total, requested);
        let object_list = (window.offset..window.offset + window.limit).collect();
        Page::new(window, total, object_list)
    }

    #[test]
    fn page_sizes_follow_min_rule() {
        for total in [0usize, 1, 9, 10, 11, 13, 20, 25, 101] {
            let paginator = Paginator::default();
            let pages = paginator.num_pages(total);
            for k in 1..=pages {
                let p = page(total, Some(&k.to_string()));
                let expected = POSTS_PER_PAGE.min(total.saturating_sub((k - 1) * POSTS_PER_PAGE));
                assert_eq!(p.len(), expected, "total={total} page={k}");
                assert_eq!(p.number, k);
            }
        }
    }

    #[test]
    fn missing_or_garbage_page_means_first() {
        assert_eq!(page(25, None).number, 1);
        assert_eq!(page(25, Some("abc")).number, 1);
        assert_eq!(page(25, Some("")).number, 1);
    }

    #[test]
    fn out_of_range_pages_clamp() {
        let last = page(25, Some("99"));
        assert_eq!(last.number, 3);
        assert_eq!(last.len(), 5);
        assert_eq!(page(25, Some("0")).number, 1);
        assert_eq!(page(25, Some("-4")).number, 1);
        assert_eq!(page(25, Some("99999999999999999999")).number, 3);
        assert_eq!(page(25, Some("+99999999999999999999")).number, 3);
        assert_eq!(page(25, Some("-99999999999999999999")).number, 1);
        assert_eq!(page(25, Some("9999999999999999999x")).number, 1);
    }

    #[test]
    fn empty_list_has_one_empty_page() {
        let p = page(0, Some("3"));
        assert_eq!(p.number, 1);
        assert_eq!(p.num_pages, 1);
        assert!(p.is_empty());
        assert!(!p.has_next);
        assert!(!p.has_previous);
        assert_eq!((p.start_index, p.end_index), (0, 0));
    }

    #[test]
    fn navigation_metadata() {
        let p = page(13, Some("2"));
        assert_eq!(p.object_list, vec![10, 11, 12]);
        assert!(p.has_previous);
        assert!(!p.has_next);
        assert_eq!(p.previous_page_number, Some(1));
        assert_eq!(p.next_page_number, None);
        assert_eq!((p.start_index, p.end_index), (11, 13));

        let first = page(13, Some("1"));
        assert!(first.has_next);
        assert_eq!(first.next_page_number, Some(2));
    }
}
