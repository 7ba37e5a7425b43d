//! Page arithmetic for feeds.

/// Number of posts shown on every feed page.
pub const PAGE_SIZE: u64 = 10;

/// Resolve a raw `?page=` value against the total item count.
///
/// Missing or non-integer values select the first page. Any integer outside
/// `1..=num_pages` (zero, negative, past the end, too large to represent)
/// selects the last page. An empty listing still has one (empty) page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u64,
    pub num_pages: u64,
    pub size: u64,
}

impl PageRequest {
    pub fn resolve(raw: Option<&str>, total: u64, size: u64) -> Self {
        let num_pages = total.div_ceil(size).max(1);
        let number = match requested_number(raw) {
            Some(n) if n <= num_pages => n,
            _ => num_pages,
        };

        Self {
            number,
            num_pages,
            size,
        }
    }

    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.size
    }

    pub fn limit(&self) -> u64 {
        self.size
    }
}

/// The page a raw `?page=` value asks for, before it is checked against the
/// listing: `Some(1)` for missing or non-integer values, `Some(n)` for a
/// positive integer, `None` for integers no page can carry.
pub fn requested_number(raw: Option<&str>) -> Option<u64> {
    match raw.map(str::trim).filter(|raw| is_integer(raw)) {
        None => Some(1),
        Some(raw) => raw.parse::<u64>().ok().filter(|n| *n >= 1),
    }
}

fn is_integer(raw: &str) -> bool {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// One page of a feed.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            number: request.number,
            num_pages: request.num_pages,
            total,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn previous_page_number(&self) -> u64 {
        self.number.saturating_sub(1).max(1)
    }

    pub fn next_page_number(&self) -> u64 {
        (self.number + 1).min(self.num_pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset() {
        let page = PageRequest::resolve(Some("2"), 13, PAGE_SIZE);

        assert_eq!(page.number, 2);
        assert_eq!(page.num_pages, 2);
        assert_eq!(page.offset(), 10);
        assert_eq!(page.limit(), 10);
    }

    #[test]
    fn test_out_of_range_returns_last_page() {
        assert_eq!(PageRequest::resolve(Some("99"), 13, PAGE_SIZE).number, 2);
        assert_eq!(PageRequest::resolve(Some("0"), 13, PAGE_SIZE).number, 2);
        assert_eq!(PageRequest::resolve(Some("-3"), 13, PAGE_SIZE).number, 2);
        assert_eq!(
            PageRequest::resolve(Some("99999999999999999999999"), 13, PAGE_SIZE).number,
            2
        );
    }

    #[test]
    fn test_invalid_page_returns_first_page() {
        assert_eq!(PageRequest::resolve(Some("abc"), 13, PAGE_SIZE).number, 1);
        assert_eq!(PageRequest::resolve(Some("1.5"), 13, PAGE_SIZE).number, 1);
        assert_eq!(PageRequest::resolve(Some(""), 13, PAGE_SIZE).number, 1);
        assert_eq!(PageRequest::resolve(None, 13, PAGE_SIZE).number, 1);
        assert_eq!(PageRequest::resolve(Some(" 2 "), 13, PAGE_SIZE).number, 2);
    }

    #[test]
    fn test_requested_number() {
        assert_eq!(requested_number(None), Some(1));
        assert_eq!(requested_number(Some("abc")), Some(1));
        assert_eq!(requested_number(Some("+3")), Some(3));
        assert_eq!(requested_number(Some("0")), None);
        assert_eq!(requested_number(Some("-2")), None);
        assert_eq!(requested_number(Some("99999999999999999999999")), None);
    }

    #[test]
    fn test_empty_listing_has_one_page() {
        let request = PageRequest::resolve(Some("3"), 0, PAGE_SIZE);
        let page: Page<()> = Page::new(Vec::new(), request, 0);

        assert_eq!(page.number, 1);
        assert_eq!(page.num_pages, 1);
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }
}
