//! Offset/limit pagination windows for list responses.
//!
//! [`compute_window`] derives the adjacent pages of the current one;
//! [`PageWindow::links`] renders them as query-string links for the
//! `next`/`previous` fields of a list envelope.

/// Offset and limit of an adjacent page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRef {
    /// Zero-based index of the first item.
    pub offset: i64,
    /// Maximum number of items requested.
    pub limit: i64,
}

/// Next and previous pages around the current one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageWindow {
    /// Page following the current one, if any items remain.
    pub next: Option<PageRef>,
    /// Page preceding the current one, if the current page does not start at `0`.
    pub previous: Option<PageRef>,
}

/// Rendered `next`/`previous` links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    /// Link to the next page.
    pub next: Option<String>,
    /// Link to the previous page.
    pub previous: Option<String>,
}

impl PageWindow {
    /// Window with neither a next nor a previous page.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            next: None,
            previous: None,
        }
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Render the window as links below `base`.
    ///
    /// Each link is `base?offset=N&limit=M` followed by `extra` query
    /// parameters in order. Values are percent-encoded; empty values are kept.
    /// A `base` that already has a query string is extended with `&`.
    ///
    /// # Examples
    ///
    /// ```
    /// use apim_rest::compute_window;
    ///
    /// let links = compute_window(0, 10, 25).links("/apis", &[("query", "name:pet store")]);
    /// assert_eq!(
    ///     links.next.as_deref(),
    ///     Some("/apis?offset=10&limit=10&query=name%3Apet%20store")
    /// );
    /// assert!(links.previous.is_none());
    /// ```
    #[must_use]
    pub fn links(&self, base: &str, extra: &[(&str, &str)]) -> PageLinks {
        PageLinks {
            next: self.next.map(|page| page_url(base, page, extra)),
            previous: self.previous.map(|page| page_url(base, page, extra)),
        }
    }
}

/// Compute the pages adjacent to `offset..offset + limit` out of `total` items.
///
/// - An `offset` outside `0..total` yields [`PageWindow::empty`].
/// - A next page exists when items remain after the current page.
/// - A previous page exists when `offset > 0`; its offset is clamped to `0`,
///   while its limit stays `limit` even if fewer items precede the current page.
/// - A non-positive `limit` yields [`PageWindow::empty`].
///
/// Never panics; arithmetic saturates.
///
/// # Examples
///
/// ```
/// use apim_rest::{compute_window, PageRef};
///
/// let window = compute_window(10, 10, 25);
/// assert_eq!(window.next, Some(PageRef { offset: 20, limit: 10 }));
/// assert_eq!(window.previous, Some(PageRef { offset: 0, limit: 10 }));
/// ```
#[must_use]
pub fn compute_window(offset: i64, limit: i64, total: i64) -> PageWindow {
    if offset < 0 || offset >= total || limit <= 0 {
        return PageWindow::empty();
    }

    let next_start = offset.saturating_add(limit);
    let next = (next_start < total).then_some(PageRef {
        offset: next_start,
        limit,
    });

    let previous_end = offset - 1;
    let previous = (previous_end >= 0).then(|| {
        let previous_start = previous_end - limit + 1;
        PageRef {
            offset: previous_start.max(0),
            limit,
        }
    });

    PageWindow { next, previous }
}

fn page_url(base: &str, page: PageRef, extra: &[(&str, &str)]) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    let url = format!("{base}{separator}offset={}&limit={}", page.offset, page.limit);
    extra.iter().fold(url, |mut url, (key, value)| {
        url.push('&');
        url.push_str(&urlencoding::encode(key));
        url.push('=');
        url.push_str(&urlencoding::encode(value));
        url
    })
}
