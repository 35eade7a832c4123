use serde::{Deserialize, Serialize};

use super::{PostQuery, PostSummary};
use crate::error::RepoError;
use crate::ports::PostRepository;

/// Items per page on every listing.
pub const PAGE_SIZE: u64 = 10;

/// Resolved position of one page within a listing.
///
/// Requests never fail on the page number: anything unparsable reads as the
/// first page and out-of-range numbers clamp to the nearest existing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    /// 1-based page number.
    pub number: u64,
    pub num_pages: u64,
    pub per_page: u64,
    /// Total number of items across all pages.
    pub count: u64,
}

impl PageWindow {
    pub fn resolve(count: u64, per_page: u64, requested: Option<&str>) -> Self {
        let per_page = per_page.max(1);
        // An empty listing still has one (empty) page.
        let num_pages = count.div_ceil(per_page).max(1);
        let number = requested
            .and_then(|raw| parse_page(raw.trim()))
            .map_or(1, |n| n.clamp(1, num_pages as i64) as u64);

        Self {
            number,
            num_pages,
            per_page,
            count,
        }
    }

    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.per_page
    }

    pub fn limit(&self) -> u64 {
        self.per_page
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// Integer value of a page number; numbers too large for `i64` saturate.
fn parse_page(raw: &str) -> Option<i64> {
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub window: PageWindow,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            window: self.window,
        }
    }
}

/// Count the matching posts, settle the requested page and fetch it.
pub async fn paginate_posts<R>(
    repo: &R,
    query: &PostQuery,
    requested: Option<&str>,
) -> Result<Page<PostSummary>, RepoError>
where
    R: PostRepository + ?Sized,
{
    let count = repo.count_filtered(query).await?;
    let window = PageWindow::resolve(count, PAGE_SIZE, requested);
    let items = repo.list_filtered(query, &window).await?;

    Ok(Page { items, window })
}
