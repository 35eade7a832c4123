//! Query composition - which posts a listing shows, and how it is paged.

mod pagination;
mod posts;

pub use pagination::{PAGE_SIZE, Page, PageWindow, paginate_posts};
pub use posts::{AuthoredComment, PostQuery, PostSummary, Visibility};
