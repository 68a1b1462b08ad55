//! Search request construction and result pagination

pub mod filters;
pub mod grades;
pub mod page;

pub use filters::{DEFAULT_PAGE_SIZE, SearchFilters, SearchRequest};
pub use grades::{Finish, FinishPreset, grade_range};
pub use page::{PageItem, PageWindow, SearchPage};
