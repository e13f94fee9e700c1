//! axis_content - read access to the article database
//!
//! `ContentStore` is the query surface the site needs: list active articles,
//! list categories, resolve a slug (exact, then fuzzy) and bump view counts.

pub mod memory;
pub mod sqlite;
pub mod store;

pub use memory::MemoryContentStore;
pub use sqlite::SqliteContentStore;
pub use store::{ContentStore, Result, StoreError};
