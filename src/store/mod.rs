//! In-memory persistence boundary
//!
//! Each store hands out clones sharing one `Arc<RwLock<...>>`, the same
//! way the session and token stores do. Writes become visible to
//! subsequent reads on the same handle; nothing stronger is assumed.

pub mod categories;
pub mod users;

pub use categories::{Category, CategoryStore};
pub use users::UserStore;
