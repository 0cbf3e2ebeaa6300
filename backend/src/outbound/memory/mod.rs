//! In-process stores for development runs and tests.
//!
//! Both stores keep their rows behind a [`std::sync::Mutex`] and hand out
//! monotonically increasing ids starting at 1. Nothing is persisted.

mod page_store;
mod user_store;

pub use page_store::InMemoryPageRepository;
pub use user_store::InMemoryUserRepository;

fn poisoned() -> String {
    "in-memory store lock poisoned".to_owned()
}
