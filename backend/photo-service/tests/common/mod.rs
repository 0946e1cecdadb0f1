pub mod memory;

use std::sync::Arc;

use memory::MemoryStore;
use photo_service::handlers::AppState;

/// App state backed by a single in-memory store implementing all four
/// store traits.
pub fn app_state() -> AppState {
    let store = Arc::new(MemoryStore::new());
    AppState::new(store.clone(), store.clone(), store.clone(), store)
}

/// Bearer header for a raw user-id identity.
pub fn bearer(user_id: i64) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", user_id))
}
