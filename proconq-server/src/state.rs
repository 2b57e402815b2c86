//! The single mutex that covers the session registry, the id allocator, and
//! the credential store together, so that `DELUSER` and the downgrade of any
//! live session for that principal happen atomically (see DESIGN.md).

use crate::allocator::IdAllocator;
use crate::registry::Registry;
use crate::store::SqliteStore;

pub struct ServerState {
    pub registry: Registry,
    pub allocator: IdAllocator,
    pub store: SqliteStore,
}

impl ServerState {
    pub fn new(store: SqliteStore) -> Self {
        Self { registry: Registry::new(), allocator: IdAllocator::new(), store }
    }
}
