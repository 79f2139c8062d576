pub mod books;

use std::sync::Arc;

use shelf_db::{SharedStore, StoreModule};
use shelf_kernel::ModuleRegistry;

/// Register every module with the registry. The store handle is shared by
/// the core `db` module and the routes that query it.
pub fn register_all(registry: &mut ModuleRegistry, store: SharedStore) {
    registry.register_core(Arc::new(StoreModule::new(store.clone())));
    registry.register_custom(books::create_module(store));
}
