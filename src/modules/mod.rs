pub mod ideas;

use std::sync::Arc;

use ideas_db::MemoryStore;
use ideas_kernel::ModuleRegistry;

/// Register all application modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: Arc<MemoryStore<ideas::Idea>>) {
    registry.register(ideas::create_module(store));
}
