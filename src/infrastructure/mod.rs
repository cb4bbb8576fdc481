pub mod memory_store;
#[cfg(test)]
pub(crate) mod recording_store;
pub mod repository;

pub use memory_store::MemoryStore;
pub use repository::{FormRepository, PageRepository};
