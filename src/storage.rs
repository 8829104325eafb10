mod demo;
mod kv;
mod store;

pub use demo::demo_reports;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
#[cfg(test)]
pub(crate) use kv::FailingStore;
pub use store::{ReportStore, STORAGE_KEY, StoreError};
