//! Durable cache store adapters.

mod json_file_store;

pub use json_file_store::JsonFileCacheStore;
