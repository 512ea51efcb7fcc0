pub mod json_store;
pub mod records;

pub use json_store::JsonStore;
