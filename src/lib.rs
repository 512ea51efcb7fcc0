pub mod args;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod store;
pub mod utils;

pub use error::ProcessorError;
