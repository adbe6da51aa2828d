pub mod models;
pub mod registry;
pub mod types;

pub use models::*;
pub use registry::FilterFieldRegistry;
pub use types::*;
