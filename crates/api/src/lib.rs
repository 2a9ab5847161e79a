pub mod error;
pub mod index;
pub mod models;
pub mod resolve;

// Re-export commonly used types
pub use error::{ApiError, ApiResult};
pub use index::ReferenceIndex;
pub use models::*;
pub use resolve::ResolutionContext;
