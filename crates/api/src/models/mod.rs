pub mod overload;
pub mod signature;
pub mod types;

pub use overload::*;
pub use signature::*;
pub use types::*;
