pub mod types;
pub mod queries;
pub mod validate;

pub use types::*;
pub use queries::*;
pub use validate::*;
