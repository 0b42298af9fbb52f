pub mod auth;
pub mod error;
pub mod module;
pub mod types;

pub use auth::{Claims, CurrentStudent};
pub use error::ServiceError;
pub use module::Module;
pub use types::{ListParams, ListResult, now_rfc3339};
