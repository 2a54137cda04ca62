pub mod error;
pub mod handlers;
pub mod templates;

pub use error::*;
pub use handlers::*;
