pub mod engine;
pub mod error;
pub mod token;

pub use engine::AuthEngine;
pub use error::AuthError;
pub use token::{TokenCodec, TokenError};
