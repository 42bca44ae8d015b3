pub mod create;
pub mod login;
pub mod register;
pub mod sqlite;
pub mod store;
pub mod utils;

pub use sqlite::SqliteStore;
pub use store::{CredentialMode, CredentialStore, StoreError};
