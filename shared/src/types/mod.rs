pub mod json_error;
pub mod jwt;
pub mod login;
pub mod register;
pub mod server_config;
pub mod user;

pub use self::json_error::ErrorResponse;
pub use self::jwt::SessionClaims;
pub use self::login::{AuthorizeData, FieldError, LoginData, LogoutData, TokenResponse};
pub use self::register::SignupData;
pub use self::server_config::{AppConfig, AuthConfig, ConfigError, Environment};
pub use self::user::User;
