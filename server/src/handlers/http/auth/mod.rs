pub mod authorize;
pub mod login;
pub mod logout;
pub mod register;

pub use authorize::handle_authorize;
pub use login::handle_login;
pub use logout::handle_logout;
pub use register::handle_signup;
