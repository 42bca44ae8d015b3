//! Types shared between the auth server and its clients: request and
//! response bodies, session claims, the user record and configuration.

pub mod config;
pub mod types;
