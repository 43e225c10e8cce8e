//! # auth-adapters
//!
//! Password hashing and access-token adapters implementing the `domains` ports.

pub mod password;

#[cfg(feature = "auth-jwt")]
pub mod jwt;

#[cfg(feature = "auth-jwt")]
pub use jwt::JwtTokenService;
pub use password::Argon2PasswordHasher;
