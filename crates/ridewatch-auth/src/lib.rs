//! # ridewatch-auth
//!
//! Identity primitives for ridewatch.
//!
//! - [`TokenService`]: issues and validates HS256 bearer tokens carrying
//!   `{sub, adm, iat, exp}`. The signing secret is handed to the
//!   constructor; nothing here reads process-wide state.
//! - [`hash_password`] / [`verify_password`]: Argon2id password hashes in
//!   PHC string format. [`verify_login`] also spends the argon2 work when
//!   the account does not exist.
//!
//! ## Example
//!
//! ```rust
//! use ridewatch_auth::TokenService;
//!
//! let tokens = TokenService::new(b"0123456789abcdef0123456789abcdef", 3600).unwrap();
//! let token = tokens.issue(42, false).unwrap();
//! let claims = tokens.validate(&token).unwrap();
//! assert_eq!(claims.user_id, 42);
//! assert!(!claims.is_admin);
//! ```

pub mod error;
pub mod password;
pub mod token;

pub use error::{AuthError, AuthResult};
pub use password::{hash_password, verify_login, verify_password};
pub use token::{TokenService, MAX_TOKEN_TTL_SECS, MIN_SECRET_LENGTH};
