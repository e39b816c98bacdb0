//! `partstock-auth` — authentication and authorization, decoupled from HTTP.
//!
//! Users, argon2 password hashing, HS256 tokens, and the role policy.

pub mod authorize;
pub mod claims;
pub mod error;
pub mod jwt;
pub mod password;
pub mod permissions;
pub mod roles;
pub mod user;

pub use authorize::{authorize, AuthzError, Principal};
pub use claims::{validate_claims, JwtClaims, TokenValidationError};
pub use error::{AuthError, AuthResult};
pub use jwt::{Hs256JwtValidator, IssuedToken, JwtIssuer, JwtValidator};
pub use password::{hash_password, verify_password};
pub use permissions::{permissions_from_roles, Permission};
pub use roles::Role;
pub use user::{Authenticator, NewUser, User, UserRepository};
