use thiserror::Error;

use partstock_core::{DomainError, RepositoryError};

use crate::claims::TokenValidationError;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown user, wrong password, or disabled account. Deliberately indistinct.
    #[error("invalid username or password")]
    BadCredentials,

    #[error(transparent)]
    Token(#[from] TokenValidationError),

    #[error("failed to sign token: {0}")]
    TokenEncoding(String),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
