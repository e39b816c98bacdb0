//! Application users and the login flow.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use partstock_core::{DomainError, DomainResult, Entity, RepositoryResult, UserId};

use crate::error::{AuthError, AuthResult};
use crate::jwt::{IssuedToken, JwtIssuer};
use crate::password::verify_password;
use crate::Role;

const MAX_USERNAME_LEN: usize = 50;

/// A user account. The password is only ever held as an argon2 PHC hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub enabled: bool,
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub roles: Vec<Role>,
}

impl User {
    pub fn create(id: UserId, new: NewUser, password_hash: String) -> DomainResult<Self> {
        let username = new.username.trim().to_string();
        if username.is_empty() {
            return Err(DomainError::validation("username cannot be empty"));
        }
        if username.chars().count() > MAX_USERNAME_LEN {
            return Err(DomainError::validation(format!(
                "username cannot exceed {MAX_USERNAME_LEN} characters"
            )));
        }
        let email = new.email.trim().to_string();
        if !email.contains('@') {
            return Err(DomainError::validation("email must contain '@'"));
        }

        Ok(Self {
            id,
            username,
            email,
            password_hash,
            first_name: new.first_name,
            last_name: new.last_name,
            enabled: true,
            roles: new.roles,
        })
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

/// Storage for user accounts; usernames and emails are unique.
pub trait UserRepository: Send + Sync {
    fn get(&self, id: UserId) -> RepositoryResult<Option<User>>;
    fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;
    fn list(&self) -> RepositoryResult<Vec<User>>;
    /// Fails with `Duplicate` when the username or email is taken.
    fn insert(&self, user: User) -> RepositoryResult<()>;
}

impl<S> UserRepository for Arc<S>
where
    S: UserRepository + ?Sized,
{
    fn get(&self, id: UserId) -> RepositoryResult<Option<User>> {
        (**self).get(id)
    }

    fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        (**self).find_by_username(username)
    }

    fn list(&self) -> RepositoryResult<Vec<User>> {
        (**self).list()
    }

    fn insert(&self, user: User) -> RepositoryResult<()> {
        (**self).insert(user)
    }
}

/// Checks credentials and issues tokens.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    issuer: JwtIssuer,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserRepository>, issuer: JwtIssuer) -> Self {
        Self { users, issuer }
    }

    /// Sign in with a username and password.
    ///
    /// Unknown users, disabled accounts and wrong passwords all fail with
    /// [`AuthError::BadCredentials`].
    pub fn login(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<(User, IssuedToken)> {
        let Some(user) = self.users.find_by_username(username.trim())? else {
            tracing::info!(username, "login failed: unknown user");
            return Err(AuthError::BadCredentials);
        };
        if !user.enabled {
            tracing::info!(username, "login failed: account disabled");
            return Err(AuthError::BadCredentials);
        }
        if !verify_password(password, &user.password_hash) {
            tracing::info!(username, "login failed: wrong password");
            return Err(AuthError::BadCredentials);
        }

        let token = self.issuer.issue(&user, now)?;
        tracing::info!(username = %user.username, user_id = %user.id, "login succeeded");
        Ok((user, token))
    }
}
