use partstock_auth::{User, UserRepository};
use partstock_core::{RepositoryResult, UserId};

use crate::store::RecordStore;

/// User accounts, unique by username and by email (both case-insensitive).
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RecordStore<User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserRepository {
    fn get(&self, id: UserId) -> RepositoryResult<Option<User>> {
        self.users.get(id)
    }

    fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        self.users.find(|u| u.username.eq_ignore_ascii_case(username))
    }

    fn list(&self) -> RepositoryResult<Vec<User>> {
        let mut users = self.users.list()?;
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    fn insert(&self, user: User) -> RepositoryResult<()> {
        self.users.insert_unique(
            user,
            |a, b| {
                a.username.eq_ignore_ascii_case(&b.username) || a.email.eq_ignore_ascii_case(&b.email)
            },
            |u| format!("username {} or email {}", u.username, u.email),
        )
    }
}
