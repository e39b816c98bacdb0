use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use partstock_core::{Entity, RepositoryError, RepositoryResult};

/// Keyed in-memory table of entities, shared by the in-memory repositories.
///
/// A poisoned lock is reported as `RepositoryError::Unavailable` rather than
/// panicking the caller.
#[derive(Debug)]
pub struct RecordStore<E: Entity> {
    inner: RwLock<HashMap<E::Id, E>>,
}

impl<E: Entity> RecordStore<E> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, HashMap<E::Id, E>>> {
        self.inner
            .read()
            .map_err(|_| RepositoryError::unavailable("record store lock poisoned"))
    }

    pub(crate) fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, HashMap<E::Id, E>>> {
        self.inner
            .write()
            .map_err(|_| RepositoryError::unavailable("record store lock poisoned"))
    }
}

impl<E: Entity> Default for RecordStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> RecordStore<E>
where
    E: Entity + Clone,
{
    /// Lookup by id, soft-deleted records included.
    pub fn get(&self, id: E::Id) -> RepositoryResult<Option<E>> {
        Ok(self.read()?.get(&id).cloned())
    }

    /// First record matching `pred`, soft-deleted records included.
    pub fn find(&self, pred: impl Fn(&E) -> bool) -> RepositoryResult<Option<E>> {
        Ok(self.read()?.values().find(|e| pred(e)).cloned())
    }

    /// Every live record matching `pred`.
    pub fn list_where(&self, pred: impl Fn(&E) -> bool) -> RepositoryResult<Vec<E>> {
        Ok(self
            .read()?
            .values()
            .filter(|e| !e.is_deleted() && pred(e))
            .cloned()
            .collect())
    }

    pub fn list(&self) -> RepositoryResult<Vec<E>> {
        self.list_where(|_| true)
    }

    /// Insert unless an existing record `clashes` with the new one.
    ///
    /// The check and the write happen under one lock.
    pub fn insert_unique(
        &self,
        entity: E,
        clashes: impl Fn(&E, &E) -> bool,
        describe: impl FnOnce(&E) -> String,
    ) -> RepositoryResult<()> {
        let mut map = self.write()?;
        if map.contains_key(&entity.id()) || map.values().any(|e| clashes(e, &entity)) {
            return Err(RepositoryError::duplicate(describe(&entity)));
        }
        map.insert(entity.id(), entity);
        Ok(())
    }

    /// Overwrite an existing record.
    pub fn replace(&self, entity: E) -> RepositoryResult<()> {
        let mut map = self.write()?;
        match map.get_mut(&entity.id()) {
            Some(slot) => {
                *slot = entity;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    /// Append without uniqueness checks beyond the id.
    pub fn push(&self, entity: E) -> RepositoryResult<()> {
        self.insert_unique(entity, |_, _| false, |e| format!("id {:?}", e.id()))
    }

    pub fn is_empty(&self) -> RepositoryResult<bool> {
        Ok(self.read()?.is_empty())
    }
}
