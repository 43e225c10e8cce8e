//! # In-memory data context
//!
//! DashMap-backed implementation of [`EntitySet`] used by single-process
//! deployments and by the test suites. Ids come from a per-set atomic sequence
//! starting at 1 and are never reused.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use domains::{Comment, Entity, EntitySet, Post, Predicate, RepositoryError, User};
use tracing::debug;

/// One "table" of entities of type `T`.
#[derive(Debug)]
pub struct MemoryEntitySet<T> {
    rows: DashMap<i64, T>,
    next_id: AtomicI64,
}

impl<T> Default for MemoryEntitySet<T> {
    fn default() -> Self {
        Self {
            rows: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl<T: Entity> MemoryEntitySet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Matching rows, cloned out of the map and sorted by id.
    fn matching(&self, predicate: Predicate<'_, T>) -> Vec<T> {
        let mut found: Vec<T> = self
            .rows
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by_key(|e| e.id());
        found
    }
}

#[async_trait]
impl<T: Entity> EntitySet<T> for MemoryEntitySet<T> {
    async fn find_first(&self, predicate: Predicate<'_, T>) -> Result<Option<T>, RepositoryError> {
        Ok(self.matching(predicate).into_iter().next())
    }

    async fn find_all(&self, predicate: Predicate<'_, T>) -> Result<Vec<T>, RepositoryError> {
        Ok(self.matching(predicate))
    }

    async fn count(&self, predicate: Predicate<'_, T>) -> Result<usize, RepositoryError> {
        Ok(self.rows.iter().filter(|entry| predicate(entry.value())).count())
    }

    async fn insert(&self, mut entity: T) -> Result<T, RepositoryError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        entity.set_id(id);
        self.rows.insert(id, entity.clone());
        debug!(resource = T::RESOURCE, id, "entity inserted");
        Ok(entity)
    }

    async fn update(&self, entity: T) -> Result<T, RepositoryError> {
        let id = entity.id();
        match self.rows.get_mut(&id) {
            Some(mut row) => {
                *row = entity.clone();
                Ok(entity)
            }
            None => Err(RepositoryError::Missing {
                resource: T::RESOURCE,
                id,
            }),
        }
    }

    async fn remove(&self, id: i64) -> Result<(), RepositoryError> {
        match self.rows.remove(&id) {
            Some(_) => {
                debug!(resource = T::RESOURCE, id, "entity removed");
                Ok(())
            }
            None => Err(RepositoryError::Missing {
                resource: T::RESOURCE,
                id,
            }),
        }
    }

    async fn remove_where(&self, predicate: Predicate<'_, T>) -> Result<usize, RepositoryError> {
        let before = self.rows.len();
        self.rows.retain(|_, row| !predicate(row));
        let removed = before.saturating_sub(self.rows.len());
        debug!(resource = T::RESOURCE, removed, "entities removed");
        Ok(removed)
    }
}

/// The three entity sets PostHub needs, shared behind `Arc`s so services can
/// each hold the sets they use.
#[derive(Debug, Clone, Default)]
pub struct MemoryDataContext {
    pub users: Arc<MemoryEntitySet<User>>,
    pub posts: Arc<MemoryEntitySet<Post>>,
    pub comments: Arc<MemoryEntitySet<Comment>>,
}

impl MemoryDataContext {
    pub fn new() -> Self {
        Self::default()
    }
}
