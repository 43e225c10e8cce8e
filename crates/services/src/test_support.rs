//! Store doubles shared by the service tests.

use async_trait::async_trait;
use domains::{Entity, EntitySet, Predicate, RepositoryError};
use storage_adapters::MemoryEntitySet;

/// A set where every row disappears right after it is looked up, as if another
/// request deleted it between a service's lookup and its write.
pub struct VanishingSet<T> {
    inner: MemoryEntitySet<T>,
}

impl<T: Entity> VanishingSet<T> {
    pub fn new() -> Self {
        Self {
            inner: MemoryEntitySet::new(),
        }
    }

    pub async fn seed(&self, entity: T) -> T {
        self.inner.insert(entity).await.unwrap()
    }
}

#[async_trait]
impl<T: Entity> EntitySet<T> for VanishingSet<T> {
    async fn find_first(&self, predicate: Predicate<'_, T>) -> Result<Option<T>, RepositoryError> {
        let found = self.inner.find_first(predicate).await?;
        if let Some(entity) = &found {
            self.inner.remove(entity.id()).await?;
        }
        Ok(found)
    }

    async fn find_all(&self, predicate: Predicate<'_, T>) -> Result<Vec<T>, RepositoryError> {
        self.inner.find_all(predicate).await
    }

    async fn count(&self, predicate: Predicate<'_, T>) -> Result<usize, RepositoryError> {
        self.inner.count(predicate).await
    }

    async fn insert(&self, entity: T) -> Result<T, RepositoryError> {
        self.inner.insert(entity).await
    }

    async fn update(&self, entity: T) -> Result<T, RepositoryError> {
        self.inner.update(entity).await
    }

    async fn remove(&self, id: i64) -> Result<(), RepositoryError> {
        self.inner.remove(id).await
    }

    async fn remove_where(&self, predicate: Predicate<'_, T>) -> Result<usize, RepositoryError> {
        self.inner.remove_where(predicate).await
    }
}
