//! # Entity-Or-Fail
//!
//! The one sanctioned way for services to fetch a *required* single entity.
//! A missing entity becomes [`AppError::NotFound`] here, so every "not found"
//! path in the API produces the same response shape.
//!
//! Two explicit call forms:
//! - [`first_or_not_found`]: caller supplies the message verbatim.
//! - [`first_or_resource_not_found`]: message is `"{label} with ID {id} not found"`
//!   and the error payload carries `{ResourceType, Id}`.
//!
//! When several entities match, whichever the store yields first is returned.

use crate::errors::{AppError, RepositoryError, Result, ServiceError};
use crate::models::Entity;
use crate::ports::EntitySet;

/// Fetches the first entity matching `predicate`, or fails with `message`.
pub async fn first_or_not_found<T, S, P>(
    set: &S,
    predicate: P,
    message: impl Into<String>,
) -> Result<T>
where
    T: Entity,
    S: EntitySet<T> + ?Sized,
    P: Fn(&T) -> bool + Send + Sync,
{
    let message = message.into();
    match set.find_first(&predicate).await? {
        Some(entity) => Ok(entity),
        None => Err(AppError::not_found(message).into()),
    }
}

/// Fetches the first entity matching `predicate`, or fails with a resource-form
/// NotFound built from `resource_type` and `id`.
pub async fn first_or_resource_not_found<T, S, P>(
    set: &S,
    predicate: P,
    resource_type: &str,
    id: i64,
) -> Result<T>
where
    T: Entity,
    S: EntitySet<T> + ?Sized,
    P: Fn(&T) -> bool + Send + Sync,
{
    match set.find_first(&predicate).await? {
        Some(entity) => Ok(entity),
        None => Err(AppError::resource_not_found(resource_type, id).into()),
    }
}

/// Shorthand for the common case: look an entity up by its id, labelled with
/// the entity's own resource name.
pub async fn by_id_or_not_found<T, S>(set: &S, id: i64) -> Result<T>
where
    T: Entity,
    S: EntitySet<T> + ?Sized,
{
    first_or_resource_not_found(set, move |e: &T| e.id() == id, T::RESOURCE, id).await
}

/// For writes that follow a lookup: a row that vanished in between (another
/// request deleted it) is reported as the same NotFound the lookup would give.
pub fn missing_as_not_found(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::Missing { resource, id } => AppError::resource_not_found(resource, id).into(),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::models::Post;
    use crate::ports::Predicate;

    /// Minimal Vec-backed set; only reads are exercised here.
    struct VecSet(Mutex<Vec<Post>>);

    impl VecSet {
        fn with(posts: Vec<Post>) -> Self {
            Self(Mutex::new(posts))
        }
    }

    #[async_trait]
    impl EntitySet<Post> for VecSet {
        async fn find_first(
            &self,
            predicate: Predicate<'_, Post>,
        ) -> std::result::Result<Option<Post>, RepositoryError> {
            let posts = self.0.lock().unwrap();
            Ok(posts.iter().find(|p| predicate(p)).cloned())
        }

        async fn find_all(
            &self,
            predicate: Predicate<'_, Post>,
        ) -> std::result::Result<Vec<Post>, RepositoryError> {
            let posts = self.0.lock().unwrap();
            Ok(posts.iter().filter(|p| predicate(p)).cloned().collect())
        }

        async fn count(
            &self,
            predicate: Predicate<'_, Post>,
        ) -> std::result::Result<usize, RepositoryError> {
            Ok(self.find_all(predicate).await?.len())
        }

        async fn insert(&self, entity: Post) -> std::result::Result<Post, RepositoryError> {
            self.0.lock().unwrap().push(entity.clone());
            Ok(entity)
        }

        async fn update(&self, entity: Post) -> std::result::Result<Post, RepositoryError> {
            Ok(entity)
        }

        async fn remove(&self, _id: i64) -> std::result::Result<(), RepositoryError> {
            Ok(())
        }

        async fn remove_where(
            &self,
            _predicate: Predicate<'_, Post>,
        ) -> std::result::Result<usize, RepositoryError> {
            Ok(0)
        }
    }

    /// Store whose reads always fail.
    struct BrokenSet;

    #[async_trait]
    impl EntitySet<Post> for BrokenSet {
        async fn find_first(
            &self,
            _predicate: Predicate<'_, Post>,
        ) -> std::result::Result<Option<Post>, RepositoryError> {
            Err(RepositoryError::Backend("connection reset".into()))
        }

        async fn find_all(
            &self,
            _predicate: Predicate<'_, Post>,
        ) -> std::result::Result<Vec<Post>, RepositoryError> {
            Err(RepositoryError::Backend("connection reset".into()))
        }

        async fn count(
            &self,
            _predicate: Predicate<'_, Post>,
        ) -> std::result::Result<usize, RepositoryError> {
            Err(RepositoryError::Backend("connection reset".into()))
        }

        async fn insert(&self, _entity: Post) -> std::result::Result<Post, RepositoryError> {
            Err(RepositoryError::Backend("connection reset".into()))
        }

        async fn update(&self, _entity: Post) -> std::result::Result<Post, RepositoryError> {
            Err(RepositoryError::Backend("connection reset".into()))
        }

        async fn remove(&self, _id: i64) -> std::result::Result<(), RepositoryError> {
            Err(RepositoryError::Backend("connection reset".into()))
        }

        async fn remove_where(
            &self,
            _predicate: Predicate<'_, Post>,
        ) -> std::result::Result<usize, RepositoryError> {
            Err(RepositoryError::Backend("connection reset".into()))
        }
    }

    fn post(id: i64, title: &str) -> Post {
        Post {
            id,
            title: title.into(),
            body: "body".into(),
            author_id: 1,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn app_error(err: ServiceError) -> AppError {
        match err {
            ServiceError::Application(app) => app,
            other => panic!("expected an application error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn returns_the_matching_entity() {
        let set = VecSet::with(vec![post(1, "first"), post(2, "second")]);
        let found = first_or_not_found(&set, |p: &Post| p.id == 2, "missing")
            .await
            .unwrap();
        assert_eq!(found.title, "second");
    }

    #[tokio::test]
    async fn literal_message_is_used_verbatim() {
        let set = VecSet::with(vec![post(1, "first")]);
        let err = first_or_not_found(&set, |p: &Post| p.title == "nope", "No post titled nope")
            .await
            .unwrap_err();
        let err = app_error(err);
        assert_eq!(err.message(), "No post titled nope");
        assert_eq!(err.status_code(), 404);
        assert!(err.additional_data().is_none());
    }

    #[tokio::test]
    async fn resource_form_formats_message_and_payload() {
        let set = VecSet::with(vec![]);
        let err = first_or_resource_not_found(&set, |p: &Post| p.id == 123, "Post", 123)
            .await
            .unwrap_err();
        let err = app_error(err);
        assert_eq!(err.message(), "Post with ID 123 not found");
        assert_eq!(
            serde_json::Value::Object(err.additional_data().unwrap()),
            json!({ "ResourceType": "Post", "Id": 123 })
        );
    }

    #[tokio::test]
    async fn resource_form_carries_the_exact_label_passed_in() {
        let set = VecSet::with(vec![post(7, "seven")]);
        let err = first_or_resource_not_found(&set, |p: &Post| p.id == 8, "Article", 8)
            .await
            .unwrap_err();
        let data = app_error(err).additional_data().unwrap();
        assert_eq!(data.get("ResourceType"), Some(&json!("Article")));
        assert_eq!(data.get("Id"), Some(&json!(8)));
    }

    #[tokio::test]
    async fn multiple_matches_yield_one_of_them() {
        let set = VecSet::with(vec![post(1, "dup"), post(2, "dup")]);
        let found = first_or_not_found(&set, |p: &Post| p.title == "dup", "missing")
            .await
            .unwrap();
        assert_eq!(found.title, "dup");
    }

    #[tokio::test]
    async fn by_id_uses_the_entity_resource_label() {
        let set = VecSet::with(vec![]);
        let err = by_id_or_not_found::<Post, _>(&set, 5).await.unwrap_err();
        assert_eq!(app_error(err).message(), "Post with ID 5 not found");
    }

    #[tokio::test]
    async fn store_failures_are_not_turned_into_not_found() {
        let err = first_or_not_found(&BrokenSet, |_: &Post| true, "missing")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Repository(RepositoryError::Backend(_))));
    }

    #[test]
    fn vanished_rows_become_resource_not_found() {
        let err = missing_as_not_found(RepositoryError::Missing {
            resource: "Comment",
            id: 4,
        });
        let err = app_error(err);
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "Comment with ID 4 not found");
    }

    #[test]
    fn other_store_failures_stay_unclassified() {
        let err = missing_as_not_found(RepositoryError::Backend("disk full".into()));
        assert!(matches!(err, ServiceError::Repository(RepositoryError::Backend(_))));
    }
}
