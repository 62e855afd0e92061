use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Post, User};
use crate::error::RepoError;
use crate::policy::PostQuery;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// One page of query results plus the counters pagination UIs need.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

impl<T> Page<T> {
    /// A page with no results, e.g. for unsatisfiable queries.
    pub fn empty(page: u64, per_page: u64) -> Self {
        Self {
            items: Vec::new(),
            page,
            per_page,
            total: 0,
        }
    }

    pub fn last_page(&self) -> u64 {
        self.total.div_ceil(self.per_page).max(1)
    }
}

/// Post store.
///
/// Soft-deleted rows are tombstoned, never physically removed, and stay
/// invisible to every method unless a method says otherwise.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Fetch a post by id. `include_deleted` also surfaces tombstoned rows
    /// (the policy layer decides who may actually see them).
    async fn find(&self, id: Uuid, include_deleted: bool) -> Result<Option<Post>, RepoError>;

    /// Insert or update a post.
    async fn save(&self, post: Post) -> Result<Post, RepoError>;

    /// Run a listing query. `now` anchors the published/scheduled split.
    async fn list(&self, query: PostQuery, now: DateTime<Utc>) -> Result<Page<Post>, RepoError>;

    /// Tombstone a post at `at`.
    async fn soft_delete(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), RepoError>;

    /// Clear a post's tombstone. The other fields are untouched, so the
    /// post reappears in whatever lifecycle state they encode.
    async fn restore(&self, id: Uuid) -> Result<(), RepoError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_page_rounds_up() {
        let page = Page::<()> {
            items: Vec::new(),
            page: 1,
            per_page: 20,
            total: 41,
        };
        assert_eq!(page.last_page(), 3);
    }

    #[test]
    fn an_empty_result_still_has_one_page() {
        assert_eq!(Page::<()>::empty(1, 20).last_page(), 1);
    }
}
