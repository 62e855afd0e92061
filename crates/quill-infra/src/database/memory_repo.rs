//! In-memory repositories - used when no database is configured.
//!
//! These interpret listing queries with the same semantics as the SQL
//! adapter, so the policy layer behaves identically on both backends.
//! Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Post, User};
use quill_core::error::RepoError;
use quill_core::policy::{PAGE_SIZE, PostQuery, StatusFilter};
use quill_core::ports::{BaseRepository, Page, PostRepository, UserRepository};

/// In-memory user repository using a HashMap with an async RwLock.
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;

        // The users table has a unique index on email; mirror it.
        if store
            .values()
            .any(|u| u.email == user.email && u.id != user.id)
        {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        store.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .store
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}

/// In-memory post repository.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(post: &Post, query: &PostQuery, now: DateTime<Utc>) -> bool {
        let status_matches = match query.status {
            StatusFilter::Published => {
                !post.is_draft
                    && post.published_at.is_some_and(|at| at <= now)
                    && post.deleted_at.is_none()
            }
            StatusFilter::Draft => post.is_draft && post.deleted_at.is_none(),
            StatusFilter::Scheduled => {
                !post.is_draft
                    && post.published_at.is_some_and(|at| at > now)
                    && post.deleted_at.is_none()
            }
            StatusFilter::Deleted => post.deleted_at.is_some(),
        };

        status_matches
            && query
                .author_scope()
                .is_none_or(|author| post.user_id == author)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find(&self, id: Uuid, include_deleted: bool) -> Result<Option<Post>, RepoError> {
        Ok(self
            .store
            .read()
            .await
            .get(&id)
            .filter(|post| include_deleted || post.deleted_at.is_none())
            .cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        self.store.write().await.insert(post.id, post.clone());
        Ok(post)
    }

    async fn list(&self, query: PostQuery, now: DateTime<Utc>) -> Result<Page<Post>, RepoError> {
        if !query.is_satisfiable() {
            return Ok(Page::empty(query.page, PAGE_SIZE));
        }

        let store = self.store.read().await;
        let mut items: Vec<Post> = store
            .values()
            .filter(|post| Self::matches(post, &query, now))
            .cloned()
            .collect();

        // Newest first, id descending as the tiebreak.
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = items.len() as u64;
        let offset = query.page.saturating_sub(1).saturating_mul(PAGE_SIZE) as usize;
        let items = items
            .into_iter()
            .skip(offset)
            .take(PAGE_SIZE as usize)
            .collect();

        Ok(Page {
            items,
            page: query.page,
            per_page: PAGE_SIZE,
            total,
        })
    }

    async fn soft_delete(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        match store.get_mut(&id) {
            Some(post) if post.deleted_at.is_none() => {
                post.deleted_at = Some(at);
                Ok(())
            }
            _ => Err(RepoError::NotFound),
        }
    }

    async fn restore(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        match store.get_mut(&id) {
            Some(post) => {
                post.deleted_at = None;
                Ok(())
            }
            None => Err(RepoError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use quill_core::policy::StatusFilter;

    use super::*;

    fn post(
        author: Uuid,
        title: &str,
        is_draft: bool,
        published_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Post {
        Post::new(
            author,
            title.to_owned(),
            "Content".to_owned(),
            is_draft,
            published_at,
            created_at,
        )
    }

    async fn seeded() -> (InMemoryPostRepository, Uuid, DateTime<Utc>) {
        let repo = InMemoryPostRepository::new();
        let author = Uuid::new_v4();
        let now = Utc::now();

        repo.save(post(author, "Old published", false, Some(now - TimeDelta::days(3)), now - TimeDelta::days(3)))
            .await
            .unwrap();
        repo.save(post(author, "New published", false, Some(now - TimeDelta::days(1)), now - TimeDelta::days(1)))
            .await
            .unwrap();
        repo.save(post(author, "Draft", true, None, now - TimeDelta::days(2)))
            .await
            .unwrap();
        repo.save(post(author, "Scheduled", false, Some(now + TimeDelta::days(1)), now))
            .await
            .unwrap();

        (repo, author, now)
    }

    #[tokio::test]
    async fn public_listing_excludes_drafts_and_scheduled() {
        let (repo, _, now) = seeded().await;

        let page = repo
            .list(PostQuery::new(StatusFilter::Published, None, 1), now)
            .await
            .unwrap();

        let titles: Vec<_> = page.items.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["New published", "Old published"]);
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn draft_listing_is_scoped_to_the_viewer() {
        let (repo, author, now) = seeded().await;

        let own = repo
            .list(PostQuery::new(StatusFilter::Draft, Some(author), 1), now)
            .await
            .unwrap();
        assert_eq!(own.items.len(), 1);
        assert_eq!(own.items[0].title, "Draft");

        let stranger = repo
            .list(PostQuery::new(StatusFilter::Draft, Some(Uuid::new_v4()), 1), now)
            .await
            .unwrap();
        assert!(stranger.items.is_empty());
    }

    #[tokio::test]
    async fn draft_listing_without_a_viewer_is_empty_not_an_error() {
        let (repo, _, now) = seeded().await;

        let page = repo
            .list(PostQuery::new(StatusFilter::Draft, None, 1), now)
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn scheduled_listing_only_contains_future_posts() {
        let (repo, author, now) = seeded().await;

        let page = repo
            .list(PostQuery::new(StatusFilter::Scheduled, Some(author), 1), now)
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title, "Scheduled");
    }

    #[tokio::test]
    async fn soft_delete_hides_then_restore_reinstates() {
        let (repo, author, now) = seeded().await;
        let target = repo
            .list(PostQuery::new(StatusFilter::Published, None, 1), now)
            .await
            .unwrap()
            .items
            .remove(0);

        repo.soft_delete(target.id, now).await.unwrap();

        assert!(repo.find(target.id, false).await.unwrap().is_none());
        assert!(repo.find(target.id, true).await.unwrap().is_some());

        let trash = repo
            .list(PostQuery::new(StatusFilter::Deleted, Some(author), 1), now)
            .await
            .unwrap();
        assert_eq!(trash.items.len(), 1);

        repo.restore(target.id).await.unwrap();

        let restored = repo.find(target.id, false).await.unwrap().unwrap();
        assert_eq!(restored.deleted_at, None);
        // Back in the public listing, same publication fields as before.
        assert_eq!(restored.published_at, target.published_at);
    }

    #[tokio::test]
    async fn deleting_an_already_deleted_post_is_not_found() {
        let (repo, _, now) = seeded().await;
        let target = repo
            .list(PostQuery::new(StatusFilter::Published, None, 1), now)
            .await
            .unwrap()
            .items
            .remove(0);

        repo.soft_delete(target.id, now).await.unwrap();
        let err = repo.soft_delete(target.id, now).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }

    #[tokio::test]
    async fn listing_paginates_newest_first() {
        let repo = InMemoryPostRepository::new();
        let author = Uuid::new_v4();
        let now = Utc::now();

        for i in 0..25 {
            repo.save(post(
                author,
                &format!("Post {i}"),
                false,
                Some(now - TimeDelta::hours(i)),
                now - TimeDelta::hours(i),
            ))
            .await
            .unwrap();
        }

        let first = repo
            .list(PostQuery::new(StatusFilter::Published, None, 1), now)
            .await
            .unwrap();
        assert_eq!(first.items.len(), PAGE_SIZE as usize);
        assert_eq!(first.items[0].title, "Post 0");
        assert_eq!(first.total, 25);
        assert_eq!(first.last_page(), 2);

        let second = repo
            .list(PostQuery::new(StatusFilter::Published, None, 2), now)
            .await
            .unwrap();
        assert_eq!(second.items.len(), 5);
    }
}
