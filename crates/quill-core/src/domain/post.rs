use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a blog post owned by a single author.
///
/// Two optional timestamps carry the lifecycle: `published_at` (None while
/// the post is a draft) and `deleted_at` (the soft-delete tombstone; a set
/// tombstone hides the row from every default query).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub is_draft: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Lifecycle state derived from stored fields plus the current time.
///
/// Never persisted: a scheduled post becomes published simply by the clock
/// passing `published_at`, with no write involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Draft,
    Scheduled,
    Published,
    Deleted,
}

impl Post {
    /// Create a new post owned by `user_id`.
    ///
    /// `is_draft`/`published_at` are expected to already satisfy the
    /// publication invariant (see [`crate::policy::resolve_publication`]).
    pub fn new(
        user_id: Uuid,
        title: String,
        content: String,
        is_draft: bool,
        published_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            content,
            is_draft,
            published_at,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Compute the lifecycle state at `now`. The tombstone dominates.
    pub fn lifecycle(&self, now: DateTime<Utc>) -> Lifecycle {
        if self.deleted_at.is_some() {
            return Lifecycle::Deleted;
        }
        if self.is_draft {
            return Lifecycle::Draft;
        }
        match self.published_at {
            Some(at) if at > now => Lifecycle::Scheduled,
            _ => Lifecycle::Published,
        }
    }

    /// Whether `viewer` is this post's author.
    pub fn is_authored_by(&self, viewer: Option<Uuid>) -> bool {
        viewer == Some(self.user_id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn post_at(is_draft: bool, published_at: Option<DateTime<Utc>>) -> Post {
        let now = Utc::now();
        Post::new(
            Uuid::new_v4(),
            "Title".to_owned(),
            "Content".to_owned(),
            is_draft,
            published_at,
            now,
        )
    }

    #[test]
    fn draft_lifecycle() {
        let post = post_at(true, None);
        assert_eq!(post.lifecycle(Utc::now()), Lifecycle::Draft);
    }

    #[test]
    fn scheduled_becomes_published_without_writes() {
        let now = Utc::now();
        let publish_at = now + TimeDelta::days(1);
        let post = post_at(false, Some(publish_at));

        assert_eq!(post.lifecycle(now), Lifecycle::Scheduled);
        // Same stored fields, later clock reading.
        assert_eq!(
            post.lifecycle(publish_at + TimeDelta::seconds(1)),
            Lifecycle::Published
        );
    }

    #[test]
    fn published_at_boundary_counts_as_published() {
        let now = Utc::now();
        let post = post_at(false, Some(now));
        assert_eq!(post.lifecycle(now), Lifecycle::Published);
    }

    #[test]
    fn tombstone_dominates_every_other_state() {
        let now = Utc::now();
        let mut post = post_at(false, Some(now - TimeDelta::days(1)));
        post.deleted_at = Some(now);
        assert_eq!(post.lifecycle(now), Lifecycle::Deleted);
    }
}
