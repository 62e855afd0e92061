//! Read visibility and mutation authorization.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Lifecycle, Post};

/// Whether `viewer` may read `post` at `now`.
///
/// Published posts are public. Drafts, scheduled posts and trashed posts
/// are readable by their author alone - and a failed read must surface as
/// not-found, never as forbidden, so unpublished content stays
/// indistinguishable from content that does not exist.
pub fn can_view(post: &Post, viewer: Option<Uuid>, now: DateTime<Utc>) -> bool {
    match post.lifecycle(now) {
        Lifecycle::Published => true,
        Lifecycle::Draft | Lifecycle::Scheduled | Lifecycle::Deleted => {
            post.is_authored_by(viewer)
        }
    }
}

/// Mutations a viewer can attempt on a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Update,
    Delete,
    Restore,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Restore => "restore",
        }
    }
}

/// Whether `viewer` may perform `action` on `post`.
///
/// Ownership is the sole authorization axis; there are no role overrides.
/// Unlike reads, a denied mutation surfaces as an explicit forbidden.
pub fn can_mutate(post: &Post, viewer: Uuid, action: Action) -> bool {
    match action {
        Action::Update | Action::Delete | Action::Restore => viewer == post.user_id,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn fixture(is_draft: bool, published_at: Option<DateTime<Utc>>) -> (Post, Uuid, Uuid) {
        let author = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let post = Post::new(
            author,
            "Title".to_owned(),
            "Content".to_owned(),
            is_draft,
            published_at,
            Utc::now(),
        );
        (post, author, stranger)
    }

    #[test]
    fn published_posts_are_public() {
        let now = Utc::now();
        let (post, _, stranger) = fixture(false, Some(now - TimeDelta::hours(1)));

        assert!(can_view(&post, None, now));
        assert!(can_view(&post, Some(stranger), now));
    }

    #[test]
    fn drafts_are_visible_to_the_author_only() {
        let now = Utc::now();
        let (post, author, stranger) = fixture(true, None);

        assert!(can_view(&post, Some(author), now));
        assert!(!can_view(&post, Some(stranger), now));
        assert!(!can_view(&post, None, now));
    }

    #[test]
    fn scheduled_posts_are_visible_to_the_author_only() {
        let now = Utc::now();
        let (post, author, stranger) = fixture(false, Some(now + TimeDelta::days(1)));

        assert!(can_view(&post, Some(author), now));
        assert!(!can_view(&post, Some(stranger), now));
        assert!(!can_view(&post, None, now));
    }

    #[test]
    fn trashed_posts_are_visible_to_the_author_only() {
        let now = Utc::now();
        let (mut post, author, stranger) = fixture(false, Some(now - TimeDelta::days(1)));
        post.deleted_at = Some(now);

        assert!(can_view(&post, Some(author), now));
        assert!(!can_view(&post, Some(stranger), now));
    }

    #[test]
    fn the_author_can_always_view_their_own_post() {
        let now = Utc::now();
        for (is_draft, published_at, deleted) in [
            (true, None, false),
            (false, Some(now + TimeDelta::days(2)), false),
            (false, Some(now - TimeDelta::days(2)), false),
            (false, Some(now - TimeDelta::days(2)), true),
        ] {
            let (mut post, author, _) = fixture(is_draft, published_at);
            if deleted {
                post.deleted_at = Some(now);
            }
            assert!(can_view(&post, Some(author), now));
        }
    }

    #[test]
    fn only_the_author_may_mutate() {
        let now = Utc::now();
        let (post, author, stranger) = fixture(false, Some(now));

        for action in [Action::Update, Action::Delete, Action::Restore] {
            assert!(can_mutate(&post, author, action));
            assert!(!can_mutate(&post, stranger, action));
        }
    }
}
