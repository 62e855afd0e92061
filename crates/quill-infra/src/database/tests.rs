#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{TimeDelta, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use uuid::Uuid;

    use quill_core::domain::Post;
    use quill_core::error::RepoError;
    use quill_core::policy::{PostQuery, StatusFilter};
    use quill_core::ports::PostRepository;

    use crate::database::entity::post;
    use crate::database::postgres_repo::PostgresPostRepository;

    fn model(deleted: bool) -> post::Model {
        let now = Utc::now();
        post::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Test Post".to_owned(),
            content: "Content".to_owned(),
            is_draft: false,
            published_at: Some((now - TimeDelta::hours(1)).into()),
            created_at: now.into(),
            updated_at: now.into(),
            deleted_at: deleted.then(|| now.into()),
        }
    }

    #[tokio::test]
    async fn find_maps_the_row_into_a_domain_post() {
        let row = model(false);
        let post_id = row.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![row]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find(post_id, false).await.unwrap();

        let post = result.unwrap();
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.id, post_id);
        assert!(!post.is_draft);
        assert_eq!(post.deleted_at, None);
    }

    #[tokio::test]
    async fn list_returns_items_with_pagination_counters() {
        let row = model(false);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // First the COUNT(*) for num_items, then the page itself.
            .append_query_results(vec![vec![BTreeMap::from([(
                "num_items",
                Value::BigInt(Some(1)),
            )])]])
            .append_query_results(vec![vec![row]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let page = repo
            .list(
                PostQuery::new(StatusFilter::Published, None, 1),
                Utc::now(),
            )
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.per_page, 20);
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn unsatisfiable_listing_never_touches_the_database() {
        // No expectations appended: any query would panic the mock.
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = PostgresPostRepository::new(db);

        let page = repo
            .list(PostQuery::new(StatusFilter::Draft, None, 1), Utc::now())
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn soft_delete_of_a_missing_post_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let err = repo
            .soft_delete(Uuid::new_v4(), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }

    #[tokio::test]
    async fn restore_reports_success_when_a_row_was_touched() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        repo.restore(Uuid::new_v4()).await.unwrap();
    }
}
