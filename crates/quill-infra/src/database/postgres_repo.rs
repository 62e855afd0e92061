//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, Condition, DbConn, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use quill_core::domain::{Post, User};
use quill_core::error::RepoError;
use quill_core::policy::{PAGE_SIZE, PostQuery, StatusFilter};
use quill_core::ports::{BaseRepository, Page, PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};

fn query_err(e: sea_orm::DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

fn constraint_or_query_err(e: sea_orm::DbErr) -> RepoError {
    let err_str = e.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") {
        RepoError::Constraint("Entity already exists".to_string())
    } else {
        RepoError::Query(err_str)
    }
}

/// PostgreSQL user repository.
pub struct PostgresUserRepository {
    db: DbConn,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let active: user::ActiveModel = user.into();
        let model = UserEntity::insert(active)
            .on_conflict(
                OnConflict::column(user::Column::Id)
                    .update_columns([
                        user::Column::Email,
                        user::Column::PasswordHash,
                        user::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(constraint_or_query_err)?;

        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        // Mask email for logging to avoid PII in logs
        let masked = if let Some(at_pos) = email.find('@') {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = if local.len() > 1 {
                format!("{}***", &local[..1])
            } else {
                "***".to_string()
            };
            format!("{}{}", masked_local, domain)
        } else {
            "***".to_string()
        };
        tracing::debug!(user_email = %masked, "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }
}

/// PostgreSQL post repository.
///
/// Tombstoned rows stay in the table; every reader here filters them out
/// unless asked not to.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    fn list_condition(query: &PostQuery, now: DateTime<Utc>) -> Condition {
        let mut condition = match query.status {
            StatusFilter::Published => Condition::all()
                .add(post::Column::IsDraft.eq(false))
                .add(post::Column::PublishedAt.lte(now))
                .add(post::Column::DeletedAt.is_null()),
            StatusFilter::Draft => Condition::all()
                .add(post::Column::IsDraft.eq(true))
                .add(post::Column::DeletedAt.is_null()),
            StatusFilter::Scheduled => Condition::all()
                .add(post::Column::IsDraft.eq(false))
                .add(post::Column::PublishedAt.gt(now))
                .add(post::Column::DeletedAt.is_null()),
            StatusFilter::Deleted => Condition::all().add(post::Column::DeletedAt.is_not_null()),
        };

        if let Some(author) = query.author_scope() {
            condition = condition.add(post::Column::UserId.eq(author));
        }

        condition
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find(&self, id: Uuid, include_deleted: bool) -> Result<Option<Post>, RepoError> {
        let mut select = PostEntity::find_by_id(id);
        if !include_deleted {
            select = select.filter(post::Column::DeletedAt.is_null());
        }

        let result = select.one(&self.db).await.map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let active: post::ActiveModel = post.into();
        let model = PostEntity::insert(active)
            .on_conflict(
                OnConflict::column(post::Column::Id)
                    .update_columns([
                        post::Column::Title,
                        post::Column::Content,
                        post::Column::IsDraft,
                        post::Column::PublishedAt,
                        post::Column::UpdatedAt,
                        post::Column::DeletedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(constraint_or_query_err)?;

        Ok(model.into())
    }

    async fn list(&self, query: PostQuery, now: DateTime<Utc>) -> Result<Page<Post>, RepoError> {
        // Owner-scoped filter with an anonymous viewer: nothing can match.
        if !query.is_satisfiable() {
            return Ok(Page::empty(query.page, PAGE_SIZE));
        }

        let paginator = PostEntity::find()
            .filter(Self::list_condition(&query, now))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .paginate(&self.db, PAGE_SIZE);

        let total = paginator.num_items().await.map_err(query_err)?;
        let items = paginator
            .fetch_page(query.page.saturating_sub(1))
            .await
            .map_err(query_err)?;

        Ok(Page {
            items: items.into_iter().map(Into::into).collect(),
            page: query.page,
            per_page: PAGE_SIZE,
            total,
        })
    }

    async fn soft_delete(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), RepoError> {
        let result = PostEntity::update_many()
            .col_expr(post::Column::DeletedAt, Expr::value(Some(at)))
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn restore(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::update_many()
            .col_expr(
                post::Column::DeletedAt,
                Expr::value(Option::<DateTime<Utc>>::None),
            )
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
