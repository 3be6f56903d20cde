//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Select};
use uuid::Uuid;

use quill_core::domain::{Author, Post};
use quill_core::error::RepoError;
use quill_core::ports::{AuthorRepository, PostRepository};

use super::entity::author::{self, Entity as AuthorEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{ListOrder, PostgresBaseRepository, map_db_err};

/// PostgreSQL author repository.
pub type PostgresAuthorRepository = PostgresBaseRepository<AuthorEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

impl ListOrder for AuthorEntity {
    fn list_order(select: Select<Self>) -> Select<Self> {
        select.order_by_asc(author::Column::UserName)
    }
}

impl ListOrder for PostEntity {
    fn list_order(select: Select<Self>) -> Select<Self> {
        select.order_by_desc(post::Column::Created)
    }
}

#[async_trait]
impl AuthorRepository for PostgresAuthorRepository {
    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<Author>, RepoError> {
        tracing::debug!(user_name, "Finding author by user name");

        let result = AuthorEntity::find()
            .filter(author::Column::UserName.eq(user_name))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::list_order(PostEntity::find())
            .filter(post::Column::AuthorId.eq(author_id))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn delete_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        let result = PostEntity::delete_many()
            .filter(post::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        tracing::debug!(%author_id, rows = result.rows_affected, "Deleted posts by author");
        Ok(result.rows_affected)
    }
}
