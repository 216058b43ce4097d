//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use quill_core::domain::{Comment, Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{CommentRepository, PostRepository, UserRepository};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::Entity as PostEntity;
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::PostgresBaseRepository;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user = %username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_with_authors(&self) -> Result<Vec<(Post, Option<User>)>, RepoError> {
        let result = PostEntity::find()
            .find_also_related(UserEntity)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result
            .into_iter()
            .map(|(post, author)| (post.into(), author.map(Into::into)))
            .collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_by_post_with_authors(
        &self,
        post_id: Uuid,
    ) -> Result<Vec<(Comment, Option<User>)>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .find_also_related(UserEntity)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result
            .into_iter()
            .map(|(c, author)| (c.into(), author.map(Into::into)))
            .collect())
    }
}
