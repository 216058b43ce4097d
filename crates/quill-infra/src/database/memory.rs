//! In-memory repository implementations - used for tests and for running
//! without a configured database.
//!
//! The store mirrors the relational constraints the migration sets up:
//! unique usernames, foreign keys on authorship and comment parentage, and
//! cascade deletes. Data is lost on process restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Comment, Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CommentRepository, PostRepository, UserRepository};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
}

/// Shared in-memory storage handle. Clone it into each repository.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// In-memory user repository.
pub struct InMemoryUserRepository {
    store: InMemoryStore,
}

impl InMemoryUserRepository {
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        // Cascade: the user's posts, and every comment they authored or
        // that hangs off a removed post.
        tables.posts.retain(|_, p| p.author_id != id);
        let live_posts: Vec<Uuid> = tables.posts.keys().copied().collect();
        tables
            .comments
            .retain(|_, c| c.author_id != id && live_posts.contains(&c.post_id));
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

/// In-memory post repository.
pub struct InMemoryPostRepository {
    store: InMemoryStore,
}

impl InMemoryPostRepository {
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.posts.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.users.contains_key(&post.author_id) {
            return Err(RepoError::Constraint(
                "Referenced entity does not exist".to_string(),
            ));
        }
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.posts.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        // Cascade: comments on the post.
        tables.comments.retain(|_, c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list_with_authors(&self) -> Result<Vec<(Post, Option<User>)>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut posts: Vec<(Post, Option<User>)> = tables
            .posts
            .values()
            .map(|p| (p.clone(), tables.users.get(&p.author_id).cloned()))
            .collect();
        posts.sort_by_key(|(p, _)| p.created_at);
        Ok(posts)
    }
}

/// In-memory comment repository.
pub struct InMemoryCommentRepository {
    store: InMemoryStore,
}

impl InMemoryCommentRepository {
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.comments.get(&id).cloned())
    }

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.users.contains_key(&comment.author_id)
            || !tables.posts.contains_key(&comment.post_id)
        {
            return Err(RepoError::Constraint(
                "Referenced entity does not exist".to_string(),
            ));
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.comments.contains_key(&comment.id) {
            return Err(RepoError::NotFound);
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.comments.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn list_by_post_with_authors(
        &self,
        post_id: Uuid,
    ) -> Result<Vec<(Comment, Option<User>)>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut comments: Vec<(Comment, Option<User>)> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .map(|c| (c.clone(), tables.users.get(&c.author_id).cloned()))
            .collect();
        comments.sort_by_key(|(c, _)| c.created_at);
        Ok(comments)
    }
}
