use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment entity - attached to a post, owned by its author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub author_id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Create a new comment against a post.
    pub fn new(author_id: Uuid, post_id: Uuid, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            post_id,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the content when present. Same presence semantics as
    /// [`crate::domain::Post::apply_update`].
    pub fn apply_update(&mut self, content: Option<String>) {
        if let Some(content) = content {
            self.content = content;
        }
        self.updated_at = Utc::now();
    }
}
