/// Post service - the business-logic surface behind the HTTP layer
///
/// Orchestrates validation, duplicate detection, id allocation, and store
/// calls. No state is held across requests beyond what lives in the store.
use crate::db::{PostRepository, SequenceAllocator};
use crate::error::{AppError, Result};
use crate::models::{Post, PostDraft, PostUpdate};
use crate::services::validation::PostValidator;
use chrono::Utc;
use std::sync::Arc;

/// How many posts the listing endpoint returns.
pub const RECENT_POSTS_LIMIT: usize = 100;

pub struct PostService {
    repository: Arc<dyn PostRepository>,
    sequences: Arc<dyn SequenceAllocator>,
    validator: PostValidator,
}

impl PostService {
    pub fn new(
        repository: Arc<dyn PostRepository>,
        sequences: Arc<dyn SequenceAllocator>,
        validator: PostValidator,
    ) -> Self {
        Self {
            repository,
            sequences,
            validator,
        }
    }

    /// The 100 most recent posts, newest first.
    ///
    /// Ids are allocated monotonically, so id order is creation order.
    pub async fn list_recent_posts(&self) -> Result<Vec<Post>> {
        let mut posts = self.repository.list_all().await?;
        posts.sort_by(|a, b| b.id.cmp(&a.id));
        posts.truncate(RECENT_POSTS_LIMIT);

        Ok(posts)
    }

    /// Get a post by id.
    pub async fn get_post(&self, post_id: i64) -> Result<Post> {
        self.repository.get(post_id).await
    }

    /// Create a new post and return its allocated id.
    pub async fn create_post(&self, draft: PostDraft) -> Result<i64> {
        self.validator.validate_draft(&draft).await?;

        // Validation guarantees the fields are present and non-blank.
        let name = draft.name.unwrap_or_default();
        let url = draft.url.unwrap_or_default();
        let caption = draft.caption.unwrap_or_default();

        // Duplicate scan over every stored post. No uniqueness index exists
        // at this layer, so creation cost is O(n).
        let existing = self.repository.list_all().await?;
        if existing
            .iter()
            .any(|post| post.name == name && post.url == url && post.caption == caption)
        {
            return Err(AppError::Conflict(
                "a post with the same name, url, and caption already exists".to_string(),
            ));
        }

        let id = self.sequences.next(Post::SEQUENCE_NAME).await?;

        let post = Post {
            id,
            name,
            url,
            caption,
            date_posted: Utc::now().date_naive(),
        };

        self.repository.insert(&post).await
    }

    /// Apply a partial update to a post.
    ///
    /// Updates are validated before the store is touched, so an invalid
    /// update fails with a validation error even for an unknown id.
    pub async fn update_post(&self, post_id: i64, update: PostUpdate) -> Result<()> {
        self.validator.validate_update(&update).await?;
        self.repository.update(post_id, &update).await
    }
}
