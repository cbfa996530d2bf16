/// Business logic layer for meme-service
///
/// - Post service: creation, retrieval, partial updates
/// - Validation: field checks and the outbound image-reachability probe
pub mod posts;
pub mod validation;

// Re-export commonly used services
pub use posts::{PostService, RECENT_POSTS_LIMIT};
pub use validation::{HttpImageUrlProbe, ImageUrlProbe, PostValidator};
