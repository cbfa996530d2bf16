/// HTTP request handlers for meme-service
pub mod posts;

pub use posts::{configure_routes, AppState};
