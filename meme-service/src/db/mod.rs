/// Database access layer for meme-service
///
/// Repositories are defined as traits so the service layer can run against
/// either the Postgres implementations or in-memory test doubles.
pub mod post_repo;
pub mod sequence;

pub use post_repo::{PgPostRepository, PostRepository};
pub use sequence::{PgSequenceAllocator, SequenceAllocator};
