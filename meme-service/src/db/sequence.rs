/// Sequence allocation for post ids
///
/// Counters live in the `sequence_counters` table, one row per name. The
/// increment-and-read is a single statement, so the store is the atomicity
/// boundary: uniqueness holds across concurrent requests and across
/// multiple service instances without any in-process lock.
use crate::error::Result;
use sqlx::PgPool;

/// Allocates unique, strictly increasing integer ids from a named counter.
#[async_trait::async_trait]
pub trait SequenceAllocator: Send + Sync {
    /// Increment the counter `sequence_name` and return the new value.
    ///
    /// A counter that does not exist yet is treated as 0, so the first
    /// allocation for a name returns 1.
    async fn next(&self, sequence_name: &str) -> Result<i64>;
}

/// Postgres-backed allocator.
pub struct PgSequenceAllocator {
    pool: PgPool,
}

impl PgSequenceAllocator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SequenceAllocator for PgSequenceAllocator {
    async fn next(&self, sequence_name: &str) -> Result<i64> {
        // Upsert keeps the find-and-increment atomic; a read followed by a
        // write would let two callers observe the same value.
        let (value,) = sqlx::query_as::<_, (i64,)>(
            r#"
            INSERT INTO sequence_counters (name, value)
            VALUES ($1, 1)
            ON CONFLICT (name)
            DO UPDATE SET value = sequence_counters.value + 1
            RETURNING value
            "#,
        )
        .bind(sequence_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(value)
    }
}
