//! Random question selection for a new test.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::SessionError;
use crate::model::Question;

/// Pick `count` distinct questions from `pool` in random order.
///
/// The pool is copied, never shuffled in place.
pub fn select(pool: &[Question], count: usize) -> Result<Vec<Question>, SessionError> {
    select_with_rng(pool, count, &mut rand::rng())
}

/// [`select`] with a caller-supplied random source.
pub fn select_with_rng<R: Rng + ?Sized>(
    pool: &[Question],
    count: usize,
    rng: &mut R,
) -> Result<Vec<Question>, SessionError> {
    if pool.is_empty() || pool.len() < count {
        return Err(SessionError::InsufficientPool {
            available: pool.len(),
            requested: count,
        });
    }

    let mut picked = pool.to_vec();
    picked.shuffle(rng);
    picked.truncate(count);

    tracing::debug!(pool = pool.len(), count, "selected questions for test");
    Ok(picked)
}
