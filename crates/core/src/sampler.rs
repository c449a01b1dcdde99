//! Deterministic daily question sampling.
//!
//! The draw for a date depends only on the date key and the pool, so the same
//! day always yields the same questions while the catalog is unchanged.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;

use crate::model::{Difficulty, QuestionId, TopicTotals};

/// Questions drawn per date.
pub const DAILY_QUESTION_COUNT: usize = 5;

/// Every question in the catalog, one id per `(topic, difficulty, ordinal)`.
///
/// Order: topic order, then easy, medium, hard, then ascending ordinal.
#[must_use]
pub fn question_pool(topic_totals: &TopicTotals) -> Vec<QuestionId> {
    let mut pool = Vec::new();
    for (topic, counts) in topic_totals.iter() {
        for difficulty in Difficulty::ALL {
            for ordinal in 1..=counts.get(difficulty) {
                if let Ok(id) = QuestionId::new(topic, difficulty, ordinal) {
                    pool.push(id);
                }
            }
        }
    }
    pool
}

/// Stable 64-bit FNV-1a hash of the date key, used as the RNG seed.
#[must_use]
pub fn seed_for(date_key: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    date_key
        .bytes()
        .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
}

/// Draw up to [`DAILY_QUESTION_COUNT`] distinct questions for `date_key`.
///
/// Pools no larger than the draw size are returned whole, in pool order.
#[must_use]
pub fn daily_questions(pool: &[QuestionId], date_key: &str) -> Vec<QuestionId> {
    if pool.len() <= DAILY_QUESTION_COUNT {
        return pool.to_vec();
    }
    let mut rng = StdRng::seed_from_u64(seed_for(date_key));
    index::sample(&mut rng, pool.len(), DAILY_QUESTION_COUNT)
        .iter()
        .map(|i| pool[i].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DifficultyCounts;
    use std::collections::HashSet;

    fn totals() -> TopicTotals {
        let mut totals = TopicTotals::new();
        totals.insert("Trees", DifficultyCounts::new(3, 2, 1));
        totals.insert("Arrays", DifficultyCounts::new(2, 0, 1));
        totals
    }

    #[test]
    fn pool_order_is_topic_then_difficulty_then_ordinal() {
        let pool: Vec<String> = question_pool(&totals()).iter().map(ToString::to_string).collect();
        assert_eq!(
            pool,
            vec![
                "Arrays_easy_1",
                "Arrays_easy_2",
                "Arrays_hard_1",
                "Trees_easy_1",
                "Trees_easy_2",
                "Trees_easy_3",
                "Trees_medium_1",
                "Trees_medium_2",
                "Trees_hard_1",
            ]
        );
    }

    #[test]
    fn same_date_same_draw() {
        let pool = question_pool(&totals());
        let a = daily_questions(&pool, "2024-03-01");
        let b = daily_questions(&pool, "2024-03-01");
        assert_eq!(a, b);
    }

    #[test]
    fn draws_are_distinct_subsets_of_pool() {
        let pool = question_pool(&totals());
        for key in ["2024-03-01", "2024-03-02", "2025-12-31"] {
            let drawn = daily_questions(&pool, key);
            assert_eq!(drawn.len(), DAILY_QUESTION_COUNT);
            let unique: HashSet<_> = drawn.iter().collect();
            assert_eq!(unique.len(), drawn.len());
            assert!(drawn.iter().all(|q| pool.contains(q)));
        }
    }

    #[test]
    fn small_pool_is_returned_whole() {
        let mut small = TopicTotals::new();
        small.insert("Heaps", DifficultyCounts::new(1, 1, 1));
        let pool = question_pool(&small);
        assert_eq!(daily_questions(&pool, "2024-03-01"), pool);
        assert!(daily_questions(&[], "2024-03-01").is_empty());
    }

    #[test]
    fn seed_is_stable() {
        assert_eq!(seed_for(""), 0xcbf2_9ce4_8422_2325);
        assert_ne!(seed_for("2024-03-01"), seed_for("2024-03-02"));
    }
}
