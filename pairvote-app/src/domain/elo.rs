//! Elo rating maths for a single pairwise outcome.
//!
//! Deterministic and pure: the delta is fully determined by the two current
//! ratings. Reads must happen before any write within the same operation;
//! the repository layer enforces that with row locks.

/// How much a single outcome can move a rating.
pub const K_FACTOR: f64 = 32.0;

/// Win probability of the winner given both current ratings, in `[0, 1]`.
pub fn expected_score(winner_rating: i32, loser_rating: i32) -> f64 {
    1.0 / (1.0 + 10f64.powf(f64::from(loser_rating - winner_rating) / 400.0))
}

/// Points transferred from loser to winner. Always >= 0; the update is
/// zero-sum (`winner += delta`, `loser -= delta`). Ratings are unclamped.
pub fn rating_delta(winner_rating: i32, loser_rating: i32) -> i32 {
    (K_FACTOR * (1.0 - expected_score(winner_rating, loser_rating))).round() as i32
}
