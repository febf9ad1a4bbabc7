use crate::domain::pairing::{normalize_pair, PairUniverse};
use crate::domain::Suggestion;
use crate::infrastructure::db::{SuggestionRepository, VoteRepository};
use pairvote_errors::AppError;
use rand::Rng;
use std::collections::HashSet;

/// Fair pair sampling: pick an unordered pair this user has not compared,
/// uniformly over all eligible pairs. `Ok(None)` means nothing is left to
/// vote on, which is a distinct condition rather than an error.
pub struct SamplePair {
    suggestions: SuggestionRepository,
    votes: VoteRepository,
}

impl SamplePair {
    pub fn new(suggestions: SuggestionRepository, votes: VoteRepository) -> Self {
        Self { suggestions, votes }
    }

    pub async fn execute(
        &self,
        user_id: &str,
    ) -> Result<Option<(Suggestion, Suggestion)>, AppError> {
        let ids = self.suggestions.all_ids().await?;
        if ids.len() < 2 {
            return Ok(None);
        }

        let voted: HashSet<(i64, i64)> = self
            .votes
            .voted_pairs(user_id)
            .await?
            .into_iter()
            .map(|(w, l)| normalize_pair(w, l))
            .collect();

        let universe = PairUniverse::new(ids, &voted);

        // ThreadRng is not Send, so it must not live across an await.
        let picked = {
            let mut rng = rand::thread_rng();
            universe.pick(&mut rng).map(|(a, b)| {
                // Presentation order should not always put the lower id first.
                if rng.gen_bool(0.5) {
                    (a, b)
                } else {
                    (b, a)
                }
            })
        };
        let Some((a, b)) = picked else {
            tracing::debug!(user_id, "no eligible pairs remain");
            return Ok(None);
        };

        let rows = self.suggestions.find_pair(a, b).await?;
        let first = rows
            .iter()
            .find(|s| s.id == a)
            .cloned()
            .ok_or_else(|| AppError::not_found("suggestion"))?;
        let second = rows
            .into_iter()
            .find(|s| s.id == b)
            .ok_or_else(|| AppError::not_found("suggestion"))?;

        Ok(Some((first.into(), second.into())))
    }
}
