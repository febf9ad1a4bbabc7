use crate::domain::{elo, ActionKind, Vote};
use crate::infrastructure::db::{SuggestionRepository, UserRepository, VoteRepository};
use crate::infrastructure::quota::QuotaTracker;
use pairvote_errors::AppError;
use sea_orm::{DatabaseConnection, SqlErr, TransactionTrait};

/// The "cast a vote" operation. Stages run in order: Validate, QuotaCheck,
/// DuplicateCheck, Persist, RatingUpdate. The first failure aborts the rest,
/// and everything after Validate shares one transaction.
pub struct CastVote {
    db: DatabaseConnection,
    users: UserRepository,
    suggestions: SuggestionRepository,
    quota: QuotaTracker,
}

impl CastVote {
    pub fn new(
        db: DatabaseConnection,
        users: UserRepository,
        suggestions: SuggestionRepository,
        quota: QuotaTracker,
    ) -> Self {
        Self {
            db,
            users,
            suggestions,
            quota,
        }
    }

    pub async fn execute(
        &self,
        user_id: &str,
        winner_id: i64,
        loser_id: i64,
    ) -> Result<Vote, AppError> {
        // Validate
        if winner_id == loser_id {
            return Err(AppError::invalid_input("winner and loser must differ"));
        }
        if self.suggestions.find_pair(winner_id, loser_id).await?.len() != 2 {
            return Err(AppError::invalid_input(
                "winner and loser must reference existing suggestions",
            ));
        }
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::not_found("user"));
        }

        // An early return drops the transaction and rolls everything back,
        // including the quota increment.
        let txn = self.db.begin().await?;

        // QuotaCheck
        if !self
            .quota
            .check_and_consume(&txn, user_id, ActionKind::Vote)
            .await?
        {
            return Err(AppError::quota_exceeded("vote"));
        }

        // DuplicateCheck (friendly path; the unordered-pair unique index
        // turns a lost race into a unique violation below)
        if VoteRepository::exists_for_pair_in(&txn, user_id, winner_id, loser_id).await? {
            return Err(AppError::DuplicatePair);
        }

        // Persist
        let vote = match VoteRepository::insert_in(&txn, user_id, winner_id, loser_id).await {
            Ok(model) => model,
            Err(err) => {
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    return Err(AppError::DuplicatePair);
                }
                return Err(err.into());
            }
        };

        // RatingUpdate
        self.apply_rating(&txn, winner_id, loser_id).await?;

        txn.commit().await?;

        tracing::debug!(user_id, winner_id, loser_id, "vote recorded");
        Ok(vote.into())
    }

    /// Elo update over both locked rows. Reads happen before either write,
    /// inside the vote's transaction, so concurrent votes touching the same
    /// suggestion cannot lose updates.
    async fn apply_rating(
        &self,
        txn: &sea_orm::DatabaseTransaction,
        winner_id: i64,
        loser_id: i64,
    ) -> Result<(), AppError> {
        let rows = SuggestionRepository::lock_pair_in(txn, winner_id, loser_id).await?;

        let winner = rows
            .iter()
            .find(|s| s.id == winner_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("suggestion"))?;
        let loser = rows
            .into_iter()
            .find(|s| s.id == loser_id)
            .ok_or_else(|| AppError::not_found("suggestion"))?;

        let delta = elo::rating_delta(winner.rating, loser.rating);
        let winner_rating = winner.rating + delta;
        let loser_rating = loser.rating - delta;

        SuggestionRepository::set_rating_in(txn, winner, winner_rating).await?;
        SuggestionRepository::set_rating_in(txn, loser, loser_rating).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::entities::{suggestion, user, vote};
    use crate::infrastructure::quota::{Clock, QuotaLimits, QuotaTracker};
    use chrono::{DateTime, TimeZone, Utc};
    use chrono_tz::Tz;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    struct Frozen(DateTime<Utc>);
    impl Clock for Frozen {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    // 15:00 UTC on 2025-03-10 is mid-morning in Toronto, same civil date.
    fn quota() -> QuotaTracker {
        let tz: Tz = "America/Toronto".parse().unwrap();
        QuotaTracker::new(
            tz,
            QuotaLimits {
                suggestions_per_day: Some(5),
                votes_per_day: Some(10),
            },
            Arc::new(Frozen(Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap())),
        )
    }

    fn sug(id: i64, rating: i32) -> suggestion::Model {
        suggestion::Model {
            id,
            description: format!("suggestion {id}"),
            user_id: None,
            rating,
            created_at: None,
            updated_at: None,
        }
    }

    fn voter(votes_today: i32, last_vote_date: Option<&str>) -> user::Model {
        user::Model {
            id: "u1".into(),
            email: "u1@example.com".into(),
            name: "U1".into(),
            suggestions_today: 0,
            votes_today,
            last_suggestion_date: None,
            last_vote_date: last_vote_date.map(str::to_string),
            created_at: None,
            updated_at: None,
        }
    }

    fn recorded(winner_id: i64, loser_id: i64) -> vote::Model {
        vote::Model {
            id: 1,
            winner_id,
            loser_id,
            user_id: "u1".into(),
            created_at: None,
        }
    }

    fn use_case(db: sea_orm::DatabaseConnection) -> CastVote {
        CastVote::new(
            db.clone(),
            UserRepository::new(db.clone()),
            SuggestionRepository::new(db),
            quota(),
        )
    }

    #[tokio::test]
    async fn second_vote_on_same_pair_rejected_in_swapped_order() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // first vote, winner 1 over loser 2
            .append_query_results([vec![sug(1, 1500), sug(2, 1500)]]) // pair lookup
            .append_query_results([vec![voter(0, None)]]) // user lookup
            .append_query_results([vec![voter(0, None)]]) // quota row lock
            .append_query_results([vec![voter(1, Some("2025-03-10"))]]) // quota write
            .append_query_results([Vec::<vote::Model>::new()]) // no prior vote
            .append_query_results([vec![recorded(1, 2)]]) // vote insert
            .append_query_results([vec![sug(1, 1500), sug(2, 1500)]]) // rating lock
            .append_query_results([vec![sug(1, 1516)]]) // winner write
            .append_query_results([vec![sug(2, 1484)]]) // loser write
            // second vote, same pair with winner and loser swapped
            .append_query_results([vec![sug(1, 1516), sug(2, 1484)]])
            .append_query_results([vec![voter(1, Some("2025-03-10"))]])
            .append_query_results([vec![voter(1, Some("2025-03-10"))]])
            .append_query_results([vec![voter(2, Some("2025-03-10"))]])
            .append_query_results([vec![recorded(1, 2)]]) // prior vote found
            .into_connection();

        let cast = use_case(db);

        let first = cast.execute("u1", 1, 2).await.unwrap();
        assert_eq!((first.winner_id, first.loser_id), (1, 2));

        let second = cast.execute("u1", 2, 1).await;
        assert!(matches!(second, Err(AppError::DuplicatePair)));
    }

    #[tokio::test]
    async fn vote_at_daily_limit_is_rejected_without_writes() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sug(1, 1500), sug(2, 1500)]])
            .append_query_results([vec![voter(10, Some("2025-03-10"))]])
            .append_query_results([vec![voter(10, Some("2025-03-10"))]])
            .into_connection();

        let cast = use_case(db);

        let result = cast.execute("u1", 1, 2).await;
        assert!(matches!(result, Err(AppError::QuotaExceeded(_))));
    }

    #[tokio::test]
    async fn vote_against_self_rejected_before_any_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let cast = use_case(db);

        let result = cast.execute("u1", 7, 7).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
