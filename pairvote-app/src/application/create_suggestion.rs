use crate::domain::{ActionKind, Suggestion, BASELINE_RATING};
use crate::infrastructure::db::{SuggestionRepository, UserRepository};
use crate::infrastructure::quota::QuotaTracker;
use pairvote_errors::AppError;
use sea_orm::{DatabaseConnection, TransactionTrait};

const MAX_DESCRIPTION_LENGTH: usize = 500;

/// The "create a suggestion" operation: daily quota, then insert at the
/// baseline rating, both in one transaction.
pub struct CreateSuggestion {
    db: DatabaseConnection,
    users: UserRepository,
    quota: QuotaTracker,
}

impl CreateSuggestion {
    pub fn new(db: DatabaseConnection, users: UserRepository, quota: QuotaTracker) -> Self {
        Self { db, users, quota }
    }

    pub async fn execute(&self, user_id: &str, description: &str) -> Result<Suggestion, AppError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(AppError::invalid_input("description must not be empty"));
        }
        if description.len() > MAX_DESCRIPTION_LENGTH {
            return Err(AppError::invalid_input("description too long"));
        }

        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::not_found("user"));
        }

        let txn = self.db.begin().await?;

        if !self
            .quota
            .check_and_consume(&txn, user_id, ActionKind::Suggestion)
            .await?
        {
            return Err(AppError::quota_exceeded("suggestion"));
        }

        let model =
            SuggestionRepository::insert_in(&txn, user_id, description, BASELINE_RATING).await?;

        txn.commit().await?;

        tracing::debug!(user_id, suggestion_id = model.id, "suggestion created");
        Ok(model.into())
    }
}
