use crate::domain::{User, VotePage};
use crate::infrastructure::db::{UserRepository, VoteRepository};
use crate::infrastructure::quota::QuotaTracker;
use pairvote_errors::AppError;

const MAX_PER_PAGE: u64 = 100;

/// Idempotent upsert on first authenticated contact. The boundary calls
/// this with an already-verified identity; no signup step exists.
pub struct EnsureUser {
    users: UserRepository,
}

impl EnsureUser {
    pub fn new(users: UserRepository) -> Self {
        Self { users }
    }

    pub async fn execute(&self, id: &str, email: &str, name: &str) -> Result<User, AppError> {
        if id.is_empty() || email.is_empty() {
            return Err(AppError::invalid_input("identity must carry id and email"));
        }
        let model = self.users.upsert(id, email, name).await?;
        Ok(model.into())
    }
}

/// Point read of the acting user, with stale daily counters presented as
/// already reset for the current civil day.
pub struct CurrentUser {
    users: UserRepository,
    quota: QuotaTracker,
}

impl CurrentUser {
    pub fn new(users: UserRepository, quota: QuotaTracker) -> Self {
        Self { users, quota }
    }

    pub async fn execute(&self, id: &str) -> Result<User, AppError> {
        let model = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("user"))?;
        Ok(self.quota.fresh_view(model.into()))
    }
}

/// Paginated vote history for one user, newest first.
pub struct ListUserVotes {
    votes: VoteRepository,
}

impl ListUserVotes {
    pub fn new(votes: VoteRepository) -> Self {
        Self { votes }
    }

    pub async fn execute(
        &self,
        user_id: &str,
        page: Option<u64>,
        per_page: Option<u64>,
    ) -> Result<VotePage, AppError> {
        let page = page.unwrap_or(1).max(1);
        let per_page = per_page.unwrap_or(10).clamp(1, MAX_PER_PAGE);

        let (items, total) = self.votes.page_by_user(user_id, page, per_page).await?;

        Ok(VotePage {
            items: items.into_iter().map(Into::into).collect(),
            total,
            page,
            per_page,
        })
    }
}
