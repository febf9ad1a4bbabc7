use crate::application::{
    CastVote, CreateSuggestion, CurrentUser, EnsureUser, ListSuggestions, ListUserVotes,
    SamplePair,
};
use crate::config::AppConfig;
use crate::infrastructure::db::{SuggestionRepository, UserRepository, VoteRepository};
use crate::infrastructure::quota::{QuotaLimits, QuotaTracker, SystemClock};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    pub create_suggestion: Arc<CreateSuggestion>,
    pub list_suggestions: Arc<ListSuggestions>,
    pub sample_pair: Arc<SamplePair>,
    pub cast_vote: Arc<CastVote>,
    pub ensure_user: Arc<EnsureUser>,
    pub current_user: Arc<CurrentUser>,
    pub list_user_votes: Arc<ListUserVotes>,
    pub suggestions: SuggestionRepository,
}

impl AppContext {
    pub fn new(db: DatabaseConnection, config: &AppConfig) -> Self {
        let users = UserRepository::new(db.clone());
        let suggestions = SuggestionRepository::new(db.clone());
        let votes = VoteRepository::new(db.clone());

        let quota = QuotaTracker::new(
            config.quota_timezone,
            QuotaLimits {
                suggestions_per_day: config.daily_suggestion_limit,
                votes_per_day: config.daily_vote_limit,
            },
            Arc::new(SystemClock),
        );

        Self {
            create_suggestion: Arc::new(CreateSuggestion::new(
                db.clone(),
                users.clone(),
                quota.clone(),
            )),
            list_suggestions: Arc::new(ListSuggestions::new(suggestions.clone())),
            sample_pair: Arc::new(SamplePair::new(suggestions.clone(), votes.clone())),
            cast_vote: Arc::new(CastVote::new(
                db,
                users.clone(),
                suggestions.clone(),
                quota.clone(),
            )),
            ensure_user: Arc::new(EnsureUser::new(users.clone())),
            current_user: Arc::new(CurrentUser::new(users, quota)),
            list_user_votes: Arc::new(ListUserVotes::new(votes)),
            suggestions,
        }
    }
}
