mod cast_vote;
mod create_suggestion;
mod list_suggestions;
mod sample_pair;
mod users;

pub use cast_vote::CastVote;
pub use create_suggestion::CreateSuggestion;
pub use list_suggestions::ListSuggestions;
pub use sample_pair::SamplePair;
pub use users::{CurrentUser, EnsureUser, ListUserVotes};
