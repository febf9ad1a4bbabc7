pub mod elo;
pub mod pairing;

mod suggestion;
mod user;
mod vote;

pub use suggestion::{SortKey, SortOrder, Suggestion, SuggestionPage, BASELINE_RATING};
pub use user::{ActionKind, User};
pub use vote::{Vote, VotePage};
