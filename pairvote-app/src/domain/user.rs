use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub suggestions_today: i32,
    pub votes_today: i32,
    /// Civil date (`YYYY-MM-DD` in the configured zone) of the last counted
    /// suggestion. Always written together with `suggestions_today`.
    pub last_suggestion_date: Option<String>,
    pub last_vote_date: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// The two quota-tracked write actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Suggestion,
    Vote,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Suggestion => "suggestion",
            Self::Vote => "vote",
        }
    }
}
