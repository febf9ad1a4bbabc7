use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub id: i64,
    pub winner_id: i64,
    pub loser_id: i64,
    pub user_id: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotePage {
    pub items: Vec<Vote>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}
