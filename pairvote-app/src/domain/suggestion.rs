use serde::{Deserialize, Serialize};

/// Rating assigned to every freshly created suggestion.
pub const BASELINE_RATING: i32 = 1500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: i64,
    pub description: String,
    pub user_id: Option<String>,
    pub rating: i32,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionPage {
    pub items: Vec<Suggestion>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

/// Allow-listed sort columns for suggestion listing. Anything outside this
/// set falls back to `CreatedAt` rather than reaching the query builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Id,
    Description,
    Rating,
    CreatedAt,
    UpdatedAt,
}

impl SortKey {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("id") => Self::Id,
            Some("description") => Self::Description,
            Some("rating") => Self::Rating,
            Some("created_at") => Self::CreatedAt,
            Some("updated_at") => Self::UpdatedAt,
            _ => Self::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("asc") => Self::Asc,
            Some("desc") => Self::Desc,
            _ => Self::Desc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_sort_keys_parse() {
        assert_eq!(SortKey::parse(Some("rating")), SortKey::Rating);
        assert_eq!(SortKey::parse(Some("id")), SortKey::Id);
        assert_eq!(SortKey::parse(Some("updated_at")), SortKey::UpdatedAt);
    }

    #[test]
    fn unknown_sort_key_falls_back_to_created_at() {
        assert_eq!(SortKey::parse(Some("elo_score; DROP TABLE")), SortKey::CreatedAt);
        assert_eq!(SortKey::parse(None), SortKey::CreatedAt);
    }

    #[test]
    fn unknown_sort_order_falls_back_to_desc() {
        assert_eq!(SortOrder::parse(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("sideways")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(None), SortOrder::Desc);
    }
}
