use crate::domain::{SortKey, SortOrder, SuggestionPage};
use crate::infrastructure::db::SuggestionRepository;
use pairvote_errors::AppError;

const MAX_PAGE_SIZE: u64 = 100;

/// Ranked/paginated suggestion listing. Sort inputs go through the
/// allow-list parse; anything unknown becomes (`created_at`, `desc`).
pub struct ListSuggestions {
    suggestions: SuggestionRepository,
}

impl ListSuggestions {
    pub fn new(suggestions: SuggestionRepository) -> Self {
        Self { suggestions }
    }

    pub async fn execute(
        &self,
        page: Option<u64>,
        page_size: Option<u64>,
        sort_by: Option<&str>,
        sort_order: Option<&str>,
    ) -> Result<SuggestionPage, AppError> {
        let page = page.unwrap_or(1).max(1);
        let page_size = page_size.unwrap_or(10).clamp(1, MAX_PAGE_SIZE);

        let (items, total) = self
            .suggestions
            .page(
                page,
                page_size,
                SortKey::parse(sort_by),
                SortOrder::parse(sort_order),
            )
            .await?;

        Ok(SuggestionPage {
            items: items.into_iter().map(Into::into).collect(),
            total,
            page,
            page_size,
        })
    }
}
