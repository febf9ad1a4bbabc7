use super::entities::{suggestion, Suggestion};
use crate::domain::{SortKey, SortOrder};
use sea_orm::{entity::*, query::*, ConnectionTrait, DatabaseConnection, DbErr};

#[derive(Clone)]
pub struct SuggestionRepository {
    db: DatabaseConnection,
}

impl SuggestionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<suggestion::Model>, DbErr> {
        Suggestion::find_by_id(id).one(&self.db).await
    }

    /// Both records of an unordered pair, in unspecified order.
    pub async fn find_pair(
        &self,
        a: i64,
        b: i64,
    ) -> Result<Vec<suggestion::Model>, DbErr> {
        Suggestion::find()
            .filter(suggestion::Column::Id.is_in([a, b]))
            .all(&self.db)
            .await
    }

    /// Every suggestion id, ascending. O(N) and id-only: the pair sampler
    /// works on indices, never on materialised pair sets.
    pub async fn all_ids(&self) -> Result<Vec<i64>, DbErr> {
        Suggestion::find()
            .select_only()
            .column(suggestion::Column::Id)
            .order_by_asc(suggestion::Column::Id)
            .into_tuple::<i64>()
            .all(&self.db)
            .await
    }

    pub async fn page(
        &self,
        page: u64,
        page_size: u64,
        sort_by: SortKey,
        sort_order: SortOrder,
    ) -> Result<(Vec<suggestion::Model>, u64), DbErr> {
        let column = match sort_by {
            SortKey::Id => suggestion::Column::Id,
            SortKey::Description => suggestion::Column::Description,
            SortKey::Rating => suggestion::Column::Rating,
            SortKey::CreatedAt => suggestion::Column::CreatedAt,
            SortKey::UpdatedAt => suggestion::Column::UpdatedAt,
        };
        let query = match sort_order {
            SortOrder::Asc => Suggestion::find().order_by_asc(column),
            SortOrder::Desc => Suggestion::find().order_by_desc(column),
        };

        let paginator = query.paginate(&self.db, page_size);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// Insert within the caller's transaction.
    pub async fn insert_in<C: ConnectionTrait>(
        conn: &C,
        user_id: &str,
        description: &str,
        rating: i32,
    ) -> Result<suggestion::Model, DbErr> {
        let now = chrono::Utc::now();
        let active = suggestion::ActiveModel {
            description: Set(description.to_string()),
            user_id: Set(Some(user_id.to_string())),
            rating: Set(rating),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };
        active.insert(conn).await
    }

    /// Read both rows under `FOR UPDATE` so a concurrent vote touching
    /// either suggestion waits instead of losing an update. Must run inside
    /// a transaction.
    pub async fn lock_pair_in<C: ConnectionTrait>(
        conn: &C,
        a: i64,
        b: i64,
    ) -> Result<Vec<suggestion::Model>, DbErr> {
        Suggestion::find()
            .filter(suggestion::Column::Id.is_in([a, b]))
            .order_by_asc(suggestion::Column::Id)
            .lock_exclusive()
            .all(conn)
            .await
    }

    pub async fn set_rating_in<C: ConnectionTrait>(
        conn: &C,
        model: suggestion::Model,
        rating: i32,
    ) -> Result<suggestion::Model, DbErr> {
        let mut active: suggestion::ActiveModel = model.into();
        active.rating = Set(rating);
        active.updated_at = Set(Some(chrono::Utc::now()));
        active.update(conn).await
    }
}
