use super::entities::{vote, Vote};
use sea_orm::{entity::*, query::*, Condition, ConnectionTrait, DatabaseConnection, DbErr};

#[derive(Clone)]
pub struct VoteRepository {
    db: DatabaseConnection,
}

impl VoteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Whether this user already voted on the unordered pair {a, b},
    /// in either winner/loser order. Runs in the caller's transaction so
    /// the answer stays consistent with the insert that follows it.
    pub async fn exists_for_pair_in<C: ConnectionTrait>(
        conn: &C,
        user_id: &str,
        a: i64,
        b: i64,
    ) -> Result<bool, DbErr> {
        let found = Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(vote::Column::WinnerId.eq(a))
                            .add(vote::Column::LoserId.eq(b)),
                    )
                    .add(
                        Condition::all()
                            .add(vote::Column::WinnerId.eq(b))
                            .add(vote::Column::LoserId.eq(a)),
                    ),
            )
            .one(conn)
            .await?;
        Ok(found.is_some())
    }

    /// The (winner_id, loser_id) of every vote this user has cast. The
    /// sampler normalizes these into unordered pair identities.
    pub async fn voted_pairs(&self, user_id: &str) -> Result<Vec<(i64, i64)>, DbErr> {
        Vote::find()
            .select_only()
            .column(vote::Column::WinnerId)
            .column(vote::Column::LoserId)
            .filter(vote::Column::UserId.eq(user_id))
            .into_tuple::<(i64, i64)>()
            .all(&self.db)
            .await
    }

    pub async fn page_by_user(
        &self,
        user_id: &str,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<vote::Model>, u64), DbErr> {
        let paginator = Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .order_by_desc(vote::Column::CreatedAt)
            .paginate(&self.db, per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// Insert within the caller's transaction. A racing duplicate surfaces
    /// as a unique violation on the unordered-pair index.
    pub async fn insert_in<C: ConnectionTrait>(
        conn: &C,
        user_id: &str,
        winner_id: i64,
        loser_id: i64,
    ) -> Result<vote::Model, DbErr> {
        let active = vote::ActiveModel {
            winner_id: Set(winner_id),
            loser_id: Set(loser_id),
            user_id: Set(user_id.to_string()),
            created_at: Set(Some(chrono::Utc::now())),
            ..Default::default()
        };
        active.insert(conn).await
    }
}
