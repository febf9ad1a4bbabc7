use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One pairwise outcome. Immutable once written; the unordered pair
/// (user_id, {winner_id, loser_id}) is unique via an expression index.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "votes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub winner_id: i64,
    pub loser_id: i64,
    pub user_id: String,
    pub created_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::suggestion::Entity",
        from = "Column::WinnerId",
        to = "super::suggestion::Column::Id"
    )]
    Winner,
    #[sea_orm(
        belongs_to = "super::suggestion::Entity",
        from = "Column::LoserId",
        to = "super::suggestion::Column::Id"
    )]
    Loser,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::Vote {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            winner_id: m.winner_id,
            loser_id: m.loser_id,
            user_id: m.user_id,
            created_at: m.created_at,
        }
    }
}
