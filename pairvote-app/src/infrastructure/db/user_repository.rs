use super::entities::{user, User};
use sea_orm::sea_query::OnConflict;
use sea_orm::{entity::*, DatabaseConnection, DbErr};

#[derive(Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<user::Model>, DbErr> {
        User::find_by_id(id).one(&self.db).await
    }

    /// Insert-or-update on authenticated contact, as one `INSERT ... ON
    /// CONFLICT` statement so two concurrent first contacts cannot race a
    /// read-then-insert. Counters and `created_at` are left untouched on
    /// conflict; the quota tracker owns the counters.
    pub async fn upsert(&self, id: &str, email: &str, name: &str) -> Result<user::Model, DbErr> {
        let now = chrono::Utc::now();
        let active = user::ActiveModel {
            id: Set(id.to_string()),
            email: Set(email.to_string()),
            name: Set(name.to_string()),
            suggestions_today: Set(0),
            votes_today: Set(0),
            last_suggestion_date: Set(None),
            last_vote_date: Set(None),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
        };

        User::insert(active)
            .on_conflict(
                OnConflict::column(user::Column::Id)
                    .update_columns([
                        user::Column::Email,
                        user::Column::Name,
                        user::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn row(id: &str) -> user::Model {
        user::Model {
            id: id.into(),
            email: format!("{id}@example.com"),
            name: id.to_uppercase(),
            suggestions_today: 0,
            votes_today: 0,
            last_suggestion_date: None,
            last_vote_date: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn upsert_is_a_single_on_conflict_statement() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row("u1")]])
            .into_connection();

        let repo = UserRepository::new(db.clone());
        let stored = repo.upsert("u1", "u1@example.com", "U1").await.unwrap();
        assert_eq!(stored.id, "u1");

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        let sql = log[0].statements()[0].sql.to_uppercase();
        assert!(sql.starts_with("INSERT"));
        assert!(sql.contains("ON CONFLICT"));
    }
}
