use crate::{abstract_trait::user::UserQueryRepositoryTrait, model::User};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};

pub struct UserQueryRepository {
    db: ConnectionPool,
}

impl UserQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserQueryRepositoryTrait for UserQueryRepository {
    async fn find_by_id(&self, user_id: i32) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, name, email, role FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }
}
