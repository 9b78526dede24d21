use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine,
    users::{self, password_digest},
};

use super::{Engine, required_text, with_tx};

impl Engine {
    /// Registers an API user. The password is stored as a SHA-256 digest.
    pub async fn new_user(&self, username: &str, password: &str) -> ResultEngine<()> {
        let username = required_text(Some(username), "username")?;
        if password.is_empty() {
            return Err(EngineError::MissingField("password".to_string()));
        }

        with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(username));
            }

            users::ActiveModel {
                username: ActiveValue::Set(username.clone()),
                password: ActiveValue::Set(password_digest(password)),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(%username, "user created");
            Ok(())
        })
    }

    /// Returns the user matching both credentials.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> ResultEngine<Option<users::Model>> {
        let user = users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?;
        Ok(user.filter(|user| user.password == password_digest(password)))
    }
}
