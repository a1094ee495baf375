use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{
    EngineError, NewUserCmd, ResultEngine, provisioning::provision_defaults, users,
    util::{MAX_NAME_LEN, normalize_optional_text},
};

use super::{Engine, with_tx};

const MIN_PASSWORD_LEN: usize = 8;

impl Engine {
    /// Register a user and seed the default accounts and categories.
    ///
    /// Returns the username. Provisioning runs in the same DB transaction as
    /// the insert, so a failure leaves neither behind.
    pub async fn create_user(&self, cmd: NewUserCmd) -> ResultEngine<String> {
        let username = normalize_username(&cmd.username)?;
        if cmd.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(EngineError::InvalidName(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        let display_name = normalize_optional_text(cmd.display_name.as_deref())?;
        let password_hash = bcrypt::hash(&cmd.password, self.hash_cost)?;

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
                password: ActiveValue::Set(password_hash),
                display_name: ActiveValue::Set(display_name),
            }
            .insert(&db_tx)
            .await?;

            provision_defaults(&db_tx, &username).await?;
            tracing::info!(username = %username, "user created");
            Ok(username)
        })
    }

    /// Check a username/password pair. Unknown users simply do not match.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> ResultEngine<bool> {
        let Some(user) = users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?
        else {
            return Ok(false);
        };
        Ok(bcrypt::verify(password, &user.password)?)
    }

    /// Display name of a user, falling back to the username.
    pub async fn user_display_name(&self, username: &str) -> ResultEngine<String> {
        let user = users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
        Ok(user.display_name.unwrap_or(user.username))
    }
}

/// Usernames travel in basic-auth headers, so `:` and whitespace are refused.
fn normalize_username(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(
            "username must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(EngineError::InvalidName(format!(
            "username must be at most {MAX_NAME_LEN} characters"
        )));
    }
    if trimmed.chars().any(|c| c == ':' || c.is_whitespace()) {
        return Err(EngineError::InvalidName(
            "username must not contain ':' or spaces".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
