use crate::{
    auth,
    entities::{user, User},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

/// Account management: signup, registration and credential checks.
#[derive(Clone)]
pub struct UserService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl UserService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Creates an account. Username and email must be unused.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn signup(&self, input: SignupInput) -> Result<user::Model, ServiceError> {
        input.validate()?;

        if User::find()
            .filter(user::Column::Username.eq(&input.username))
            .one(&*self.db)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(format!(
                "Username '{}' is already taken",
                input.username
            )));
        }

        if User::find()
            .filter(user::Column::Email.eq(&input.email))
            .one(&*self.db)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(format!(
                "Email '{}' is already in use",
                input.email
            )));
        }

        let now = Utc::now();
        let user = user::ActiveModel {
            id: Set(uuid::Uuid::new_v4()),
            username: Set(input.username),
            email: Set(input.email),
            password_hash: Set(auth::hash_password(&input.password)?),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await?;

        self.event_sender
            .send_or_log(Event::UserRegistered(user.id))
            .await;

        info!(user_id = %user.id, "account created");
        Ok(user)
    }

    /// Registration form variant of signup: rejects mismatched password
    /// confirmation before touching the database.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: RegisterInput) -> Result<user::Model, ServiceError> {
        if input.password != input.password_confirm {
            return Err(ServiceError::ValidationError(
                "password_confirm: Passwords do not match.".to_string(),
            ));
        }

        self.signup(SignupInput {
            username: input.username,
            email: input.email,
            password: input.password,
        })
        .await
    }

    /// Checks a username/password pair. Returns None on any mismatch —
    /// unknown username, wrong password and deactivated account are
    /// indistinguishable to the caller.
    #[instrument(skip(self, password))]
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<user::Model>, ServiceError> {
        let Some(user) = User::find()
            .filter(user::Column::Username.eq(username))
            .one(&*self.db)
            .await?
        else {
            return Ok(None);
        };

        if !user.active {
            return Ok(None);
        }

        Ok(auth::verify_password(&user.password_hash, password).then_some(user))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignupInput {
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    pub username: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    pub username: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub password_confirm: String,
}
