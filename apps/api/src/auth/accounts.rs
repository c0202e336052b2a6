use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password::verify_password;
use crate::errors::AppError;
use crate::models::user::UserRow;

/// Emails are matched case-insensitively and without surrounding whitespace.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
        .bind(normalize_email(email))
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Inserts a new account. A duplicate email maps to `AppError::Conflict`.
pub async fn create_user(
    pool: &PgPool,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<UserRow, AppError> {
    let result = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (id, name, email, password_hash)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name.trim())
    .bind(normalize_email(email))
    .bind(password_hash)
    .fetch_one(pool)
    .await;

    match result {
        Ok(user) => Ok(user),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            Err(AppError::Conflict("User already exists".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Returns the account when `password` matches, `None` otherwise.
pub async fn verify_credentials(
    pool: &PgPool,
    email: &str,
    password: &str,
) -> Result<Option<UserRow>, AppError> {
    let Some(user) = find_by_email(pool, email).await? else {
        return Ok(None);
    };

    let matches = verify_password(password, &user.password_hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Stored password hash is invalid: {e}")))?;

    Ok(matches.then_some(user))
}
