//! Persistence for saved resumes and cover letters. Rows are insert-only and
//! always scoped to their owner.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::resume::{CoverLetterRow, ResumeRow};

pub struct NewCoverLetter<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub job_description: Option<&'a str>,
    pub company_name: Option<&'a str>,
}

pub async fn insert_resume(
    pool: &PgPool,
    user_id: Uuid,
    title: &str,
    content: &str,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO resumes (id, user_id, title, content)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(title)
    .bind(content)
    .execute(pool)
    .await?;
    Ok(id)
}

/// Newest first.
pub async fn list_resumes(pool: &PgPool, user_id: Uuid) -> Result<Vec<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn insert_cover_letter(
    pool: &PgPool,
    user_id: Uuid,
    letter: NewCoverLetter<'_>,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO cover_letters (id, user_id, title, content, job_description, company_name)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(letter.title)
    .bind(letter.content)
    .bind(letter.job_description)
    .bind(letter.company_name)
    .execute(pool)
    .await?;
    Ok(id)
}

/// Newest first.
pub async fn list_cover_letters(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<CoverLetterRow>, sqlx::Error> {
    sqlx::query_as::<_, CoverLetterRow>(
        "SELECT * FROM cover_letters WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
