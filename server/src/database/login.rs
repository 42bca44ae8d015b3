use shared::types::User;
use sqlx::SqlitePool;

/// A user joined with its login flag.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub password: String,
    pub role: String,
    pub is_logged_in: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            password: row.password,
            role: row.role,
            is_logged_in: row.is_logged_in,
        }
    }
}

/// Get a user and its login flag by exact (case-sensitive) name
pub async fn get_user_by_name(
    pool: &SqlitePool,
    name: &str,
) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        "SELECT users.id, users.name, users.password, users.role, logged_in.is_logged_in
         FROM users
         JOIN logged_in ON logged_in.user_id = users.id
         WHERE users.name = ?1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await
}

/// Read the login flag; `None` when the user does not exist
pub async fn get_login_flag(pool: &SqlitePool, user_id: &str) -> Result<Option<bool>, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT is_logged_in FROM logged_in WHERE user_id = ?1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Set the login flag. Returns the number of rows touched (0 = unknown user).
pub async fn set_login_flag(
    pool: &SqlitePool,
    user_id: &str,
    value: bool,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE logged_in SET is_logged_in = ?1 WHERE user_id = ?2")
        .bind(value)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
