use sqlx::SqlitePool;
use tracing::info;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub name: String,
    pub password_hash: String,
    pub email: String,
    pub role: String,
    pub created_at: i64,
}

/// Insert a user together with its login flag (set), in one transaction.
pub async fn register_user(pool: &SqlitePool, new_user: &NewUser) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO users (id, name, password, email, role, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(&new_user.id)
    .bind(&new_user.name)
    .bind(&new_user.password_hash)
    .bind(&new_user.email)
    .bind(&new_user.role)
    .bind(new_user.created_at)
    .execute(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO logged_in (user_id, is_logged_in) VALUES (?1, 1)")
        .bind(&new_user.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    info!("New user made! {}", new_user.name);

    Ok(())
}
