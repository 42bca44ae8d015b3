use sqlx::SqlitePool;
use tracing::info;

/// Create the tables the credential store needs, if they are missing.
pub async fn create_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Users table. `password` holds the argon2 PHC string, never plaintext.
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id         TEXT    PRIMARY KEY,
            name       TEXT    NOT NULL UNIQUE,
            password   TEXT    NOT NULL,
            email      TEXT    NOT NULL,
            role       TEXT    NOT NULL DEFAULT 'user',
            created_at INTEGER NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    // One login flag per user; the revocation switch for every token the
    // user holds.
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS logged_in (
            user_id      TEXT    PRIMARY KEY,
            is_logged_in INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        )",
    )
    .execute(pool)
    .await?;

    info!("Database schema ready");
    Ok(())
}
