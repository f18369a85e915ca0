//! Settings Repository (key/value)

use super::RepoResult;
use sqlx::SqlitePool;

pub const LOGO_URL: &str = "logo_url";
pub const HERO_VIDEO_URL: &str = "hero_video_url";

/// `Ok(None)` when the key is absent or its value is NULL,
/// `Err` when the store itself cannot be read.
pub async fn get(pool: &SqlitePool, key: &str) -> RepoResult<Option<String>> {
    let value = sqlx::query_scalar::<_, Option<String>>("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(value.flatten())
}

/// Fail-open lookup: absent key and unreadable store both yield `default`
pub async fn get_or_default(pool: &SqlitePool, key: &str, default: &str) -> String {
    match get(pool, key).await {
        Ok(Some(value)) => value,
        Ok(None) => default.to_string(),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Settings lookup failed, using default");
            default.to_string()
        }
    }
}

/// Upsert
pub async fn set(pool: &SqlitePool, key: &str, value: &str) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::query("CREATE TABLE settings (key TEXT PRIMARY KEY, value TEXT)")
            .execute(&pool)
            .await
            .unwrap();

        pool
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let pool = test_pool().await;
        assert_eq!(get(&pool, LOGO_URL).await.unwrap(), None);
        assert_eq!(get_or_default(&pool, LOGO_URL, "").await, "");
    }

    #[tokio::test]
    async fn test_set_twice_keeps_one_row() {
        let pool = test_pool().await;
        set(&pool, LOGO_URL, "https://cdn.example/logo.png").await.unwrap();
        set(&pool, LOGO_URL, "https://cdn.example/logo.png").await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM settings WHERE key = ?")
            .bind(LOGO_URL)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            get(&pool, LOGO_URL).await.unwrap().as_deref(),
            Some("https://cdn.example/logo.png")
        );
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let pool = test_pool().await;
        set(&pool, HERO_VIDEO_URL, "a.mp4").await.unwrap();
        set(&pool, HERO_VIDEO_URL, "b.mp4").await.unwrap();
        assert_eq!(get(&pool, HERO_VIDEO_URL).await.unwrap().as_deref(), Some("b.mp4"));
    }

    #[tokio::test]
    async fn test_null_value_reads_as_absent() {
        let pool = test_pool().await;
        sqlx::query("INSERT INTO settings (key, value) VALUES ('logo_url', NULL)")
            .execute(&pool)
            .await
            .unwrap();
        assert_eq!(get(&pool, LOGO_URL).await.unwrap(), None);
        assert_eq!(get_or_default(&pool, LOGO_URL, "fallback").await, "fallback");
    }

    #[tokio::test]
    async fn test_missing_table_is_error_but_default_fails_open() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        assert!(get(&pool, "anything").await.is_err());
        assert_eq!(get_or_default(&pool, "anything", "dflt").await, "dflt");
    }
}
