//! SQLite Database - 壁纸记录库的连接与 schema 版本

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::{Pool, Sqlite};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 数据库位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// 文件不存在时自动创建
    File(PathBuf),
    /// 测试用，进程退出即丢失
    InMemory,
}

/// 数据库配置
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub location: DatabaseLocation,
    pub max_connections: u32,
    /// 后台写回与前台读取争用写锁时的等待上限
    pub busy_timeout: Duration,
}

impl DatabaseConfig {
    pub fn file(path: impl AsRef<Path>, max_connections: u32) -> Self {
        Self {
            location: DatabaseLocation::File(path.as_ref().to_path_buf()),
            max_connections,
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// 内存库只能有一个连接，否则每个连接各自是一个空库
    pub fn in_memory() -> Self {
        Self {
            location: DatabaseLocation::InMemory,
            max_connections: 1,
            busy_timeout: Duration::from_secs(5),
        }
    }

    fn connect_options(&self) -> SqliteConnectOptions {
        let options = match &self.location {
            DatabaseLocation::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal),
            DatabaseLocation::InMemory => SqliteConnectOptions::new().in_memory(true),
        };

        options
            .busy_timeout(self.busy_timeout)
            .synchronous(SqliteSynchronous::Normal)
    }
}

/// 数据库连接池
pub type DbPool = Pool<Sqlite>;

/// 创建连接池，pragma 在每个新连接上生效
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(config.connect_options())
        .await?;

    tracing::info!(
        location = ?config.location,
        max_connections = config.max_connections,
        "Wallpaper database opened"
    );

    Ok(pool)
}

/// schema 迁移，下标 + 1 即版本号，记录在 `PRAGMA user_version`
///
/// 标注列都可为空：未标注与 "已计算但尚未写回" 对读取方来说是一回事。
/// 列表与调色板以 JSON 文本存储。
const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS wallpapers (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        tags TEXT NOT NULL DEFAULT '[]',
        image_url TEXT NOT NULL,
        ai_insight TEXT,
        ai_description TEXT,
        ai_colors TEXT,
        ai_objects TEXT,
        ai_style TEXT,
        ai_search_terms TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_wallpapers_created_at
    ON wallpapers(created_at)
    "#,
];

/// 当前 schema 版本
pub async fn schema_version(pool: &DbPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("PRAGMA user_version")
        .fetch_one(pool)
        .await
}

/// 应用尚未执行的迁移，每个版本一个事务
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    let current = schema_version(pool).await?;
    let applied = usize::try_from(current).unwrap_or(0);

    for (index, sql) in MIGRATIONS.iter().enumerate().skip(applied) {
        let version = index + 1;
        let mut tx = pool.begin().await?;
        sqlx::query(*sql).execute(&mut *tx).await?;
        sqlx::query(&format!("PRAGMA user_version = {}", version))
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(version = version, "Applied wallpaper schema migration");
    }

    Ok(())
}
