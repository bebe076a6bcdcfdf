// ==========================================
// 产线监控驾驶舱 - SQLite 连接初始化与迁移
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键、busy_timeout）
// - 进程启动时执行一次 schema 迁移，连接句柄显式传入仓储层
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 时间戳存储格式（字典序与时间序一致）
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 打开内存数据库并完成迁移（测试/演示用）
pub fn open_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 执行 schema 迁移（幂等）
///
/// 已是最新版本时直接返回；库版本高于代码期望时仅告警。
pub fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    let current = read_schema_version(conn)?.unwrap_or(0);

    if current > CURRENT_SCHEMA_VERSION {
        tracing::warn!(
            db_version = current,
            expected = CURRENT_SCHEMA_VERSION,
            "数据库 schema_version 高于当前代码期望版本"
        );
        return Ok(());
    }
    if current == CURRENT_SCHEMA_VERSION {
        return Ok(());
    }

    tracing::info!(from = current, to = CURRENT_SCHEMA_VERSION, "执行 schema 迁移");

    conn.execute_batch(
        r#"
        BEGIN;

        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS station (
            station_id TEXT PRIMARY KEY,
            station_name TEXT NOT NULL,
            sequence INTEGER NOT NULL,
            target_cycle_time REAL NOT NULL CHECK (target_cycle_time > 0),
            operator_count INTEGER NOT NULL DEFAULT 1 CHECK (operator_count >= 1)
        );

        CREATE TABLE IF NOT EXISTS production_record (
            record_id INTEGER PRIMARY KEY AUTOINCREMENT,
            station_id TEXT NOT NULL REFERENCES station(station_id) ON DELETE CASCADE,
            shift TEXT NOT NULL,
            recorded_at TEXT NOT NULL,
            cycle_time REAL NOT NULL,
            units_produced INTEGER NOT NULL DEFAULT 0,
            defect_count INTEGER NOT NULL DEFAULT 0,
            downtime_minutes REAL NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_production_record_station_time
            ON production_record (station_id, recorded_at);
        CREATE INDEX IF NOT EXISTS idx_production_record_time
            ON production_record (recorded_at);

        INSERT OR IGNORE INTO schema_version (version) VALUES (1);

        COMMIT;
        "#,
    )?;

    Ok(())
}
