// ==========================================
// 产线监控驾驶舱 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

/// 配置键
pub mod config_keys {
    /// 瓶颈分析/仿真窗口（天）
    pub const ANALYSIS_WINDOW_DAYS: &str = "analysis_window_days";
    /// KPI 窗口（天）
    pub const KPI_WINDOW_DAYS: &str = "kpi_window_days";
    /// 问答默认返回条数
    pub const QUERY_DEFAULT_LIMIT: &str = "query_default_limit";
}

pub const DEFAULT_ANALYSIS_WINDOW_DAYS: i64 = 7;
pub const DEFAULT_KPI_WINDOW_DAYS: i64 = 1;
pub const DEFAULT_QUERY_LIMIT: usize = 10;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "LINE_MONITOR_DB_PATH";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 打开数据库文件创建 ConfigManager
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(RepositoryError::FieldValueError {
                field: "key".to_string(),
                message: "配置键不能为空".to_string(),
            });
        }

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;

        tracing::info!(config_key = key, value = value, "配置已更新");
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON）
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        serde_json::to_string(&config_map)
            .map_err(|e| RepositoryError::InternalError(e.to_string()))
    }

    // ===== 类型化读取（格式错误回退默认值并告警） =====

    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> RepositoryResult<T>
    where
        T: std::str::FromStr + Copy + std::fmt::Display,
    {
        match self.get_global_config_value(key)? {
            None => Ok(default),
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(v) => Ok(v),
                Err(_) => {
                    tracing::warn!(
                        config_key = key,
                        raw_value = %raw,
                        default = %default,
                        "配置格式错误，使用默认值"
                    );
                    Ok(default)
                }
            },
        }
    }

    /// 瓶颈分析窗口（天，≥1）
    pub fn get_analysis_window_days(&self) -> RepositoryResult<i64> {
        let v = self.get_parsed_or_default(
            config_keys::ANALYSIS_WINDOW_DAYS,
            DEFAULT_ANALYSIS_WINDOW_DAYS,
        )?;
        Ok(v.max(1))
    }

    /// KPI 窗口（天，≥1）
    pub fn get_kpi_window_days(&self) -> RepositoryResult<i64> {
        let v = self.get_parsed_or_default(config_keys::KPI_WINDOW_DAYS, DEFAULT_KPI_WINDOW_DAYS)?;
        Ok(v.max(1))
    }

    /// 问答默认条数（≥1）
    pub fn get_query_default_limit(&self) -> RepositoryResult<usize> {
        let v = self.get_parsed_or_default(config_keys::QUERY_DEFAULT_LIMIT, DEFAULT_QUERY_LIMIT)?;
        Ok(v.max(1))
    }
}

/// 默认数据库路径
///
/// 优先读取 `LINE_MONITOR_DB_PATH`，否则使用用户数据目录。
pub fn default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./line_monitor.db");
    if let Some(data_dir) = dirs::data_dir() {
        let app_dir = data_dir.join("line-monitor");
        if let Err(e) = std::fs::create_dir_all(&app_dir) {
            tracing::warn!(error = %e, dir = %app_dir.display(), "无法创建数据目录，使用当前目录");
        } else {
            path = app_dir.join("line_monitor.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn setup() -> ConfigManager {
        ConfigManager::from_connection(Arc::new(Mutex::new(open_in_memory().unwrap())))
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = setup();
        assert_eq!(config.get_analysis_window_days().unwrap(), 7);
        assert_eq!(config.get_kpi_window_days().unwrap(), 1);
        assert_eq!(config.get_query_default_limit().unwrap(), 10);
    }

    #[test]
    fn test_set_and_read_back() {
        let config = setup();
        config
            .set_global_config_value(config_keys::ANALYSIS_WINDOW_DAYS, "14")
            .unwrap();
        config
            .set_global_config_value(config_keys::ANALYSIS_WINDOW_DAYS, "30")
            .unwrap();
        assert_eq!(config.get_analysis_window_days().unwrap(), 30);

        let snapshot: BTreeMap<String, String> =
            serde_json::from_str(&config.get_config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot["analysis_window_days"], "30");
    }

    #[test]
    fn test_malformed_and_out_of_range_values() {
        let config = setup();
        config
            .set_global_config_value(config_keys::QUERY_DEFAULT_LIMIT, "lots")
            .unwrap();
        assert_eq!(config.get_query_default_limit().unwrap(), 10);

        config
            .set_global_config_value(config_keys::KPI_WINDOW_DAYS, "-3")
            .unwrap();
        assert_eq!(config.get_kpi_window_days().unwrap(), 1);

        assert!(config.set_global_config_value("  ", "x").is_err());
    }
}
