use crate::db::TIMESTAMP_FORMAT;
use crate::domain::station::ProductionRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ProductionRepository - 生产记录仓储
// ==========================================
pub struct ProductionRepository {
    conn: Arc<Mutex<Connection>>,
}

const INSERT_SQL: &str = r#"
    INSERT INTO production_record (
        station_id, shift, recorded_at, cycle_time,
        units_produced, defect_count, downtime_minutes
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

impl ProductionRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    pub(super) fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 插入单条生产记录
    ///
    /// # 返回
    /// - `Ok(record_id)`: 自增主键
    pub fn insert(&self, record: &ProductionRecord) -> RepositoryResult<i64> {
        validate_record(record)?;

        let conn = self.get_conn()?;
        conn.execute(
            INSERT_SQL,
            params![
                record.station_id,
                record.shift,
                record.recorded_at.format(TIMESTAMP_FORMAT).to_string(),
                record.cycle_time,
                record.units_produced,
                record.defect_count,
                record.downtime_minutes,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 批量插入生产记录（单事务，任一失败整体回滚）
    ///
    /// # 返回
    /// - `Ok(count)`: 插入条数
    pub fn batch_insert(&self, records: &[ProductionRecord]) -> RepositoryResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        for record in records {
            validate_record(record)?;
        }

        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        {
            let mut stmt = tx.prepare(INSERT_SQL)?;
            for record in records {
                stmt.execute(params![
                    record.station_id,
                    record.shift,
                    record.recorded_at.format(TIMESTAMP_FORMAT).to_string(),
                    record.cycle_time,
                    record.units_produced,
                    record.defect_count,
                    record.downtime_minutes,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tracing::debug!(count = records.len(), "生产记录批量写入完成");
        Ok(records.len())
    }

    /// 生产记录总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM production_record", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn validate_record(record: &ProductionRecord) -> RepositoryResult<()> {
    if !(record.cycle_time.is_finite() && record.cycle_time > 0.0) {
        return Err(RepositoryError::FieldValueError {
            field: "cycle_time".to_string(),
            message: format!("工位 {} 节拍必须为正数: {}", record.station_id, record.cycle_time),
        });
    }
    if record.units_produced < 0 || record.defect_count < 0 {
        return Err(RepositoryError::FieldValueError {
            field: "units_produced".to_string(),
            message: format!("工位 {} 产量/缺陷数不能为负", record.station_id),
        });
    }
    if !(record.downtime_minutes.is_finite() && record.downtime_minutes >= 0.0) {
        return Err(RepositoryError::FieldValueError {
            field: "downtime_minutes".to_string(),
            message: format!("工位 {} 停机时长非法: {}", record.station_id, record.downtime_minutes),
        });
    }
    Ok(())
}
