// ==========================================
// 产线监控驾驶舱 - 工位主数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::station::Station;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// StationRepository - 工位仓储
// ==========================================
/// 工位仓储
/// 职责: 管理 station 表的读写
pub struct StationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StationRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增或更新工位
    pub fn upsert(&self, station: &Station) -> RepositoryResult<()> {
        if !(station.target_cycle_time > 0.0) {
            return Err(RepositoryError::FieldValueError {
                field: "target_cycle_time".to_string(),
                message: format!("工位 {} 目标节拍必须为正数", station.id),
            });
        }

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO station (station_id, station_name, sequence, target_cycle_time, operator_count)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(station_id) DO UPDATE SET
                station_name = excluded.station_name,
                sequence = excluded.sequence,
                target_cycle_time = excluded.target_cycle_time,
                operator_count = excluded.operator_count
            "#,
            params![
                station.id,
                station.name,
                station.sequence,
                station.target_cycle_time,
                station.operator_count.max(1),
            ],
        )?;
        Ok(())
    }

    /// 按产线顺序列出全部工位
    pub fn list(&self) -> RepositoryResult<Vec<Station>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT station_id, station_name, sequence, target_cycle_time, operator_count
            FROM station
            ORDER BY sequence ASC, station_id ASC
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Station {
                id: row.get(0)?,
                name: row.get(1)?,
                sequence: row.get(2)?,
                target_cycle_time: row.get(3)?,
                operator_count: row.get(4)?,
            })
        })?;

        let mut stations = Vec::new();
        for row in rows {
            stations.push(row?);
        }
        Ok(stations)
    }

    /// 按编号查询工位
    pub fn find_by_id(&self, station_id: &str) -> RepositoryResult<Option<Station>> {
        let conn = self.get_conn()?;
        let station = conn
            .query_row(
                r#"
                SELECT station_id, station_name, sequence, target_cycle_time, operator_count
                FROM station
                WHERE station_id = ?1
                "#,
                params![station_id],
                |row| {
                    Ok(Station {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        sequence: row.get(2)?,
                        target_cycle_time: row.get(3)?,
                        operator_count: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(station)
    }

    /// 全部工位编号（导入校验用）
    pub fn list_ids(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT station_id FROM station ORDER BY station_id ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut ids = Vec::new();
        for row in rows {
            ids.push(row?);
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn setup_repo() -> StationRepository {
        let conn = open_in_memory().unwrap();
        StationRepository::new(Arc::new(Mutex::new(conn)))
    }

    fn station(id: &str, sequence: i32, target: f64) -> Station {
        Station {
            id: id.to_string(),
            name: format!("Station {}", id),
            sequence,
            target_cycle_time: target,
            operator_count: 1,
        }
    }

    #[test]
    fn test_upsert_and_list_in_line_order() {
        let repo = setup_repo();
        repo.upsert(&station("ST002", 2, 80.0)).unwrap();
        repo.upsert(&station("ST001", 1, 90.0)).unwrap();

        let stations = repo.list().unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].id, "ST001");

        let mut updated = station("ST001", 1, 95.0);
        updated.operator_count = 3;
        repo.upsert(&updated).unwrap();

        let found = repo.find_by_id("ST001").unwrap().unwrap();
        assert_eq!(found.target_cycle_time, 95.0);
        assert_eq!(found.operator_count, 3);
        assert!(repo.find_by_id("ST999").unwrap().is_none());
    }

    #[test]
    fn test_reject_non_positive_target() {
        let repo = setup_repo();
        let err = repo.upsert(&station("ST001", 1, 0.0)).unwrap_err();
        assert!(matches!(err, RepositoryError::FieldValueError { .. }));
    }
}
