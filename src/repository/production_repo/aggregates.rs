use super::core::ProductionRepository;
use crate::db::TIMESTAMP_FORMAT;
use crate::domain::simulation::SimStation;
use crate::domain::station::{ShiftAggregate, StationAggregate, StationProductionStats};
use crate::repository::error::RepositoryResult;
use chrono::NaiveDateTime;
use rusqlite::{params, Result as SqliteResult};

impl ProductionRepository {
    // ==========================================
    // 窗口聚合 (引擎输入)
    // ==========================================
    // 窗口条件写在 LEFT JOIN 的 ON 子句中，窗口内无记录的工位仍返回一行

    /// 工位聚合（瓶颈分析输入）
    ///
    /// 方差为样本方差；无样本时均值与方差均为 None。
    pub fn station_aggregates(&self, since: NaiveDateTime) -> RepositoryResult<Vec<StationAggregate>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                s.station_id,
                s.station_name,
                s.target_cycle_time,
                AVG(p.cycle_time),
                SUM(p.cycle_time),
                SUM(p.cycle_time * p.cycle_time),
                COUNT(p.record_id),
                COALESCE(SUM(p.downtime_minutes), 0)
            FROM station s
            LEFT JOIN production_record p
                ON p.station_id = s.station_id AND p.recorded_at >= ?1
            GROUP BY s.station_id
            ORDER BY s.sequence ASC, s.station_id ASC
            "#,
        )?;

        let rows = stmt
            .query_map(params![since.format(TIMESTAMP_FORMAT).to_string()], |row| {
                let sum: Option<f64> = row.get(4)?;
                let sum_sq: Option<f64> = row.get(5)?;
                let count: i64 = row.get(6)?;

                Ok(StationAggregate::new(
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    sample_variance(sum, sum_sq, count),
                    count,
                    row.get(7)?,
                ))
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(rows)
    }

    /// 班次×工位聚合，按产线顺序、班次标签排序
    pub fn shift_aggregates(&self, since: NaiveDateTime) -> RepositoryResult<Vec<ShiftAggregate>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT p.shift, p.station_id, AVG(p.cycle_time), COUNT(*)
            FROM production_record p
            JOIN station s ON s.station_id = p.station_id
            WHERE p.recorded_at >= ?1
            GROUP BY p.station_id, p.shift
            ORDER BY s.sequence ASC, p.station_id ASC, p.shift ASC
            "#,
        )?;

        let rows = stmt
            .query_map(params![since.format(TIMESTAMP_FORMAT).to_string()], |row| {
                Ok(ShiftAggregate {
                    shift: row.get(0)?,
                    station_id: row.get(1)?,
                    avg_cycle_time: row.get(2)?,
                    sample_count: row.get(3)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(rows)
    }

    /// 仿真工位（无记录时平均节拍取目标节拍）
    pub fn sim_stations(&self, since: NaiveDateTime) -> RepositoryResult<Vec<SimStation>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                s.station_id,
                s.station_name,
                s.target_cycle_time,
                s.operator_count,
                COALESCE(AVG(p.cycle_time), s.target_cycle_time)
            FROM station s
            LEFT JOIN production_record p
                ON p.station_id = s.station_id AND p.recorded_at >= ?1
            GROUP BY s.station_id
            ORDER BY s.sequence ASC, s.station_id ASC
            "#,
        )?;

        let rows = stmt
            .query_map(params![since.format(TIMESTAMP_FORMAT).to_string()], |row| {
                Ok(SimStation {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    target_cycle_time: row.get(2)?,
                    operators: row.get(3)?,
                    current_avg_cycle_time: row.get(4)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(rows)
    }

    /// 工位产量统计（KPI 输入）
    pub fn production_stats(
        &self,
        since: NaiveDateTime,
    ) -> RepositoryResult<Vec<StationProductionStats>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                s.station_id,
                s.station_name,
                s.target_cycle_time,
                AVG(p.cycle_time),
                COALESCE(SUM(p.units_produced), 0),
                COALESCE(SUM(p.defect_count), 0),
                COALESCE(SUM(p.downtime_minutes), 0),
                COUNT(p.record_id)
            FROM station s
            LEFT JOIN production_record p
                ON p.station_id = s.station_id AND p.recorded_at >= ?1
            GROUP BY s.station_id
            ORDER BY s.sequence ASC, s.station_id ASC
            "#,
        )?;

        let rows = stmt
            .query_map(params![since.format(TIMESTAMP_FORMAT).to_string()], |row| {
                Ok(StationProductionStats {
                    station_id: row.get(0)?,
                    station_name: row.get(1)?,
                    target_cycle_time: row.get(2)?,
                    avg_cycle_time: row.get(3)?,
                    units_produced: row.get(4)?,
                    defect_count: row.get(5)?,
                    total_downtime: row.get(6)?,
                    sample_count: row.get(7)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(rows)
    }
}

/// 由 SUM / SUM(x²) 计算样本方差
///
/// n = 0 返回 None；n = 1 返回 0；浮点误差导致的负值截断为 0。
pub(super) fn sample_variance(sum: Option<f64>, sum_sq: Option<f64>, count: i64) -> Option<f64> {
    match (sum, sum_sq) {
        (Some(sum), Some(sum_sq)) if count > 1 => {
            let n = count as f64;
            Some(((sum_sq - sum * sum / n) / (n - 1.0)).max(0.0))
        }
        (Some(_), Some(_)) if count == 1 => Some(0.0),
        _ => None,
    }
}
