// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库初始化、标准产线与生产记录种子数据
// ==========================================
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use line_monitor::api::DashboardApi;
use line_monitor::db::{open_sqlite_connection, run_migrations};
use line_monitor::domain::{ProductionRecord, Station};
use line_monitor::repository::{ProductionRepository, StationRepository};
use rusqlite::Connection;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 测试固定的"当前时间": 2026-03-10 12:00:00
pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 10)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

pub fn ts(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// 创建临时测试数据库并完成迁移
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - Arc<Mutex<Connection>>: 共享连接
pub fn create_test_db() -> Result<(NamedTempFile, Arc<Mutex<Connection>>), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().ok_or("非 UTF-8 路径")?.to_string();

    let conn = open_sqlite_connection(&db_path)?;
    run_migrations(&conn)?;

    Ok((temp_file, Arc::new(Mutex::new(conn))))
}

pub fn station(id: &str, name: &str, sequence: i32, target: f64, operators: i32) -> Station {
    Station {
        id: id.to_string(),
        name: name.to_string(),
        sequence,
        target_cycle_time: target,
        operator_count: operators,
    }
}

pub fn record(
    station_id: &str,
    shift: &str,
    recorded_at: NaiveDateTime,
    cycle_time: f64,
    downtime_minutes: f64,
) -> ProductionRecord {
    ProductionRecord {
        station_id: station_id.to_string(),
        shift: shift.to_string(),
        recorded_at,
        cycle_time,
        units_produced: 40,
        defect_count: 1,
        downtime_minutes,
    }
}

/// 标准四工位产线
///
/// - ST001 切割: 目标 60s，两班 58/62s
/// - ST002 焊接: 目标 90s，两班 100/120s，各停机 30 分钟（瓶颈）
/// - ST003 喷涂: 目标 80s，两班 80/80s
/// - ST004 总装: 目标 70s，无记录
pub fn seed_standard_line(conn: &Arc<Mutex<Connection>>) -> Result<(), Box<dyn Error>> {
    let stations = StationRepository::new(conn.clone());
    stations.upsert(&station("ST001", "切割", 1, 60.0, 2))?;
    stations.upsert(&station("ST002", "焊接", 2, 90.0, 2))?;
    stations.upsert(&station("ST003", "喷涂", 3, 80.0, 1))?;
    stations.upsert(&station("ST004", "总装", 4, 70.0, 2))?;

    let production = ProductionRepository::new(conn.clone());
    production.batch_insert(&[
        record("ST001", "Morning", ts(10, 8), 58.0, 0.0),
        record("ST001", "Night", ts(9, 22), 62.0, 0.0),
        record("ST002", "Morning", ts(10, 8), 100.0, 30.0),
        record("ST002", "Night", ts(9, 22), 120.0, 30.0),
        record("ST003", "Morning", ts(10, 8), 80.0, 0.0),
        record("ST003", "Night", ts(9, 22), 80.0, 0.0),
        // 超出 7 天窗口
        record("ST003", "Night", ts(1, 22), 400.0, 600.0),
    ])?;
    Ok(())
}

/// 已种子化的 DashboardApi（时钟固定为 fixed_now）
pub fn seeded_api() -> Result<(NamedTempFile, DashboardApi), Box<dyn Error>> {
    let (file, conn) = create_test_db()?;
    seed_standard_line(&conn)?;
    Ok((file, DashboardApi::new(conn).with_clock(fixed_now)))
}
