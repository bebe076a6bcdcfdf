// ==========================================
// 产线监控驾驶舱 - 命令行入口
// ==========================================
// 用法:
//   line-monitor stations <stations.json>     导入/更新工位主数据
//   line-monitor import <records.csv>         导入生产记录
//   line-monitor analyze [window_days]        瓶颈分析
//   line-monitor simulate <changes.json>      以当前产线为基线仿真
//   line-monitor kpi [window_days]            产线 KPI
//   line-monitor ask <question...>            受限问答
//   line-monitor config <key> <value>         写入全局配置
//
// 数据库路径: LINE_MONITOR_DB_PATH 或用户数据目录
// 结果以 JSON 输出到 stdout
// ==========================================

use anyhow::{bail, Context, Result};
use line_monitor::api::DashboardApi;
use line_monitor::config::default_db_path;
use line_monitor::db::{open_sqlite_connection, run_migrations};
use line_monitor::domain::{SimulationChange, Station};
use serde::Serialize;
use std::sync::{Arc, Mutex};

const USAGE: &str = "用法: line-monitor <stations|import|analyze|simulate|kpi|ask|config> [参数]";

fn main() -> Result<()> {
    line_monitor::logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        bail!(USAGE);
    };
    let rest = &args[1..];

    let db_path = default_db_path();
    tracing::info!(db_path = %db_path, version = line_monitor::VERSION, "打开数据库");

    let conn = open_sqlite_connection(&db_path)
        .with_context(|| format!("无法打开数据库: {}", db_path))?;
    run_migrations(&conn).context("schema 迁移失败")?;
    let api = DashboardApi::new(Arc::new(Mutex::new(conn)));

    match command {
        "stations" => {
            let path = rest.first().context("缺少参数: <stations.json>")?;
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("无法读取文件: {}", path))?;
            let stations: Vec<Station> =
                serde_json::from_str(&raw).context("工位 JSON 格式错误")?;
            for station in &stations {
                api.upsert_station(station)?;
            }
            print_json(&api.list_stations()?)
        }
        "import" => {
            let path = rest.first().context("缺少参数: <records.csv>")?;
            print_json(&api.import_production_csv(path)?)
        }
        "analyze" => {
            let window = parse_window(rest)?;
            print_json(&api.analyze_bottlenecks(window)?)
        }
        "simulate" => {
            let path = rest.first().context("缺少参数: <changes.json>")?;
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("无法读取文件: {}", path))?;
            let changes: Vec<SimulationChange> =
                serde_json::from_str(&raw).context("变更 JSON 格式错误")?;
            print_json(&api.simulate_current_line(&changes)?)
        }
        "kpi" => {
            let window = parse_window(rest)?;
            print_json(&api.get_line_kpis(window)?)
        }
        "ask" => {
            if rest.is_empty() {
                bail!("缺少参数: <question>");
            }
            print_json(&api.ask(&rest.join(" "))?)
        }
        "config" => {
            let (Some(key), Some(value)) = (rest.first(), rest.get(1)) else {
                bail!("用法: line-monitor config <key> <value>");
            };
            api.config().set_global_config_value(key, value)?;
            println!("{}", api.config().get_config_snapshot()?);
            Ok(())
        }
        other => bail!("未知命令: {}\n{}", other, USAGE),
    }
}

fn parse_window(rest: &[String]) -> Result<Option<i64>> {
    rest.first()
        .map(|s| {
            s.parse::<i64>()
                .with_context(|| format!("窗口天数必须为整数: {}", s))
        })
        .transpose()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
