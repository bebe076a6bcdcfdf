// ==========================================
// DashboardApi 集成测试
// ==========================================
// 测试范围:
// 1. 瓶颈分析: analyze_bottlenecks（窗口、排序、根因、建议）
// 2. 产线仿真: simulate_current_line / run_simulation
// 3. KPI: get_line_kpis
// 4. 问答: ask
// 5. 导入: import_production_csv
// ==========================================

mod test_helpers;

use line_monitor::api::ApiError;
use line_monitor::config::config_keys;
use line_monitor::domain::{
    CauseType, ChangeType, RecommendationType, Severity, SimStation, SimulationChange,
    SimulationRequest,
};
use line_monitor::query::QueryIntent;
use std::io::Write;
use test_helpers::*;

// ==========================================
// 瓶颈分析
// ==========================================

#[test]
fn test_analyze_bottlenecks_标准产线() {
    let (_file, api) = seeded_api().expect("无法创建测试环境");

    let findings = api.analyze_bottlenecks(None).expect("分析失败");

    // ST004 无记录被跳过
    let ids: Vec<&str> = findings.iter().map(|f| f.station_id.as_str()).collect();
    assert_eq!(ids, vec!["ST002", "ST001", "ST003"]);

    let welding = &findings[0];
    assert_eq!(welding.severity, Severity::Critical);
    assert_eq!(welding.avg_cycle_time, 110.0);
    // 40 + 12.86 + 16 + 20
    assert_eq!(welding.impact_score, 89);
    assert_eq!(welding.frequency, 8);

    assert_eq!(welding.root_causes.len(), 1);
    let shift_cause = &welding.root_causes[0];
    assert_eq!(shift_cause.cause_type, CauseType::Shift);
    assert_eq!(shift_cause.confidence, 0.9);
    assert!(shift_cause.description.contains("Night"));

    let rec_types: Vec<RecommendationType> = welding
        .recommendations
        .iter()
        .map(|r| r.recommendation_type)
        .collect();
    assert_eq!(
        rec_types,
        vec![RecommendationType::Training, RecommendationType::Rebalance]
    );
    assert_eq!(welding.recommendations[0].expected_improvement, 14);
    assert_eq!(welding.recommendations[1].priority, 2);

    assert_eq!(findings[1].impact_score, 23);
    assert_eq!(findings[2].impact_score, 14);
    assert!(findings[1].root_causes.is_empty());
}

#[test]
fn test_analyze_bottlenecks_窗口参数() {
    let (_file, api) = seeded_api().expect("无法创建测试环境");

    // 30 天窗口纳入 3 月 1 日的慢记录与长停机
    let findings = api.analyze_bottlenecks(Some(30)).expect("分析失败");
    let painting = findings
        .iter()
        .find(|f| f.station_id == "ST003")
        .expect("应包含 ST003");
    assert!(painting.variance_percent > 50.0);
    assert!(painting
        .root_causes
        .iter()
        .any(|c| c.cause_type == CauseType::Equipment && c.confidence == 0.8));

    let err = api.analyze_bottlenecks(Some(0)).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[test]
fn test_analyze_bottlenecks_使用配置窗口() {
    let (_file, api) = seeded_api().expect("无法创建测试环境");
    api.config()
        .set_global_config_value(config_keys::ANALYSIS_WINDOW_DAYS, "30")
        .unwrap();

    let findings = api.analyze_bottlenecks(None).expect("分析失败");
    assert_eq!(findings[0].station_id, "ST003");
}

// ==========================================
// 产线仿真
// ==========================================

#[test]
fn test_simulate_current_line_增加人员() {
    let (_file, api) = seeded_api().expect("无法创建测试环境");

    let changes = vec![SimulationChange::new(ChangeType::AddOperator, "ST002", 1.0)];
    let outcome = api.simulate_current_line(&changes).expect("仿真失败");

    assert_eq!(outcome.baseline.bottleneck_station.as_deref(), Some("ST002"));
    assert_eq!(outcome.baseline.throughput, 32);
    // 110 * (1 - 0.15 / sqrt(3)) ≈ 100.47
    assert_eq!(outcome.projected.throughput, 35);
    assert_eq!(outcome.projected.bottleneck_station.as_deref(), Some("ST002"));
    // ST004 无记录，平均节拍取目标值
    assert_eq!(outcome.baseline.utilization.len(), 4);
    assert!((outcome.baseline.utilization["ST004"] - 70.0 / 110.0).abs() < 1e-9);
}

#[test]
fn test_simulate_current_line_空变更幂等() {
    let (_file, api) = seeded_api().expect("无法创建测试环境");
    let outcome = api.simulate_current_line(&[]).expect("仿真失败");
    assert_eq!(outcome.baseline, outcome.projected);
}

#[test]
fn test_run_simulation_非有限数值() {
    let (_file, api) = seeded_api().expect("无法创建测试环境");

    let request = SimulationRequest {
        stations: vec![SimStation {
            id: "A1".to_string(),
            name: "A".to_string(),
            target_cycle_time: 90.0,
            operators: 2,
            current_avg_cycle_time: 100.0,
        }],
        changes: vec![SimulationChange::new(ChangeType::ChangeCycleTime, "A1", f64::NAN)],
    };
    let err = api.run_simulation(&request).unwrap_err();
    assert!(matches!(err, ApiError::SimulationError(_)));
}

#[test]
fn test_run_simulation_json_请求() {
    let (_file, api) = seeded_api().expect("无法创建测试环境");

    let request: SimulationRequest = serde_json::from_str(
        r#"{
            "stations": [
                {"id": "A", "name": "A", "targetCycleTime": 90, "operators": 2, "currentAvgCycleTime": 100},
                {"id": "B", "name": "B", "targetCycleTime": 80, "operators": 1, "currentAvgCycleTime": 85}
            ],
            "changes": [{"type": "change_cycle_time", "stationId": "A", "value": 80}]
        }"#,
    )
    .unwrap();

    let outcome = api.run_simulation(&request).expect("仿真失败");
    assert_eq!(outcome.baseline.bottleneck_station.as_deref(), Some("A"));
    assert_eq!(outcome.projected.bottleneck_station.as_deref(), Some("B"));
    assert_eq!(outcome.projected.throughput, 42);

    let json = serde_json::to_value(&outcome).unwrap();
    assert!(json["baseline"]["bottleneckStation"].is_string());
    assert!(json["projected"]["waitTime"].is_i64());
}

// ==========================================
// KPI
// ==========================================

#[test]
fn test_get_line_kpis_默认窗口() {
    let (_file, api) = seeded_api().expect("无法创建测试环境");

    let summary = api.get_line_kpis(None).expect("KPI 计算失败");
    assert_eq!(summary.total_units, 240);
    assert_eq!(summary.good_units, 234);
    assert_eq!(summary.throughput_per_hour, 32);
    assert_eq!(summary.efficiency, 92.0);
    // 无记录的 ST004 不计入
    assert_eq!(summary.stations.len(), 3);
    for value in [summary.oee, summary.availability, summary.performance, summary.quality] {
        assert!((0.0..=100.0).contains(&value));
    }
}

// ==========================================
// 问答
// ==========================================

#[test]
fn test_ask_命中规则() {
    let (_file, api) = seeded_api().expect("无法创建测试环境");

    let answer = api.ask("What are the top 2 slowest stations?").expect("问答失败");
    assert_eq!(answer.intent, Some(QueryIntent::SlowestStations));
    assert_eq!(answer.rows.len(), 2);
    assert_eq!(answer.rows[0]["station_id"], "ST002");

    let answer = api.ask("Which station had the most downtime this week?").expect("问答失败");
    assert_eq!(answer.intent, Some(QueryIntent::Downtime));
    assert_eq!(answer.rows[0]["station_id"], "ST002");
    assert_eq!(answer.rows[0]["downtime_minutes"], 60.0);

    let answer = api.ask("compare shifts").expect("问答失败");
    assert_eq!(answer.intent, Some(QueryIntent::ShiftComparison));
    assert_eq!(answer.rows.len(), 2);
}

#[test]
fn test_ask_未命中与空问题() {
    let (_file, api) = seeded_api().expect("无法创建测试环境");

    let answer = api.ask("what's the weather tomorrow?").expect("问答失败");
    assert!(answer.intent.is_none());
    assert!(answer.rows.is_empty());
    assert_eq!(answer.suggestions.len(), 6);

    assert!(matches!(api.ask("   "), Err(ApiError::InvalidInput(_))));
}

#[test]
fn test_ask_超长时间窗口按上限处理() {
    let (_file, api) = seeded_api().expect("无法创建测试环境");

    let answer = api
        .ask("Which station had the most downtime in the last 100000000 days?")
        .expect("问答失败");
    assert_eq!(answer.intent, Some(QueryIntent::Downtime));

    let plan = answer.plan.expect("应返回查询计划");
    assert_eq!(
        plan.since,
        fixed_now() - chrono::Duration::days(line_monitor::query::MAX_WINDOW_DAYS)
    );
    // 窗口覆盖 3 月 1 日的长停机记录
    assert_eq!(answer.rows[0]["station_id"], "ST003");
    assert_eq!(answer.rows[0]["downtime_minutes"], 600.0);
}

// ==========================================
// 导入
// ==========================================

#[test]
fn test_import_production_csv_导入后参与分析() {
    let (_file, api) = seeded_api().expect("无法创建测试环境");

    let mut csv = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(
        csv,
        "station_id,shift,recorded_at,cycle_time_s,units_produced,defect_count,downtime_minutes"
    )
    .unwrap();
    writeln!(csv, "ST004,Morning,2026-03-10 09:00:00,95,30,0,0").unwrap();
    writeln!(csv, "ST004,Night,2026-03-09 23:00:00,95,30,0,0").unwrap();
    writeln!(csv, "ST404,Night,2026-03-09 23:00:00,95,30,0,0").unwrap();
    csv.flush().unwrap();

    let summary = api.import_production_csv(csv.path()).expect("导入失败");
    assert_eq!(summary.imported, 2);
    assert_eq!(summary.skipped, 1);

    let findings = api.analyze_bottlenecks(None).expect("分析失败");
    let assembly = findings
        .iter()
        .find(|f| f.station_id == "ST004")
        .expect("导入后 ST004 应参与分析");
    assert_eq!(assembly.severity, Severity::Critical);
    // 持续偏慢且零波动 -> 设备根因 + 设备/维保建议
    assert!(assembly
        .recommendations
        .iter()
        .any(|r| r.recommendation_type == RecommendationType::Maintenance));
}

#[test]
fn test_import_production_csv_文件不存在() {
    let (_file, api) = seeded_api().expect("无法创建测试环境");
    let err = api.import_production_csv("/nonexistent/records.csv").unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
