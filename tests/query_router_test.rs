// ==========================================
// QueryRouter 集成测试
// ==========================================
// 测试范围: 规则顺序、时间窗口/条数提取、模板参数约定
// ==========================================

use chrono::{Duration, NaiveDate, NaiveDateTime};
use line_monitor::query::{QueryIntent, QueryRouter};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 10)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

#[test]
fn test_each_intent_is_reachable() {
    let router = QueryRouter::new(7, 10);
    let cases = [
        ("Where did we have outages?", QueryIntent::Downtime),
        ("Scrap by station", QueryIntent::Quality),
        ("Night shift vs morning shift", QueryIntent::ShiftComparison),
        ("Which station is the bottleneck?", QueryIntent::SlowestStations),
        ("How many units did we make?", QueryIntent::ProductionOutput),
        ("Show me all stations", QueryIntent::StationList),
    ];
    for (question, expected) in cases {
        let plan = router.route(question, now()).expect(question);
        assert_eq!(plan.intent, expected, "{}", question);
    }
}

#[test]
fn test_rule_order_resolves_overlaps() {
    let router = QueryRouter::new(7, 10);

    // quality 规则先于 shift 规则
    let plan = router.route("defects per shift", now()).unwrap();
    assert_eq!(plan.intent, QueryIntent::Quality);

    // shift 规则先于 slowest 规则
    let plan = router.route("slowest shift", now()).unwrap();
    assert_eq!(plan.intent, QueryIntent::ShiftComparison);
}

#[test]
fn test_time_window_phrases() {
    let router = QueryRouter::new(7, 10);

    let plan = router.route("units produced in the past 12 hours", now()).unwrap();
    assert_eq!(plan.since, now() - Duration::hours(12));

    let plan = router.route("downtime this month", now()).unwrap();
    assert_eq!(plan.since, now() - Duration::days(30));

    let plan = router.route("quality over the last 2 weeks", now()).unwrap();
    assert_eq!(plan.since, now() - Duration::weeks(2));
}

#[test]
fn test_top_n_bounds() {
    let router = QueryRouter::new(7, 5);

    let plan = router.route("top 0 slowest stations", now()).unwrap();
    assert_eq!(plan.limit, 1);

    let plan = router.route("top 5000 slowest stations", now()).unwrap();
    assert_eq!(plan.limit, 100);

    let plan = router.route("slowest stations", now()).unwrap();
    assert_eq!(plan.limit, 5);
}

#[test]
fn test_plan_serializes_without_sql() {
    let router = QueryRouter::new(7, 10);
    let plan = router.route("list stations", now()).unwrap();
    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["intent"], "station_list");
    assert!(json.get("sql").is_none());
}
