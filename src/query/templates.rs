// ==========================================
// 产线监控驾驶舱 - 问答 SQL 模板
// ==========================================
// 约定: 带时间窗口的模板 ?1 = 起始时间, ?2 = 条数上限
//       不带时间窗口的模板 ?1 = 条数上限
// ==========================================

pub const SLOWEST_STATIONS: &str = r#"
SELECT
    s.station_id,
    s.station_name,
    s.target_cycle_time,
    ROUND(AVG(p.cycle_time), 1) AS avg_cycle_time,
    ROUND((AVG(p.cycle_time) - s.target_cycle_time) / s.target_cycle_time * 100, 1) AS variance_percent,
    COUNT(*) AS sample_count
FROM station s
JOIN production_record p ON p.station_id = s.station_id
WHERE p.recorded_at >= ?1
GROUP BY s.station_id
ORDER BY variance_percent DESC
LIMIT ?2
"#;

pub const DOWNTIME_BY_STATION: &str = r#"
SELECT
    s.station_id,
    s.station_name,
    ROUND(SUM(p.downtime_minutes), 1) AS downtime_minutes,
    COUNT(*) AS sample_count
FROM station s
JOIN production_record p ON p.station_id = s.station_id
WHERE p.recorded_at >= ?1
GROUP BY s.station_id
ORDER BY downtime_minutes DESC
LIMIT ?2
"#;

pub const DEFECTS_BY_STATION: &str = r#"
SELECT
    s.station_id,
    s.station_name,
    SUM(p.units_produced) AS units_produced,
    SUM(p.defect_count) AS defect_count,
    ROUND(100.0 * SUM(p.defect_count) / NULLIF(SUM(p.units_produced), 0), 2) AS defect_rate
FROM station s
JOIN production_record p ON p.station_id = s.station_id
WHERE p.recorded_at >= ?1
GROUP BY s.station_id
ORDER BY defect_rate DESC
LIMIT ?2
"#;

pub const SHIFT_COMPARISON: &str = r#"
SELECT
    p.shift,
    ROUND(AVG(p.cycle_time), 1) AS avg_cycle_time,
    SUM(p.units_produced) AS units_produced,
    SUM(p.defect_count) AS defect_count,
    COUNT(*) AS sample_count
FROM production_record p
WHERE p.recorded_at >= ?1
GROUP BY p.shift
ORDER BY avg_cycle_time DESC
LIMIT ?2
"#;

pub const PRODUCTION_OUTPUT: &str = r#"
SELECT
    s.station_id,
    s.station_name,
    SUM(p.units_produced) AS units_produced,
    SUM(p.units_produced - p.defect_count) AS good_units
FROM station s
JOIN production_record p ON p.station_id = s.station_id
WHERE p.recorded_at >= ?1
GROUP BY s.station_id
ORDER BY s.sequence ASC
LIMIT ?2
"#;

pub const STATION_LIST: &str = r#"
SELECT
    station_id,
    station_name,
    sequence,
    target_cycle_time,
    operator_count
FROM station
ORDER BY sequence ASC
LIMIT ?1
"#;
