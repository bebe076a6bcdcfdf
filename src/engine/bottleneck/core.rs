// ==========================================
// 产线监控驾驶舱 - 瓶颈分析引擎
// ==========================================
// 职责: 工位聚合 + 班次聚合 → 排序后的瓶颈发现
// 输出: 严重程度、综合影响分数、根因、改善建议
// 约束: 纯函数，不访问存储，不持有状态
// ==========================================

use crate::domain::bottleneck::BottleneckFinding;
use crate::domain::station::{ShiftAggregate, StationAggregate};
use crate::domain::types::Severity;
use tracing::{debug, warn};

use super::recommendation::build_recommendations;
use super::root_cause::infer_root_causes;
use super::scoring::{coefficient_of_variation, impact_breakdown};

// ==========================================
// BottleneckAnalyzer - 瓶颈分析引擎
// ==========================================
pub struct BottleneckAnalyzer {
    // 无状态引擎
}

impl BottleneckAnalyzer {
    pub fn new() -> Self {
        Self {}
    }

    /// 分析瓶颈
    ///
    /// # 参数
    /// - `stations`: 工位聚合（均值为空的工位直接跳过）
    /// - `shifts`: 班次×工位聚合
    ///
    /// # 返回
    /// 按影响分数降序的瓶颈发现（同分保持输入顺序）
    pub fn analyze(
        &self,
        stations: &[StationAggregate],
        shifts: &[ShiftAggregate],
    ) -> Vec<BottleneckFinding> {
        // 停机分母：本次调用传入的全部工位
        let line_downtime: f64 = stations
            .iter()
            .map(|s| s.total_downtime)
            .filter(|d| d.is_finite())
            .sum();

        let mut findings: Vec<BottleneckFinding> = stations
            .iter()
            .filter_map(|station| self.evaluate_station(station, shifts, line_downtime))
            .collect();

        // sort_by 为稳定排序
        findings.sort_by(|a, b| b.impact_score.cmp(&a.impact_score));

        debug!(
            stations = stations.len(),
            findings = findings.len(),
            "瓶颈分析完成"
        );
        findings
    }

    /// 评估单个工位；无法评估时返回 None
    fn evaluate_station(
        &self,
        station: &StationAggregate,
        shifts: &[ShiftAggregate],
        line_downtime: f64,
    ) -> Option<BottleneckFinding> {
        let avg_cycle_time = match station.avg_cycle_time {
            Some(avg) if avg.is_finite() => avg,
            Some(_) => {
                warn!(station_id = %station.station_id, "平均节拍非有限值，跳过");
                return None;
            }
            None => return None,
        };

        if !(station.target_cycle_time > 0.0) || !station.variance_percent.is_finite() {
            warn!(
                station_id = %station.station_id,
                target_cycle_time = station.target_cycle_time,
                "目标节拍非正，无法评估，跳过"
            );
            return None;
        }

        let variance_cycle_time = station
            .variance_cycle_time
            .filter(|v| v.is_finite())
            .unwrap_or(0.0);
        let std_dev = variance_cycle_time.max(0.0).sqrt();
        let cv = coefficient_of_variation(variance_cycle_time, avg_cycle_time);

        let severity = Severity::from_variance_percent(station.variance_percent);
        let impact_score = impact_breakdown(station, cv, line_downtime).total();
        let root_causes = infer_root_causes(station, shifts, cv, std_dev);
        let recommendations = build_recommendations(
            &station.station_id,
            &station.station_name,
            &root_causes,
            impact_score,
        );

        Some(BottleneckFinding {
            station_id: station.station_id.clone(),
            station_name: station.station_name.clone(),
            severity,
            avg_cycle_time,
            target_cycle_time: station.target_cycle_time,
            variance_percent: station.variance_percent,
            frequency: impact_score / 10,
            impact_score,
            root_causes,
            recommendations,
        })
    }
}

impl Default for BottleneckAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
