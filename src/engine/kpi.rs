// ==========================================
// 产线监控驾驶舱 - KPI 汇总引擎
// ==========================================
// 职责: 由工位产量统计计算 OEE / 小时产出 / 产线效率
// OEE = 可用率 × 性能率 × 良品率
// ==========================================

use crate::domain::kpi::{LineKpiSummary, StationKpi};
use crate::domain::station::StationProductionStats;
use tracing::debug;

const SECONDS_PER_HOUR: f64 = 3600.0;

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        (numerator / denominator).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

// ==========================================
// KpiCalculator - KPI 汇总引擎
// ==========================================
pub struct KpiCalculator {
    // 无状态引擎
}

impl KpiCalculator {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算产线 KPI
    ///
    /// # 参数
    /// - `stats`: 工位产量统计（无样本工位不参与均值）
    /// - `window_minutes`: 统计窗口长度（分钟），作为计划运行时间
    pub fn compute(&self, stats: &[StationProductionStats], window_minutes: f64) -> LineKpiSummary {
        let sampled: Vec<&StationProductionStats> = stats
            .iter()
            .filter(|s| s.sample_count > 0 && s.avg_cycle_time.is_some())
            .collect();

        if sampled.is_empty() || !(window_minutes > 0.0) {
            return LineKpiSummary::empty();
        }

        let stations: Vec<StationKpi> = sampled
            .iter()
            .map(|s| self.station_kpi(s, window_minutes))
            .collect();

        let n = stations.len() as f64;
        let mean = |f: fn(&StationKpi) -> f64| stations.iter().map(f).sum::<f64>() / n;

        let availability = mean(|k| k.availability);
        let performance = mean(|k| k.performance);
        let quality = mean(|k| k.quality);
        let oee = mean(|k| k.oee);

        // 小时产出由最慢工位决定
        let slowest = sampled
            .iter()
            .filter_map(|s| s.avg_cycle_time)
            .fold(0.0_f64, f64::max);
        let throughput_per_hour = if slowest > 0.0 {
            (SECONDS_PER_HOUR / slowest).floor() as i64
        } else {
            0
        };

        let total_target: f64 = sampled.iter().map(|s| s.target_cycle_time).sum();
        let total_actual: f64 = sampled.iter().filter_map(|s| s.avg_cycle_time).sum();
        let efficiency = if total_actual > 0.0 {
            round1(total_target / total_actual * 100.0)
        } else {
            0.0
        };

        let total_units: i64 = stations.iter().map(|k| k.units_produced).sum();
        let good_units: i64 = stations.iter().map(|k| k.good_units).sum();

        debug!(
            stations = stations.len(),
            oee = oee,
            throughput_per_hour = throughput_per_hour,
            "KPI 汇总完成"
        );

        LineKpiSummary {
            oee: round1(oee),
            availability: round1(availability),
            performance: round1(performance),
            quality: round1(quality),
            throughput_per_hour,
            efficiency,
            total_units,
            good_units,
            stations,
        }
    }

    fn station_kpi(&self, s: &StationProductionStats, window_minutes: f64) -> StationKpi {
        let downtime = s.total_downtime.max(0.0);
        let run_minutes = (window_minutes - downtime).max(0.0);

        let availability = ratio(run_minutes, window_minutes);
        let ideal_seconds = s.target_cycle_time * s.units_produced as f64;
        let performance = ratio(ideal_seconds, run_minutes * 60.0);

        let units = s.units_produced.max(0);
        let good_units = (units - s.defect_count.max(0)).max(0);
        let quality = if units > 0 {
            good_units as f64 / units as f64
        } else {
            1.0
        };

        let oee = availability * performance * quality;

        StationKpi {
            station_id: s.station_id.clone(),
            station_name: s.station_name.clone(),
            availability: round1(availability * 100.0),
            performance: round1(performance * 100.0),
            quality: round1(quality * 100.0),
            oee: round1(oee * 100.0),
            units_produced: units,
            good_units,
        }
    }
}

impl Default for KpiCalculator {
    fn default() -> Self {
        Self::new()
    }
}
