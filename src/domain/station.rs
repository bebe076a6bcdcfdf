// ==========================================
// 产线监控驾驶舱 - 工位与生产记录领域模型
// ==========================================
// 职责: 工位主数据、生产记录，以及仓储层交给引擎的聚合行
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Station - 工位主数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: String,              // 工位编号 (例: ST003)
    pub name: String,            // 工位名称
    pub sequence: i32,           // 产线顺序
    pub target_cycle_time: f64,  // 目标节拍 (秒)
    pub operator_count: i32,     // 操作工人数
}

// ==========================================
// ProductionRecord - 生产记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionRecord {
    pub station_id: String,
    pub shift: String,               // 班次标签 (例: Morning / Night)
    pub recorded_at: NaiveDateTime,
    pub cycle_time: f64,             // 实测节拍 (秒)
    pub units_produced: i64,
    pub defect_count: i64,
    pub downtime_minutes: f64,
}

// ==========================================
// StationAggregate - 工位聚合 (瓶颈分析输入)
// ==========================================
// 每次分析重新构建，构建后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationAggregate {
    pub station_id: String,
    pub station_name: String,
    pub target_cycle_time: f64,
    /// None 表示窗口内无样本，该工位不参与分析
    pub avg_cycle_time: Option<f64>,
    /// 节拍方差 (秒²)，缺失按 0 处理
    pub variance_cycle_time: Option<f64>,
    pub sample_count: i64,
    pub total_downtime: f64,
    /// (avg - target) / target * 100
    pub variance_percent: f64,
}

impl StationAggregate {
    /// 由原始统计量构建聚合行，并预计算偏差百分比
    ///
    /// target 非正或均值缺失时偏差百分比记 0（分析器会跳过此类工位）。
    pub fn new(
        station_id: impl Into<String>,
        station_name: impl Into<String>,
        target_cycle_time: f64,
        avg_cycle_time: Option<f64>,
        variance_cycle_time: Option<f64>,
        sample_count: i64,
        total_downtime: f64,
    ) -> Self {
        let variance_percent = match avg_cycle_time {
            Some(avg) if target_cycle_time > 0.0 => {
                (avg - target_cycle_time) / target_cycle_time * 100.0
            }
            _ => 0.0,
        };

        Self {
            station_id: station_id.into(),
            station_name: station_name.into(),
            target_cycle_time,
            avg_cycle_time,
            variance_cycle_time,
            sample_count,
            total_downtime,
            variance_percent,
        }
    }
}

// ==========================================
// ShiftAggregate - 班次×工位聚合
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftAggregate {
    pub shift: String,
    pub station_id: String,
    pub avg_cycle_time: f64,
    pub sample_count: i64,
}

// ==========================================
// StationProductionStats - 工位产量统计 (KPI 输入)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationProductionStats {
    pub station_id: String,
    pub station_name: String,
    pub target_cycle_time: f64,
    pub avg_cycle_time: Option<f64>,
    pub units_produced: i64,
    pub defect_count: i64,
    pub total_downtime: f64,
    pub sample_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variance_percent_precomputed() {
        let agg = StationAggregate::new("ST003", "Welding", 90.0, Some(110.0), None, 10, 0.0);
        assert!((agg.variance_percent - 22.222).abs() < 0.01);
    }

    #[test]
    fn test_variance_percent_without_samples() {
        let agg = StationAggregate::new("ST004", "Paint", 90.0, None, None, 0, 0.0);
        assert_eq!(agg.variance_percent, 0.0);

        let agg = StationAggregate::new("ST005", "Broken", 0.0, Some(50.0), None, 3, 0.0);
        assert_eq!(agg.variance_percent, 0.0);
    }
}
