// ==========================================
// 产线监控驾驶舱 - KPI 汇总模型
// ==========================================
// OEE = 可用率 × 性能率 × 良品率
// ==========================================

use serde::{Deserialize, Serialize};

/// 工位 KPI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationKpi {
    pub station_id: String,
    pub station_name: String,
    pub availability: f64, // 百分比
    pub performance: f64,  // 百分比
    pub quality: f64,      // 百分比
    pub oee: f64,          // 百分比
    pub units_produced: i64,
    pub good_units: i64,
}

/// 产线 KPI 汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineKpiSummary {
    pub oee: f64,
    pub availability: f64,
    pub performance: f64,
    pub quality: f64,
    /// 小时产出 (由最慢工位决定)
    pub throughput_per_hour: i64,
    /// 产线效率百分比 = Σ目标节拍 / Σ实际节拍 × 100
    pub efficiency: f64,
    pub total_units: i64,
    pub good_units: i64,
    pub stations: Vec<StationKpi>,
}

impl LineKpiSummary {
    pub fn empty() -> Self {
        Self {
            oee: 0.0,
            availability: 0.0,
            performance: 0.0,
            quality: 0.0,
            throughput_per_hour: 0,
            efficiency: 0.0,
            total_units: 0,
            good_units: 0,
            stations: Vec::new(),
        }
    }
}
