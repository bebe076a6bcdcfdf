// ==========================================
// 产线监控驾驶舱 - 产线仿真领域模型
// ==========================================
// 职责: 仿真输入工位、变更项与仿真结果
// ==========================================

use crate::domain::types::ChangeType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// SimStation - 仿真工位
// ==========================================
// 基线对象不可变，变更作用于单独的工作副本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimStation {
    pub id: String,
    pub name: String,
    pub target_cycle_time: f64,
    pub operators: i32,
    pub current_avg_cycle_time: f64,
}

// ==========================================
// SimulationChange - 仿真变更项
// ==========================================
// 同一工位可有多条变更，按列表顺序作用于同一工作副本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationChange {
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    pub station_id: String,
    pub value: f64,
    #[serde(default)]
    pub description: String,
}

impl SimulationChange {
    pub fn new(change_type: ChangeType, station_id: impl Into<String>, value: f64) -> Self {
        Self {
            change_type,
            station_id: station_id.into(),
            value,
            description: String::new(),
        }
    }
}

// ==========================================
// SimulationResult - 产线指标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// 小时产出 (向下取整)
    pub throughput: i64,
    /// 平均节拍 (保留 1 位小数)
    pub avg_cycle_time: f64,
    /// 产线效率百分比 (保留 1 位小数)
    pub efficiency: f64,
    /// 瓶颈工位 (空产线为 None)
    pub bottleneck_station: Option<String>,
    /// 总等待时间 (取整)
    pub wait_time: i64,
    /// 工位编号 -> 利用率 (0.0-1.0)
    pub utilization: BTreeMap<String, f64>,
}

impl SimulationResult {
    /// 空产线/退化输入的结果
    pub fn degenerate() -> Self {
        Self {
            throughput: 0,
            avg_cycle_time: 0.0,
            efficiency: 0.0,
            bottleneck_station: None,
            wait_time: 0,
            utilization: BTreeMap::new(),
        }
    }
}

/// 基线与方案对比
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutcome {
    pub baseline: SimulationResult,
    pub projected: SimulationResult,
}

impl SimulationOutcome {
    /// 小时产出变化量
    pub fn throughput_delta(&self) -> i64 {
        self.projected.throughput - self.baseline.throughput
    }

    /// 瓶颈工位是否转移
    pub fn bottleneck_shifted(&self) -> bool {
        self.baseline.bottleneck_station != self.projected.bottleneck_station
    }
}

/// 仿真请求 (API 入参)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    pub stations: Vec<SimStation>,
    #[serde(default)]
    pub changes: Vec<SimulationChange>,
}
