// ==========================================
// 产线监控驾驶舱 - 产线仿真引擎
// ==========================================
// 职责: 计算基线与变更后方案的产线指标
// 输入: 仿真工位 + 变更列表
// 输出: 基线 / 方案两组 SimulationResult
// ==========================================
// 注: 增减人员的节拍始终由基线节拍重新推算，同一工位多次变更不复合
// ==========================================

use crate::domain::simulation::{SimStation, SimulationChange, SimulationOutcome, SimulationResult};
use crate::domain::types::ChangeType;
use crate::engine::error::{EngineError, EngineResult};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// 每名操作工带来的节拍改善系数
const ADD_OPERATOR_GAIN: f64 = 0.15;
/// 每减少一名操作工带来的节拍恶化系数
const REMOVE_OPERATOR_PENALTY: f64 = 0.2;
const SECONDS_PER_HOUR: f64 = 3600.0;
/// 单次增减人员的上限
pub const MAX_OPERATOR_DELTA: f64 = 100.0;

// ==========================================
// LineSimulator - 产线仿真引擎
// ==========================================
pub struct LineSimulator {
    // 无状态引擎
}

impl LineSimulator {
    pub fn new() -> Self {
        Self {}
    }

    /// 运行仿真
    ///
    /// # 参数
    /// - `stations`: 基线工位（不会被修改）
    /// - `changes`: 变更列表，按列表顺序作用
    ///
    /// # 返回
    /// - Ok(SimulationOutcome): 基线与方案指标
    /// - Err(EngineError): 输入含非有限数值、人数变化超限或节拍覆盖值非正
    pub fn simulate(
        &self,
        stations: &[SimStation],
        changes: &[SimulationChange],
    ) -> EngineResult<SimulationOutcome> {
        validate_inputs(stations, changes)?;

        let known: HashSet<&str> = stations.iter().map(|s| s.id.as_str()).collect();
        for change in changes {
            if !known.contains(change.station_id.as_str()) {
                warn!(
                    station_id = %change.station_id,
                    change_type = %change.change_type,
                    "变更指向未知工位，忽略"
                );
            }
        }

        let projected_stations: Vec<SimStation> = stations
            .iter()
            .map(|station| apply_changes(station, changes))
            .collect();

        let baseline = compute_metrics(stations);
        let projected = compute_metrics(&projected_stations);

        debug!(
            stations = stations.len(),
            changes = changes.len(),
            baseline_throughput = baseline.throughput,
            projected_throughput = projected.throughput,
            "产线仿真完成"
        );

        Ok(SimulationOutcome {
            baseline,
            projected,
        })
    }
}

impl Default for LineSimulator {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_inputs(stations: &[SimStation], changes: &[SimulationChange]) -> EngineResult<()> {
    for station in stations {
        if !station.current_avg_cycle_time.is_finite() || !station.target_cycle_time.is_finite() {
            return Err(EngineError::InvalidStation {
                station_id: station.id.clone(),
                message: "节拍必须为有限数值".to_string(),
            });
        }
    }

    for change in changes {
        if !change.value.is_finite() {
            return Err(EngineError::InvalidChange {
                station_id: change.station_id.clone(),
                message: format!("{} 的变更值必须为有限数值", change.change_type),
            });
        }

        match change.change_type {
            ChangeType::AddOperator | ChangeType::RemoveOperator => {
                if change.value.abs() > MAX_OPERATOR_DELTA {
                    return Err(EngineError::InvalidChange {
                        station_id: change.station_id.clone(),
                        message: format!(
                            "{} 的人数变化超出范围 (|{}| > {})",
                            change.change_type, change.value, MAX_OPERATOR_DELTA
                        ),
                    });
                }
            }
            ChangeType::ChangeCycleTime => {
                if change.value <= 0.0 {
                    return Err(EngineError::InvalidChange {
                        station_id: change.station_id.clone(),
                        message: format!("目标节拍覆盖值必须为正数: {}", change.value),
                    });
                }
            }
        }
    }

    Ok(())
}

/// 将指向该工位的变更依次作用于工作副本
fn apply_changes(baseline: &SimStation, changes: &[SimulationChange]) -> SimStation {
    let mut working = baseline.clone();

    for change in changes.iter().filter(|c| c.station_id == baseline.id) {
        match change.change_type {
            ChangeType::AddOperator => {
                // 负值表示通过同一类型减人
                let delta = change.value.round() as i32;
                working.operators = working.operators.saturating_add(delta).max(1);
                let factor = 1.0
                    - ADD_OPERATOR_GAIN * delta as f64 * (1.0 / (working.operators as f64).sqrt());
                working.current_avg_cycle_time = baseline.current_avg_cycle_time * factor;
            }
            ChangeType::RemoveOperator => {
                let delta = change.value.round() as i32;
                working.operators = working.operators.saturating_sub(delta).max(1);
                working.current_avg_cycle_time = baseline.current_avg_cycle_time
                    * (1.0 + REMOVE_OPERATOR_PENALTY * delta as f64);
            }
            ChangeType::ChangeCycleTime => {
                working.current_avg_cycle_time = change.value;
            }
        }
    }

    working
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// 计算产线指标
///
/// 瓶颈为平均节拍严格最大的工位（并列取先出现者）。
/// 空产线或瓶颈节拍非正时返回退化结果。
pub fn compute_metrics(stations: &[SimStation]) -> SimulationResult {
    let Some(first) = stations.first() else {
        return SimulationResult::degenerate();
    };

    let mut bottleneck = first;
    for station in &stations[1..] {
        if station.current_avg_cycle_time > bottleneck.current_avg_cycle_time {
            bottleneck = station;
        }
    }

    let count = stations.len() as f64;
    let total_cycle: f64 = stations.iter().map(|s| s.current_avg_cycle_time).sum();
    let avg_cycle_time = round1(total_cycle / count);

    let bottleneck_ct = bottleneck.current_avg_cycle_time;
    if bottleneck_ct <= 0.0 {
        warn!(
            station_id = %bottleneck.id,
            cycle_time = bottleneck_ct,
            "瓶颈节拍非正，返回退化结果"
        );
        return SimulationResult {
            avg_cycle_time,
            ..SimulationResult::degenerate()
        };
    }

    let throughput = (SECONDS_PER_HOUR / bottleneck_ct).floor() as i64;

    let utilization: BTreeMap<String, f64> = stations
        .iter()
        .map(|s| (s.id.clone(), (s.current_avg_cycle_time / bottleneck_ct).clamp(0.0, 1.0)))
        .collect();

    let wait_time = stations
        .iter()
        .map(|s| bottleneck_ct - s.current_avg_cycle_time)
        .sum::<f64>()
        .round() as i64;

    let total_target: f64 = stations.iter().map(|s| s.target_cycle_time).sum();
    let efficiency = round1(total_target / (bottleneck_ct * count) * 100.0);

    SimulationResult {
        throughput,
        avg_cycle_time,
        efficiency,
        bottleneck_station: Some(bottleneck.id.clone()),
        wait_time,
        utilization,
    }
}
