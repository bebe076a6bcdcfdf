use crate::domain::bottleneck::RootCause;
use crate::domain::station::{ShiftAggregate, StationAggregate};
use crate::domain::types::CauseType;

// ===== 规则阈值 =====
const SHIFT_SPREAD_THRESHOLD: f64 = 10.0;
const SHIFT_CONFIDENCE_CAP: f64 = 0.9;
const OPERATOR_CV_THRESHOLD: f64 = 15.0;
const OPERATOR_CONFIDENCE_CAP: f64 = 0.85;
const EQUIPMENT_VARIANCE_THRESHOLD: f64 = 15.0;
const EQUIPMENT_CV_CEILING: f64 = 10.0;
const EQUIPMENT_SLOW_CONFIDENCE: f64 = 0.75;
const DOWNTIME_MINUTES_THRESHOLD: f64 = 60.0;
const DOWNTIME_CONFIDENCE: f64 = 0.8;

/// 按固定规则顺序推断根因：班次 → 人员 → 设备(持续偏慢) → 设备(停机)
///
/// 各规则独立判断，一个工位可累积多个根因。
pub(super) fn infer_root_causes(
    station: &StationAggregate,
    shifts: &[ShiftAggregate],
    cv: f64,
    std_dev: f64,
) -> Vec<RootCause> {
    let mut causes = Vec::new();

    if let Some(cause) = shift_cause(station, shifts) {
        causes.push(cause);
    }

    // 人员：节拍离散度高
    if cv > OPERATOR_CV_THRESHOLD {
        causes.push(RootCause {
            cause_type: CauseType::Operator,
            description: "节拍波动大，操作一致性不足".to_string(),
            confidence: bounded_confidence(cv / 25.0, OPERATOR_CONFIDENCE_CAP),
            evidence: vec![
                format!("变异系数 {:.1}%", cv),
                format!("节拍标准差 {:.1}s", std_dev),
            ],
        });
    }

    // 设备：持续偏慢但波动小
    if station.variance_percent > EQUIPMENT_VARIANCE_THRESHOLD && cv < EQUIPMENT_CV_CEILING {
        causes.push(RootCause {
            cause_type: CauseType::Equipment,
            description: "节拍持续偏慢且波动小，疑似设备能力不足".to_string(),
            confidence: EQUIPMENT_SLOW_CONFIDENCE,
            evidence: vec![format!(
                "平均节拍高于目标 {:.1}%",
                station.variance_percent
            )],
        });
    }

    // 设备：停机累计过长（与上一条相互独立）
    if station.total_downtime > DOWNTIME_MINUTES_THRESHOLD {
        causes.push(RootCause {
            cause_type: CauseType::Equipment,
            description: "停机时间过长，设备可靠性不足".to_string(),
            confidence: DOWNTIME_CONFIDENCE,
            evidence: vec![format!("累计停机 {:.0} 分钟", station.total_downtime)],
        });
    }

    causes
}

/// 班次差异根因：至少两个班次，且最慢/最快班次差值超过目标节拍的 10%
fn shift_cause(station: &StationAggregate, shifts: &[ShiftAggregate]) -> Option<RootCause> {
    let station_shifts: Vec<&ShiftAggregate> = shifts
        .iter()
        .filter(|s| s.station_id == station.station_id)
        .collect();

    if station_shifts.len() < 2 {
        return None;
    }

    // 最慢班次：平均节拍最大者，并列时取先出现的
    let mut worst = station_shifts[0];
    let mut fastest = station_shifts[0].avg_cycle_time;
    for shift in &station_shifts[1..] {
        if shift.avg_cycle_time > worst.avg_cycle_time {
            worst = shift;
        }
        fastest = fastest.min(shift.avg_cycle_time);
    }

    let spread_percent =
        (worst.avg_cycle_time - fastest) / station.target_cycle_time * 100.0;
    if spread_percent <= SHIFT_SPREAD_THRESHOLD {
        return None;
    }

    Some(RootCause {
        cause_type: CauseType::Shift,
        description: format!("{} 班次节拍明显慢于其他班次", worst.shift),
        confidence: bounded_confidence(spread_percent / 20.0, SHIFT_CONFIDENCE_CAP),
        evidence: vec![
            format!("{} 班次平均节拍 {:.1}s", worst.shift, worst.avg_cycle_time),
            format!("目标节拍 {:.1}s", station.target_cycle_time),
        ],
    })
}

fn bounded_confidence(raw: f64, cap: f64) -> f64 {
    raw.min(cap).max(0.0)
}
