use crate::domain::station::StationAggregate;

/// 偏差分上限
const VARIANCE_SCORE_CAP: f64 = 40.0;
/// 一致性分上限
const CONSISTENCY_SCORE_CAP: f64 = 20.0;
/// 位置分基数（每个工位序号扣 2 分）
const POSITION_SCORE_BASE: f64 = 20.0;
/// 停机分满分
const DOWNTIME_SCORE_SCALE: f64 = 20.0;

/// 变异系数 cv = std / mean * 100
///
/// 均值为 0 或非有限值时返回 0。
pub(super) fn coefficient_of_variation(variance_cycle_time: f64, avg_cycle_time: f64) -> f64 {
    if avg_cycle_time == 0.0 || !avg_cycle_time.is_finite() {
        return 0.0;
    }
    let std_dev = variance_cycle_time.max(0.0).sqrt();
    std_dev / avg_cycle_time * 100.0
}

/// 解析工位编号尾部数字（"ST003" -> 3）
///
/// 无数字尾缀的编号按 0 处理；超出 u64 的尾缀饱和为 u64::MAX。
pub(super) fn station_number(station_id: &str) -> u64 {
    let digits: String = station_id
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    if digits.is_empty() {
        return 0;
    }
    digits.parse::<u64>().unwrap_or(u64::MAX)
}

/// 综合影响分数的四项子分
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct ImpactBreakdown {
    pub variance: f64,
    pub consistency: f64,
    pub position: f64,
    pub downtime: f64,
}

impl ImpactBreakdown {
    /// 子分求和后取整，并夹到 [0, 100]
    pub fn total(&self) -> i32 {
        let raw = self.variance + self.consistency + self.position + self.downtime;
        (raw.round() as i32).clamp(0, 100)
    }
}

/// 计算综合影响分数的子分
///
/// # 参数
/// - `station`: 当前工位聚合
/// - `cv`: 变异系数
/// - `line_downtime`: 本次调用内所有工位停机分钟合计
pub(super) fn impact_breakdown(
    station: &StationAggregate,
    cv: f64,
    line_downtime: f64,
) -> ImpactBreakdown {
    let variance = (station.variance_percent * 2.0).min(VARIANCE_SCORE_CAP);
    let consistency = cv.min(CONSISTENCY_SCORE_CAP);

    // 位置分：工位序号越小越靠前，影响越大
    let number = station_number(&station.station_id) as f64;
    let position = (POSITION_SCORE_BASE - number * 2.0).max(0.0);

    let downtime = if line_downtime > 0.0 {
        station.total_downtime / line_downtime * DOWNTIME_SCORE_SCALE
    } else {
        0.0
    };

    ImpactBreakdown {
        variance,
        consistency,
        position,
        downtime,
    }
}
