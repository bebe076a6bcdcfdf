// ==========================================
// 产线监控驾驶舱 - 决策对象：瓶颈发现
// ==========================================
// 职责: 定义瓶颈发现、根因、改善建议三类输出对象
// 生命周期: 每次分析调用创建一次，返回后不再修改
// ==========================================

use crate::domain::types::{CauseType, CostTier, RecommendationType, Severity};
use serde::{Deserialize, Serialize};

/// 瓶颈发现 (BottleneckFinding)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BottleneckFinding {
    /// 工位编号
    pub station_id: String,

    /// 工位名称
    pub station_name: String,

    /// 严重程度
    pub severity: Severity,

    /// 平均节拍 (秒)
    pub avg_cycle_time: f64,

    /// 目标节拍 (秒)
    pub target_cycle_time: f64,

    /// 节拍偏差百分比
    pub variance_percent: f64,

    /// 频次计数 = floor(impact_score / 10)
    pub frequency: i32,

    /// 综合影响分数 (0-100)
    pub impact_score: i32,

    /// 根因列表（按规则顺序）
    pub root_causes: Vec<RootCause>,

    /// 改善建议（按优先级顺序）
    pub recommendations: Vec<Recommendation>,
}

/// 根因
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootCause {
    /// 根因类型
    #[serde(rename = "type")]
    pub cause_type: CauseType,
    /// 描述
    pub description: String,
    /// 置信度 (0.0-1.0)
    pub confidence: f64,
    /// 证据
    pub evidence: Vec<String>,
}

/// 改善建议
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    #[serde(rename = "type")]
    pub recommendation_type: RecommendationType,
    pub description: String,
    /// 预期改善 (百分比)
    pub expected_improvement: i32,
    pub cost: CostTier,
    /// 实施周期 (例: "2-4 weeks")
    pub time_to_implement: String,
    /// 优先级，每个发现内从 1 开始递增
    pub priority: i32,
}

impl BottleneckFinding {
    /// 判断是否为严重瓶颈 (high 及以上)
    pub fn is_severe(&self) -> bool {
        self.severity >= Severity::High
    }

    /// 获取置信度最高的根因
    pub fn primary_cause(&self) -> Option<&RootCause> {
        self.root_causes.iter().max_by(|a, b| {
            a.confidence
                .partial_cmp(&b.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}

impl std::fmt::Display for BottleneckFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (severity: {}, impact: {}, avg: {:.1}s, target: {:.1}s)",
            self.station_id,
            self.severity,
            self.impact_score,
            self.avg_cycle_time,
            self.target_cycle_time
        )
    }
}
