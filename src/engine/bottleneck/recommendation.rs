use crate::domain::bottleneck::{Recommendation, RootCause};
use crate::domain::types::{CauseType, CostTier, RecommendationType};

/// 影响分数超过该值时追加产线平衡建议
const REBALANCE_IMPACT_THRESHOLD: i32 = 50;
const REBALANCE_IMPROVEMENT: i32 = 15;

/// 建议生成器：优先级为单个发现内的连续计数，从 1 开始
struct RecommendationSink<'a> {
    station_id: &'a str,
    items: Vec<Recommendation>,
}

impl<'a> RecommendationSink<'a> {
    fn new(station_id: &'a str) -> Self {
        Self {
            station_id,
            items: Vec::new(),
        }
    }

    fn push(
        &mut self,
        cause_tag: &str,
        recommendation_type: RecommendationType,
        description: String,
        expected_improvement: i32,
        cost: CostTier,
        time_to_implement: &str,
    ) {
        let priority = self.items.len() as i32 + 1;
        self.items.push(Recommendation {
            id: format!(
                "{}-{}-{}-{}",
                self.station_id, cause_tag, recommendation_type, priority
            ),
            recommendation_type,
            description,
            expected_improvement,
            cost,
            time_to_implement: time_to_implement.to_string(),
            priority,
        });
    }
}

fn scaled(confidence: f64, factor: f64) -> i32 {
    (confidence * factor).round() as i32
}

/// 按根因顺序生成改善建议
pub(super) fn build_recommendations(
    station_id: &str,
    station_name: &str,
    causes: &[RootCause],
    impact_score: i32,
) -> Vec<Recommendation> {
    let mut sink = RecommendationSink::new(station_id);

    for cause in causes {
        let tag = cause.cause_type.as_str();
        match cause.cause_type {
            CauseType::Shift => {
                sink.push(
                    tag,
                    RecommendationType::Training,
                    format!("针对慢班次开展 {} 标准作业培训", station_name),
                    scaled(cause.confidence, 15.0),
                    CostTier::Low,
                    "1-2 weeks",
                );
            }
            CauseType::Operator => {
                sink.push(
                    tag,
                    RecommendationType::AddOperator,
                    format!("{} 增配一名操作工分担作业", station_name),
                    scaled(cause.confidence, 20.0),
                    CostTier::Medium,
                    "2-4 weeks",
                );
                sink.push(
                    tag,
                    RecommendationType::Training,
                    format!("{} 操作工交叉培训，统一作业方法", station_name),
                    scaled(cause.confidence, 10.0),
                    CostTier::Low,
                    "1 week",
                );
            }
            CauseType::Equipment => {
                sink.push(
                    tag,
                    RecommendationType::Equipment,
                    format!("评估 {} 设备升级或改造", station_name),
                    scaled(cause.confidence, 25.0),
                    CostTier::High,
                    "4-8 weeks",
                );
                sink.push(
                    tag,
                    RecommendationType::Maintenance,
                    format!("{} 实施预防性维护计划", station_name),
                    scaled(cause.confidence, 12.0),
                    CostTier::Medium,
                    "2 weeks",
                );
            }
            // 物料/工艺根因暂无对应规则
            CauseType::Material | CauseType::Process => {}
        }
    }

    if impact_score > REBALANCE_IMPACT_THRESHOLD {
        sink.push(
            "line",
            RecommendationType::Rebalance,
            format!("重新平衡产线作业，将 {} 部分工序分配到相邻工位", station_name),
            REBALANCE_IMPROVEMENT,
            CostTier::Medium,
            "2-3 weeks",
        );
    }

    sink.items
}
