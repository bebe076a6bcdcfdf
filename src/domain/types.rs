// ==========================================
// 产线监控驾驶舱 - 领域类型定义
// ==========================================
// 职责: 瓶颈分析与产线仿真使用的封闭枚举
// 序列化格式: snake_case (与前端/HTTP 层一致)
// 约束: 未识别的取值视为调用方违约，反序列化直接失败
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 严重程度 (Severity)
// ==========================================
// 有序: low < medium < high < critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// 由节拍偏差百分比推导严重程度
    ///
    /// 阈值对每档下界为开区间：恰好 20 为 high，恰好 10 为 medium，恰好 5 为 low。
    pub fn from_variance_percent(variance_percent: f64) -> Self {
        if variance_percent > 20.0 {
            Severity::Critical
        } else if variance_percent > 10.0 {
            Severity::High
        } else if variance_percent > 5.0 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 根因类型 (Cause Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CauseType {
    Shift,
    Operator,
    Equipment,
    Material,
    Process,
}

impl CauseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CauseType::Shift => "shift",
            CauseType::Operator => "operator",
            CauseType::Equipment => "equipment",
            CauseType::Material => "material",
            CauseType::Process => "process",
        }
    }
}

impl fmt::Display for CauseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 改善建议类型 (Recommendation Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    AddOperator,
    Training,
    Equipment,
    Rebalance,
    Maintenance,
}

impl RecommendationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationType::AddOperator => "add_operator",
            RecommendationType::Training => "training",
            RecommendationType::Equipment => "equipment",
            RecommendationType::Rebalance => "rebalance",
            RecommendationType::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for RecommendationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 成本档位 (Cost Tier)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostTier {
    Low,
    Medium,
    High,
}

impl fmt::Display for CostTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostTier::Low => write!(f, "low"),
            CostTier::Medium => write!(f, "medium"),
            CostTier::High => write!(f, "high"),
        }
    }
}

// ==========================================
// 仿真变更类型 (Change Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    AddOperator,
    RemoveOperator,
    ChangeCycleTime,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeType::AddOperator => write!(f, "add_operator"),
            ChangeType::RemoveOperator => write!(f, "remove_operator"),
            ChangeType::ChangeCycleTime => write!(f, "change_cycle_time"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_buckets() {
        assert_eq!(Severity::from_variance_percent(21.0), Severity::Critical);
        assert_eq!(Severity::from_variance_percent(15.0), Severity::High);
        assert_eq!(Severity::from_variance_percent(7.0), Severity::Medium);
        assert_eq!(Severity::from_variance_percent(3.0), Severity::Low);
    }

    #[test]
    fn test_severity_boundaries_stay_in_lower_bucket() {
        assert_eq!(Severity::from_variance_percent(20.0), Severity::High);
        assert_eq!(Severity::from_variance_percent(10.0), Severity::Medium);
        assert_eq!(Severity::from_variance_percent(5.0), Severity::Low);
        assert_eq!(Severity::from_variance_percent(-30.0), Severity::Low);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&RecommendationType::AddOperator).unwrap(),
            "\"add_operator\""
        );
        assert_eq!(
            serde_json::from_str::<ChangeType>("\"change_cycle_time\"").unwrap(),
            ChangeType::ChangeCycleTime
        );
        assert!(serde_json::from_str::<ChangeType>("\"teleport\"").is_err());
        assert!(serde_json::from_str::<CostTier>("\"free\"").is_err());
    }
}
