// ==========================================
// 产线监控驾驶舱 - 领域层
// ==========================================
// 职责: 实体、聚合行与决策输出对象
// ==========================================

pub mod bottleneck;
pub mod kpi;
pub mod simulation;
pub mod station;
pub mod types;

// 重导出核心类型
pub use bottleneck::{BottleneckFinding, Recommendation, RootCause};
pub use kpi::{LineKpiSummary, StationKpi};
pub use simulation::{
    SimStation, SimulationChange, SimulationOutcome, SimulationRequest, SimulationResult,
};
pub use station::{
    ProductionRecord, ShiftAggregate, Station, StationAggregate, StationProductionStats,
};
pub use types::{CauseType, ChangeType, CostTier, RecommendationType, Severity};
