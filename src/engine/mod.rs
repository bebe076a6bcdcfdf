// ==========================================
// 产线监控驾驶舱 - 引擎层
// ==========================================
// 职责: 纯数值变换，不拼 SQL，不访问存储
// 约束: 无模块级状态，可并发调用
// ==========================================

pub mod bottleneck;
pub mod error;
pub mod kpi;
pub mod simulator;

// 重导出核心引擎
pub use bottleneck::BottleneckAnalyzer;
pub use error::{EngineError, EngineResult};
pub use kpi::KpiCalculator;
pub use simulator::{compute_metrics, LineSimulator};
