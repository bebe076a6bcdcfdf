// ==========================================
// 产线监控驾驶舱 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 核心: 瓶颈评分/根因/建议引擎 + 产线吞吐仿真
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 纯计算
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 问答层 - 关键词到 SQL 模板
pub mod query;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/迁移）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{CauseType, ChangeType, CostTier, RecommendationType, Severity};

// 领域实体
pub use domain::{
    BottleneckFinding, LineKpiSummary, ProductionRecord, Recommendation, RootCause,
    ShiftAggregate, SimStation, SimulationChange, SimulationOutcome, SimulationRequest,
    SimulationResult, Station, StationAggregate,
};

// 引擎
pub use engine::{BottleneckAnalyzer, EngineError, KpiCalculator, LineSimulator};

// API
pub use api::{ApiError, ApiResult, DashboardApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "产线监控驾驶舱";
