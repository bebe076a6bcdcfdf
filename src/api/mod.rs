// ==========================================
// 产线监控驾驶舱 - API 层
// ==========================================
// 职责: 提供业务 API 接口，供 CLI / HTTP 外壳调用
// ==========================================

pub mod dashboard_api;
pub mod error;

// 重导出核心类型
pub use dashboard_api::{DashboardApi, QueryAnswer};
pub use error::{ApiError, ApiResult};
