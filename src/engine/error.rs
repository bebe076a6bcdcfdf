// ==========================================
// 产线监控驾驶舱 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 引擎对退化输入返回可用结果，仅对调用方违约报错
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("无效的仿真变更 (station={station_id}): {message}")]
    InvalidChange { station_id: String, message: String },

    #[error("无效的仿真工位 (station={station_id}): {message}")]
    InvalidStation { station_id: String, message: String },
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
