// ==========================================
// 产线监控驾驶舱 - 瓶颈分析引擎
// ==========================================
// 职责: 工位节拍偏差评分、根因推断与改善建议
// 输入: 工位聚合 + 班次聚合
// 输出: 按影响分数降序的瓶颈发现
// ==========================================

mod core;
mod recommendation;
mod root_cause;
mod scoring;


pub use self::core::BottleneckAnalyzer;
