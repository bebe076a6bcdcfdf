// ==========================================
// 产线监控驾驶舱 - 问答层
// ==========================================
// 职责: 关键词 -> 固定 SQL 模板分发
// 约束: 模板全部参数化，不拼接用户输入
// ==========================================

pub mod router;
pub mod templates;

pub use router::{QueryContext, QueryIntent, QueryPlan, QueryRouter, QueryRule, MAX_WINDOW_DAYS};
