// ==========================================
// 产线监控驾驶舱 - 生产记录数据仓储
// ==========================================
// 职责: 生产记录写入、窗口聚合、问答模板执行
// 红线: Repository 不含业务逻辑，只做数据映射
// ==========================================

mod aggregates;
mod core;
mod query;


pub use self::core::ProductionRepository;
