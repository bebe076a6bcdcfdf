// ==========================================
// 产线监控驾驶舱 - 配置层
// ==========================================
// 存储: config_kv 表
// ==========================================

pub mod config_manager;

pub use config_manager::{config_keys, default_db_path, ConfigManager};
