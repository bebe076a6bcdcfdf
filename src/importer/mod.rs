// ==========================================
// 产线监控驾驶舱 - 导入层
// ==========================================
// 职责: 外部生产记录批量导入
// 支持: CSV
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod production_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, FileParser, RawRow};
pub use production_importer::{ImportIssue, ImportSummary, ProductionImporter};
