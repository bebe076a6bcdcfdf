// ==========================================
// 产线监控驾驶舱 - 生产记录导入器
// ==========================================
// 流程: 解析 → 表头校验 → 映射 → 工位校验 → 批量落库
// 约束: 行级错误跳过计数，文件级/数据库错误整体失败
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::{CsvParser, FileParser};
use crate::repository::{ProductionRepository, StationRepository};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// 行级问题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportIssue {
    pub row: usize,
    pub message: String,
}

/// 导入摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub issues: Vec<ImportIssue>,
    pub elapsed_ms: u64,
}

// ==========================================
// ProductionImporter - 生产记录导入器
// ==========================================
pub struct ProductionImporter {
    station_repo: Arc<StationRepository>,
    production_repo: Arc<ProductionRepository>,
    file_parser: Box<dyn FileParser>,
    field_mapper: FieldMapper,
}

impl ProductionImporter {
    pub fn new(
        station_repo: Arc<StationRepository>,
        production_repo: Arc<ProductionRepository>,
    ) -> Self {
        Self::with_parser(station_repo, production_repo, Box::new(CsvParser))
    }

    pub fn with_parser(
        station_repo: Arc<StationRepository>,
        production_repo: Arc<ProductionRepository>,
        file_parser: Box<dyn FileParser>,
    ) -> Self {
        Self {
            station_repo,
            production_repo,
            file_parser,
            field_mapper: FieldMapper,
        }
    }

    /// 从 CSV 文件导入生产记录
    #[instrument(skip(self, file_path))]
    pub fn import_from_csv<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ImportSummary> {
        let start = Instant::now();
        let path = file_path.as_ref();
        info!(file_path = %path.display(), "开始导入生产记录");

        let rows = self.file_parser.parse_to_raw_rows(path)?;

        // 表头校验（取所有行出现过的列名）
        let columns: BTreeSet<&String> = rows.iter().flat_map(|r| r.fields.keys()).collect();
        if !rows.is_empty() {
            for required in FieldMapper::REQUIRED_COLUMNS {
                if !FieldMapper::has_column(columns.iter().copied(), required) {
                    return Err(ImportError::MissingColumn((*required).to_string()));
                }
            }
        }

        let known_stations: HashSet<String> =
            self.station_repo.list_ids()?.into_iter().collect();

        let mut records = Vec::with_capacity(rows.len());
        let mut issues = Vec::new();

        for row in &rows {
            let mapped = self.field_mapper.map_row(row).and_then(|record| {
                if known_stations.contains(&record.station_id) {
                    Ok(record)
                } else {
                    Err(ImportError::UnknownStation {
                        row: row.row_number,
                        station_id: record.station_id,
                    })
                }
            });

            match mapped {
                Ok(record) => records.push(record),
                Err(e) if e.is_row_error() => {
                    warn!(row = row.row_number, error = %e, "跳过无效行");
                    issues.push(ImportIssue {
                        row: row.row_number,
                        message: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        let imported = self.production_repo.batch_insert(&records)?;
        let summary = ImportSummary {
            imported,
            skipped: issues.len(),
            issues,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            imported = summary.imported,
            skipped = summary.skipped,
            elapsed_ms = summary.elapsed_ms,
            "生产记录导入完成"
        );
        Ok(summary)
    }
}
