// ==========================================
// 产线监控驾驶舱 - 驾驶舱 API
// ==========================================
// 职责: 组合仓储、引擎与配置，为 HTTP/UI 外壳提供聚合接口
// 架构: API 层 → Repository 取数 → Engine 纯计算
// ==========================================

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Local, NaiveDateTime};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::bottleneck::BottleneckFinding;
use crate::domain::kpi::LineKpiSummary;
use crate::domain::simulation::{SimulationChange, SimulationOutcome, SimulationRequest};
use crate::domain::station::Station;
use crate::engine::{BottleneckAnalyzer, KpiCalculator, LineSimulator};
use crate::importer::{ImportSummary, ProductionImporter};
use crate::query::{QueryIntent, QueryPlan, QueryRouter, MAX_WINDOW_DAYS};
use crate::repository::{ProductionRepository, StationRepository};

/// 问答回复
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryAnswer {
    pub question: String,
    /// 未命中任何规则时为 None
    pub intent: Option<QueryIntent>,
    pub plan: Option<QueryPlan>,
    pub rows: Vec<serde_json::Map<String, serde_json::Value>>,
    pub message: String,
    /// 未命中时给出的示例问法
    pub suggestions: Vec<String>,
}

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================
pub struct DashboardApi {
    station_repo: Arc<StationRepository>,
    production_repo: Arc<ProductionRepository>,
    config: Arc<ConfigManager>,
    importer: ProductionImporter,
    analyzer: BottleneckAnalyzer,
    simulator: LineSimulator,
    kpi_calculator: KpiCalculator,
    clock: fn() -> NaiveDateTime,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl DashboardApi {
    /// 从已迁移的连接创建 DashboardApi
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        let station_repo = Arc::new(StationRepository::new(conn.clone()));
        let production_repo = Arc::new(ProductionRepository::new(conn.clone()));
        let config = Arc::new(ConfigManager::from_connection(conn));
        let importer = ProductionImporter::new(station_repo.clone(), production_repo.clone());

        Self {
            station_repo,
            production_repo,
            config,
            importer,
            analyzer: BottleneckAnalyzer::new(),
            simulator: LineSimulator::new(),
            kpi_calculator: KpiCalculator::new(),
            clock: local_now,
        }
    }

    /// 替换时钟（测试固定"当前时间"）
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &ConfigManager {
        &self.config
    }

    fn window_start(&self, window_days: Option<i64>, default_days: i64) -> ApiResult<NaiveDateTime> {
        let days = match window_days {
            Some(d) if d <= 0 || d > MAX_WINDOW_DAYS => {
                return Err(ApiError::InvalidInput(format!(
                    "窗口天数必须在 1..={} 之间: {}",
                    MAX_WINDOW_DAYS, d
                )))
            }
            Some(d) => d,
            None => default_days,
        };
        Ok((self.clock)() - Duration::days(days))
    }

    // ==========================================
    // 工位主数据
    // ==========================================

    pub fn list_stations(&self) -> ApiResult<Vec<Station>> {
        Ok(self.station_repo.list()?)
    }

    pub fn upsert_station(&self, station: &Station) -> ApiResult<()> {
        if station.id.trim().is_empty() {
            return Err(ApiError::InvalidInput("工位编号不能为空".to_string()));
        }
        self.station_repo.upsert(station)?;
        Ok(())
    }

    // ==========================================
    // 瓶颈分析
    // ==========================================

    /// 分析瓶颈工位
    ///
    /// # 参数
    /// - `window_days`: 统计窗口（天），None 取配置 analysis_window_days
    #[instrument(skip(self))]
    pub fn analyze_bottlenecks(&self, window_days: Option<i64>) -> ApiResult<Vec<BottleneckFinding>> {
        let since = self.window_start(window_days, self.config.get_analysis_window_days()?)?;

        let stations = self.production_repo.station_aggregates(since)?;
        let shifts = self.production_repo.shift_aggregates(since)?;
        let findings = self.analyzer.analyze(&stations, &shifts);

        info!(
            stations = stations.len(),
            findings = findings.len(),
            since = %since,
            "瓶颈分析完成"
        );
        Ok(findings)
    }

    // ==========================================
    // 产线仿真
    // ==========================================

    /// 对调用方提供的工位运行仿真
    pub fn run_simulation(&self, request: &SimulationRequest) -> ApiResult<SimulationOutcome> {
        for station in &request.stations {
            if station.id.trim().is_empty() {
                return Err(ApiError::InvalidInput("仿真工位编号不能为空".to_string()));
            }
        }
        Ok(self.simulator.simulate(&request.stations, &request.changes)?)
    }

    /// 以当前产线（窗口内实测节拍）为基线运行仿真
    #[instrument(skip(self, changes), fields(changes = changes.len()))]
    pub fn simulate_current_line(&self, changes: &[SimulationChange]) -> ApiResult<SimulationOutcome> {
        let since = self.window_start(None, self.config.get_analysis_window_days()?)?;
        let stations = self.production_repo.sim_stations(since)?;
        if stations.is_empty() {
            return Err(ApiError::NotFound("产线尚未配置任何工位".to_string()));
        }

        let outcome = self.simulator.simulate(&stations, changes)?;
        info!(
            baseline = outcome.baseline.throughput,
            projected = outcome.projected.throughput,
            "产线仿真完成"
        );
        Ok(outcome)
    }

    // ==========================================
    // KPI
    // ==========================================

    /// 产线 KPI 汇总
    ///
    /// # 参数
    /// - `window_days`: 统计窗口（天），None 取配置 kpi_window_days
    pub fn get_line_kpis(&self, window_days: Option<i64>) -> ApiResult<LineKpiSummary> {
        let default_days = self.config.get_kpi_window_days()?;
        let days = window_days.unwrap_or(default_days);
        let since = self.window_start(Some(days), default_days)?;

        let stats = self.production_repo.production_stats(since)?;
        Ok(self.kpi_calculator.compute(&stats, (days * 24 * 60) as f64))
    }

    // ==========================================
    // 问答
    // ==========================================

    /// 受限自然语言问答
    #[instrument(skip(self))]
    pub fn ask(&self, question: &str) -> ApiResult<QueryAnswer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ApiError::InvalidInput("问题不能为空".to_string()));
        }

        let router = QueryRouter::new(
            self.config.get_analysis_window_days()?,
            self.config.get_query_default_limit()?,
        );

        let Some(plan) = router.route(question, (self.clock)()) else {
            info!(question = question, "问答未命中任何规则");
            return Ok(QueryAnswer {
                question: question.to_string(),
                intent: None,
                plan: None,
                rows: Vec::new(),
                message: "暂不支持该问题，可参考以下问法".to_string(),
                suggestions: router
                    .supported_intents()
                    .iter()
                    .map(|i| i.example().to_string())
                    .collect(),
            });
        };

        let rows = self.production_repo.run_query_plan(&plan)?;
        Ok(QueryAnswer {
            question: question.to_string(),
            intent: Some(plan.intent),
            message: format!("共 {} 条结果", rows.len()),
            plan: Some(plan),
            rows,
            suggestions: Vec::new(),
        })
    }

    // ==========================================
    // 导入
    // ==========================================

    /// 导入生产记录 CSV
    pub fn import_production_csv<P: AsRef<Path>>(&self, path: P) -> ApiResult<ImportSummary> {
        Ok(self.importer.import_from_csv(path)?)
    }
}
