use super::core::ProductionRepository;
use crate::db::TIMESTAMP_FORMAT;
use crate::query::QueryPlan;
use crate::repository::error::RepositoryResult;
use rusqlite::types::ValueRef;
use rusqlite::{params, Row, Statement};
use serde_json::{Map, Number, Value};

/// 问答结果行（列名 -> 值）
pub type QueryRow = Map<String, Value>;

impl ProductionRepository {
    // ==========================================
    // 问答模板执行
    // ==========================================

    /// 执行路由得到的查询计划，按列名返回 JSON 行
    pub fn run_query_plan(&self, plan: &QueryPlan) -> RepositoryResult<Vec<QueryRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(plan.sql)?;
        let columns: Vec<String> = column_names(&stmt);
        let limit = plan.limit as i64;

        let mut rows = if plan.intent.uses_window() {
            stmt.query(params![plan.since.format(TIMESTAMP_FORMAT).to_string(), limit])?
        } else {
            stmt.query(params![limit])?
        };

        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            result.push(row_to_json(row, &columns)?);
        }

        tracing::debug!(intent = ?plan.intent, rows = result.len(), "问答模板执行完成");
        Ok(result)
    }
}

fn column_names(stmt: &Statement<'_>) -> Vec<String> {
    stmt.column_names().into_iter().map(str::to_string).collect()
}

fn row_to_json(row: &Row<'_>, columns: &[String]) -> rusqlite::Result<QueryRow> {
    let mut map = Map::new();
    for (idx, name) in columns.iter().enumerate() {
        let value = match row.get_ref(idx)? {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::from(i),
            ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
            ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(_) => Value::Null,
        };
        map.insert(name.clone(), value);
    }
    Ok(map)
}
