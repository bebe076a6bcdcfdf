// ==========================================
// 产线监控驾驶舱 - 问答路由
// ==========================================
// 职责: 将自然语言问题按关键词映射到固定 SQL 模板
// 规则: 有序 (谓词, 模板构建器) 列表，首个命中者生效
// 注: 仅做关键词匹配，不做意图理解
// ==========================================

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::templates;

/// 时间窗口上限（天）
pub const MAX_WINDOW_DAYS: i64 = 366;

/// 问题意图
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    Downtime,
    Quality,
    ShiftComparison,
    SlowestStations,
    ProductionOutput,
    StationList,
}

impl QueryIntent {
    /// 模板是否绑定时间窗口参数
    pub fn uses_window(&self) -> bool {
        !matches!(self, QueryIntent::StationList)
    }

    /// 面向用户的示例问法
    pub fn example(&self) -> &'static str {
        match self {
            QueryIntent::Downtime => "Which stations had the most downtime this week?",
            QueryIntent::Quality => "Show defect rate by station today",
            QueryIntent::ShiftComparison => "Compare shifts for the last 3 days",
            QueryIntent::SlowestStations => "What are the top 3 bottleneck stations?",
            QueryIntent::ProductionOutput => "How many units were produced today?",
            QueryIntent::StationList => "List all stations",
        }
    }
}

/// 查询计划 (路由输出)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPlan {
    pub intent: QueryIntent,
    #[serde(skip)]
    pub sql: &'static str,
    pub since: NaiveDateTime,
    pub limit: usize,
}

/// 模板构建上下文
#[derive(Debug, Clone, Copy)]
pub struct QueryContext {
    pub since: NaiveDateTime,
    pub limit: usize,
}

/// 路由规则
pub struct QueryRule {
    pub intent: QueryIntent,
    pub predicate: fn(&[String]) -> bool,
    pub build: fn(&QueryContext) -> QueryPlan,
}

fn has_any(tokens: &[String], words: &[&str]) -> bool {
    tokens.iter().any(|t| words.contains(&t.as_str()))
}

fn plan(intent: QueryIntent, sql: &'static str, ctx: &QueryContext) -> QueryPlan {
    QueryPlan {
        intent,
        sql,
        since: ctx.since,
        limit: ctx.limit,
    }
}

/// 默认规则表（顺序即优先级）
fn default_rules() -> Vec<QueryRule> {
    vec![
        QueryRule {
            intent: QueryIntent::Downtime,
            predicate: |t| has_any(t, &["downtime", "stopped", "stops", "outage", "outages", "breakdown", "breakdowns"]),
            build: |ctx| plan(QueryIntent::Downtime, templates::DOWNTIME_BY_STATION, ctx),
        },
        QueryRule {
            intent: QueryIntent::Quality,
            predicate: |t| has_any(t, &["defect", "defects", "quality", "scrap", "reject", "rejects"]),
            build: |ctx| plan(QueryIntent::Quality, templates::DEFECTS_BY_STATION, ctx),
        },
        QueryRule {
            intent: QueryIntent::ShiftComparison,
            predicate: |t| has_any(t, &["shift", "shifts"]),
            build: |ctx| plan(QueryIntent::ShiftComparison, templates::SHIFT_COMPARISON, ctx),
        },
        QueryRule {
            intent: QueryIntent::SlowestStations,
            predicate: |t| has_any(t, &["bottleneck", "bottlenecks", "slowest", "slow", "cycle"]),
            build: |ctx| plan(QueryIntent::SlowestStations, templates::SLOWEST_STATIONS, ctx),
        },
        QueryRule {
            intent: QueryIntent::ProductionOutput,
            predicate: |t| {
                has_any(t, &["output", "produced", "production", "units", "throughput"])
            },
            build: |ctx| plan(QueryIntent::ProductionOutput, templates::PRODUCTION_OUTPUT, ctx),
        },
        QueryRule {
            intent: QueryIntent::StationList,
            predicate: |t| has_any(t, &["stations", "station", "list"]),
            build: |ctx| plan(QueryIntent::StationList, templates::STATION_LIST, ctx),
        },
    ]
}

// ==========================================
// QueryRouter - 问答路由
// ==========================================
pub struct QueryRouter {
    rules: Vec<QueryRule>,
    default_window_days: i64,
    default_limit: usize,
}

impl QueryRouter {
    /// 创建路由器
    ///
    /// # 参数
    /// - `default_window_days`: 问题未指明时间范围时的窗口（天）
    /// - `default_limit`: 问题未指明 top N 时的条数
    pub fn new(default_window_days: i64, default_limit: usize) -> Self {
        Self {
            rules: default_rules(),
            default_window_days: default_window_days.clamp(1, MAX_WINDOW_DAYS),
            default_limit: default_limit.max(1),
        }
    }

    /// 已支持的意图（按匹配顺序）
    pub fn supported_intents(&self) -> Vec<QueryIntent> {
        self.rules.iter().map(|r| r.intent).collect()
    }

    /// 路由问题；无规则命中时返回 None
    pub fn route(&self, question: &str, now: NaiveDateTime) -> Option<QueryPlan> {
        let tokens = tokenize(question);
        if tokens.is_empty() {
            return None;
        }

        let rule = self.rules.iter().find(|r| (r.predicate)(&tokens))?;

        let default_window = Duration::days(self.default_window_days);
        let since = extract_window(&tokens)
            .and_then(|window| now.checked_sub_signed(window))
            .or_else(|| now.checked_sub_signed(default_window))
            .unwrap_or(now);
        let limit = extract_top_n(&tokens).unwrap_or(self.default_limit);
        let ctx = QueryContext { since, limit };

        tracing::debug!(question = question, intent = ?rule.intent, limit = limit, "问答路由命中");
        Some((rule.build)(&ctx))
    }
}

/// 小写并按非字母数字切分
fn tokenize(question: &str) -> Vec<String> {
    question
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// 时间窗口: today / week / month / (last|past) N (hours|days|weeks)
///
/// N 按单位折算后夹到 MAX_WINDOW_DAYS 以内。
fn extract_window(tokens: &[String]) -> Option<Duration> {
    const MAX_WINDOW_HOURS: i64 = MAX_WINDOW_DAYS * 24;

    for (i, token) in tokens.iter().enumerate() {
        if let Ok(n) = token.parse::<i64>() {
            if let Some(unit) = tokens.get(i + 1) {
                let n = n.max(1);
                match unit.as_str() {
                    "hour" | "hours" => return Duration::try_hours(n.min(MAX_WINDOW_HOURS)),
                    "day" | "days" => return Duration::try_days(n.min(MAX_WINDOW_DAYS)),
                    "week" | "weeks" => {
                        return Duration::try_days(n.saturating_mul(7).min(MAX_WINDOW_DAYS))
                    }
                    _ => {}
                }
            }
        }
    }

    if has_any(tokens, &["today", "yesterday"]) {
        Some(Duration::days(1))
    } else if has_any(tokens, &["week", "weekly"]) {
        Some(Duration::days(7))
    } else if has_any(tokens, &["month", "monthly"]) {
        Some(Duration::days(30))
    } else {
        None
    }
}

/// top N / N worst / N slowest
fn extract_top_n(tokens: &[String]) -> Option<usize> {
    for (i, token) in tokens.iter().enumerate() {
        if token == "top" {
            if let Some(n) = tokens.get(i + 1).and_then(|t| t.parse::<usize>().ok()) {
                return Some(n.clamp(1, 100));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_first_match_wins() {
        let router = QueryRouter::new(7, 10);
        // 同时含 downtime 与 station，downtime 规则在前
        let plan = router.route("Which station has the most downtime?", now()).unwrap();
        assert_eq!(plan.intent, QueryIntent::Downtime);
    }

    #[test]
    fn test_window_and_limit_extraction() {
        let router = QueryRouter::new(7, 10);

        let plan = router.route("Top 3 bottleneck stations in the last 2 days", now()).unwrap();
        assert_eq!(plan.intent, QueryIntent::SlowestStations);
        assert_eq!(plan.limit, 3);
        assert_eq!(plan.since, now() - Duration::days(2));

        let plan = router.route("defect rate today", now()).unwrap();
        assert_eq!(plan.intent, QueryIntent::Quality);
        assert_eq!(plan.since, now() - Duration::days(1));
        assert_eq!(plan.limit, 10);

        let plan = router.route("compare shifts", now()).unwrap();
        assert_eq!(plan.since, now() - Duration::days(7));
    }

    #[test]
    fn test_oversized_window_is_clamped() {
        let router = QueryRouter::new(7, 10);
        let max_since = now() - Duration::days(MAX_WINDOW_DAYS);

        for question in [
            "downtime in the last 100000000 days",
            "downtime in the last 9999999999999999 days",
            "downtime in the last 9223372036854775807 weeks",
            "downtime in the last 99999999999 hours",
        ] {
            let plan = router.route(question, now()).unwrap();
            assert_eq!(plan.intent, QueryIntent::Downtime);
            assert_eq!(plan.since, max_since, "{}", question);
        }

        // 超出 i64 的数字不视为窗口，回落到默认窗口
        let plan = router
            .route("downtime in the last 99999999999999999999 days", now())
            .unwrap();
        assert_eq!(plan.since, now() - Duration::days(7));
    }

    #[test]
    fn test_default_window_is_clamped() {
        let router = QueryRouter::new(i64::MAX, 10);
        let plan = router.route("compare shifts", now()).unwrap();
        assert_eq!(plan.since, now() - Duration::days(MAX_WINDOW_DAYS));
    }

    #[test]
    fn test_unmatched_question() {
        let router = QueryRouter::new(7, 10);
        assert!(router.route("what is the weather like?", now()).is_none());
        assert!(router.route("   ", now()).is_none());
    }

    #[test]
    fn test_station_list_has_no_window() {
        let router = QueryRouter::new(7, 10);
        let plan = router.route("list all stations", now()).unwrap();
        assert_eq!(plan.intent, QueryIntent::StationList);
        assert!(!plan.intent.uses_window());
    }

    #[test]
    fn test_supported_intents_order() {
        let router = QueryRouter::new(7, 10);
        let intents = router.supported_intents();
        assert_eq!(intents.first(), Some(&QueryIntent::Downtime));
        assert_eq!(intents.last(), Some(&QueryIntent::StationList));
    }
}
